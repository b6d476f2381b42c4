use super::{HardwareTimer, Result, TimerCallback, TimerError};
use crate::tempo::ClockInterval;
use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, info};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Periodic timer driven by a dedicated thread.
///
/// Pulses are scheduled on absolute deadlines so sleep overshoot does not
/// accumulate into tempo drift.
pub struct ThreadTimer {
    period_us: Arc<AtomicU32>,
    stop_tx: Option<Sender<()>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Default for ThreadTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadTimer {
    pub fn new() -> Self {
        Self {
            period_us: Arc::new(AtomicU32::new(0)),
            stop_tx: None,
            thread_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl HardwareTimer for ThreadTimer {
    fn begin(&mut self, callback: TimerCallback, interval: ClockInterval) -> Result<()> {
        if self.is_running() {
            self.end();
        }

        self.period_us.store(interval.as_micros(), Ordering::Release);

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let period_us = Arc::clone(&self.period_us);

        let handle = thread::Builder::new()
            .name("pulse-timer".to_string())
            .spawn(move || {
                let period =
                    || Duration::from_micros(u64::from(period_us.load(Ordering::Acquire)));
                let mut deadline = Instant::now() + period();

                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            callback();

                            let next = deadline + period();
                            let now = Instant::now();
                            // Re-base rather than burst when more than a period behind
                            deadline = if now > next + period() {
                                now + period()
                            } else {
                                next
                            };
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|e| TimerError::Spawn(e.to_string()))?;

        self.stop_tx = Some(stop_tx);
        self.thread_handle = Some(handle);
        info!("Pulse timer started with period {}", interval);
        Ok(())
    }

    fn update(&mut self, interval: ClockInterval) -> Result<()> {
        if !self.is_running() {
            return Err(TimerError::NotRunning);
        }
        self.period_us.store(interval.as_micros(), Ordering::Release);
        debug!("Pulse timer period updated to {}", interval);
        Ok(())
    }

    fn end(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            info!("Pulse timer stopped");
        }
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_callback() -> (Arc<AtomicUsize>, TimerCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let callback: TimerCallback = Box::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[test]
    fn fires_periodically_until_ended() {
        let (count, callback) = counting_callback();
        let mut timer = ThreadTimer::new();

        timer
            .begin(callback, ClockInterval::from_micros(2_000))
            .unwrap();
        assert!(timer.is_running());
        thread::sleep(Duration::from_millis(100));
        timer.end();
        assert!(!timer.is_running());

        let fired = count.load(Ordering::SeqCst);
        assert!(fired >= 10, "expected periodic pulses, got {}", fired);

        // No pulses after end
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), fired);
    }

    #[test]
    fn stall_does_not_burst() {
        let stamps = Arc::new(std::sync::Mutex::new(Vec::new()));
        let stamps_clone = stamps.clone();
        let callback: TimerCallback = Box::new(move || {
            let mut stamps = stamps_clone.lock().unwrap();
            stamps.push(Instant::now());
            if stamps.len() == 1 {
                // Hold the first pulse for more than two periods
                thread::sleep(Duration::from_millis(35));
            }
        });
        let mut timer = ThreadTimer::new();

        timer
            .begin(callback, ClockInterval::from_micros(10_000))
            .unwrap();
        thread::sleep(Duration::from_millis(100));
        timer.end();

        let stamps = stamps.lock().unwrap();
        assert!(stamps.len() >= 2, "expected at least two pulses");
        let gap = stamps[1].duration_since(stamps[0]);
        assert!(
            gap >= Duration::from_millis(44),
            "second pulse fired {:?} after the first, within one period of the stall",
            gap
        );
    }

    #[test]
    fn update_requires_running_timer() {
        let mut timer = ThreadTimer::new();
        assert_eq!(
            timer.update(ClockInterval::from_micros(1_000)),
            Err(TimerError::NotRunning)
        );
    }

    #[test]
    fn end_is_idempotent() {
        let (_, callback) = counting_callback();
        let mut timer = ThreadTimer::new();
        timer
            .begin(callback, ClockInterval::from_micros(5_000))
            .unwrap();
        timer.end();
        timer.end();
        assert!(!timer.is_running());
    }
}
