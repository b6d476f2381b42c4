use super::{HardwareTimer, Result, TimerCallback, TimerError};
use crate::tempo::ClockInterval;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct ManualTimerState {
    callback: Option<TimerCallback>,
    interval: Option<ClockInterval>,
    begin_count: usize,
    update_count: usize,
    end_count: usize,
}

/// Timer that never fires on its own. A [`ManualTimerHandle`] fires it, so
/// tests can step the clock one period at a time.
pub struct ManualTimer {
    state: Arc<Mutex<ManualTimerState>>,
}

/// Test-side view of a [`ManualTimer`] that has been handed to the engine.
#[derive(Clone)]
pub struct ManualTimerHandle {
    state: Arc<Mutex<ManualTimerState>>,
}

impl ManualTimer {
    pub fn with_handle() -> (Self, ManualTimerHandle) {
        let state = Arc::new(Mutex::new(ManualTimerState::default()));
        (
            ManualTimer {
                state: state.clone(),
            },
            ManualTimerHandle { state },
        )
    }

    fn lock(&self) -> MutexGuard<'_, ManualTimerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HardwareTimer for ManualTimer {
    fn begin(&mut self, callback: TimerCallback, interval: ClockInterval) -> Result<()> {
        let mut state = self.lock();
        state.callback = Some(callback);
        state.interval = Some(interval);
        state.begin_count += 1;
        Ok(())
    }

    fn update(&mut self, interval: ClockInterval) -> Result<()> {
        let mut state = self.lock();
        if state.callback.is_none() {
            return Err(TimerError::NotRunning);
        }
        state.interval = Some(interval);
        state.update_count += 1;
        Ok(())
    }

    fn end(&mut self) {
        let mut state = self.lock();
        if state.callback.take().is_some() {
            state.interval = None;
            state.end_count += 1;
        }
    }
}

impl ManualTimerHandle {
    fn lock(&self) -> MutexGuard<'_, ManualTimerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Elapses one period. Returns false if the timer is not running.
    pub fn fire(&self) -> bool {
        let state = self.lock();
        match &state.callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().callback.is_some()
    }

    /// Period currently programmed, `None` while stopped.
    pub fn interval(&self) -> Option<ClockInterval> {
        self.lock().interval
    }

    pub fn begin_count(&self) -> usize {
        self.lock().begin_count
    }

    pub fn update_count(&self) -> usize {
        self.lock().update_count
    }

    pub fn end_count(&self) -> usize {
        self.lock().end_count
    }
}
