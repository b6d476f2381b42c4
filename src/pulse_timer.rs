// pulse_timer.rs

use crate::tempo::ClockInterval;
use crate::timer::{HardwareTimer, PendingFlag, Result};
use log::info;
use std::sync::Arc;

/// Owns the periodic interrupt that produces internal clock pulses.
///
/// Every period raises the shared pending-pulse flag. The flag is the only
/// thing the timer callback touches.
pub struct PulseTimerController<H: HardwareTimer> {
    timer: H,
    pending: Arc<PendingFlag>,
    interval: Option<ClockInterval>,
}

impl<H: HardwareTimer> PulseTimerController<H> {
    pub fn new(timer: H) -> Self {
        Self {
            timer,
            pending: Arc::new(PendingFlag::new()),
            interval: None,
        }
    }

    /// Starts pulsing at `interval`, or retunes the running timer without a gap.
    pub fn arm(&mut self, interval: ClockInterval) -> Result<()> {
        if self.is_armed() {
            self.timer.update(interval)?;
            info!("Pulse timer reprogrammed to {}", interval);
        } else {
            let pending = Arc::clone(&self.pending);
            self.timer.begin(Box::new(move || pending.raise()), interval)?;
            info!("Pulse timer armed at {}", interval);
        }
        self.interval = Some(interval);
        Ok(())
    }

    /// Stops pulsing and discards a pulse not yet consumed.
    pub fn disarm(&mut self) {
        if self.interval.take().is_some() {
            self.timer.end();
            info!("Pulse timer disarmed");
        }
        self.pending.clear();
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    pub fn interval(&self) -> Option<ClockInterval> {
        self.interval
    }

    /// Consumes a pending pulse, if any.
    pub fn take_pulse(&self) -> bool {
        self.pending.take()
    }
}
