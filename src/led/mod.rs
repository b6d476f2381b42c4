//! Digital output for the beat indicator
//!
//! [`DigitalOutput`] is one on/off line. [`LogLed`] reports edges to the log,
//! [`MockLed`] records them for tests, and `ui::ConsoleLed` draws them in the
//! terminal.
mod mock;

pub use mock::MockLed;

use log::debug;

pub trait DigitalOutput {
    fn set_high(&mut self);
    fn set_low(&mut self);
    fn is_high(&self) -> bool;
}

/// Output that only logs its edges.
#[derive(Debug, Default)]
pub struct LogLed {
    high: bool,
}

impl LogLed {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DigitalOutput for LogLed {
    fn set_high(&mut self) {
        self.high = true;
        debug!("Beat LED on");
    }

    fn set_low(&mut self) {
        self.high = false;
        debug!("Beat LED off");
    }

    fn is_high(&self) -> bool {
        self.high
    }
}
