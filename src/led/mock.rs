use super::DigitalOutput;

/// Output that records every write.
#[derive(Debug, Default)]
pub struct MockLed {
    high: bool,
    writes: Vec<bool>,
}

impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level written, oldest first.
    pub fn writes(&self) -> &[bool] {
        &self.writes
    }

    pub fn on_count(&self) -> usize {
        self.writes.iter().filter(|&&level| level).count()
    }

    pub fn off_count(&self) -> usize {
        self.writes.iter().filter(|&&level| !level).count()
    }
}

impl DigitalOutput for MockLed {
    fn set_high(&mut self) {
        self.high = true;
        self.writes.push(true);
    }

    fn set_low(&mut self) {
        self.high = false;
        self.writes.push(false);
    }

    fn is_high(&self) -> bool {
        self.high
    }
}
