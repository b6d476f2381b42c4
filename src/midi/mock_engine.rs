use crate::midi::{MidiEngine, MidiError, MidiMessage, Result};
use std::collections::VecDeque;

/// In-memory transport: inbound messages are queued by the test, outbound
/// messages are recorded.
#[derive(Debug, Default)]
pub struct MockMidiEngine {
    inbound: VecDeque<MidiMessage>,
    sent: Vec<MidiMessage>,
    fail_sends: bool,
    disconnected: bool,
}

impl MockMidiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_inbound(&mut self, msg: MidiMessage) {
        self.inbound.push_back(msg);
    }

    pub fn sent(&self) -> &[MidiMessage] {
        &self.sent
    }

    /// Makes every following send fail.
    pub fn fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }

    /// Makes the next poll report a lost input connection once the queue is drained.
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }
}

impl MidiEngine for MockMidiEngine {
    fn send(&mut self, msg: MidiMessage) -> Result<()> {
        if self.fail_sends {
            return Err(MidiError::SendError("mock send failure".to_string()));
        }
        self.sent.push(msg);
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<MidiMessage>> {
        match self.inbound.pop_front() {
            Some(msg) => Ok(Some(msg)),
            None if self.disconnected => {
                Err(MidiError::RecvError("mock input disconnected".to_string()))
            }
            None => Ok(None),
        }
    }

    fn list_devices(&self) -> Vec<String> {
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()]
    }
}
