use std::error::Error;
use std::fmt;

/// Custom error type for MIDI operations
#[derive(Debug, Clone, PartialEq)]
pub enum MidiError {
    /// Error when sending a MIDI message
    SendError(String),
    /// Error when receiving a MIDI message
    RecvError(String),
    /// Error when connecting to a MIDI device
    ConnectionError(String),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::SendError(msg) => write!(f, "MIDI send error: {}", msg),
            MidiError::RecvError(msg) => write!(f, "MIDI receive error: {}", msg),
            MidiError::ConnectionError(msg) => write!(f, "MIDI connection error: {}", msg),
        }
    }
}

impl Error for MidiError {}

/// Represents a MIDI message that can be sent or received.
///
/// Channels are the 0-based low nibble of the status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note On message with note number and velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off message with note number and velocity
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Control Change message with controller number and value
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    /// Program Change message with program number
    ProgramChange { channel: u8, program: u8 },
    /// Song Position Pointer, in 16th notes since the start of the song
    SongPosition { beats: u16 },
    /// MIDI Clock timing message
    Clock,
    /// MIDI Start message
    Start,
    /// MIDI Stop message
    Stop,
    /// MIDI Continue message
    Continue,
}

impl MidiMessage {
    /// Decodes one complete message. Unsupported or truncated data yields `None`.
    pub fn from_bytes(data: &[u8]) -> Option<MidiMessage> {
        let status = *data.first()?;

        match status {
            0xF8 => return Some(MidiMessage::Clock),
            0xFA => return Some(MidiMessage::Start),
            0xFB => return Some(MidiMessage::Continue),
            0xFC => return Some(MidiMessage::Stop),
            0xF2 if data.len() >= 3 => {
                let beats = u16::from(data[1] & 0x7F) | (u16::from(data[2] & 0x7F) << 7);
                return Some(MidiMessage::SongPosition { beats });
            }
            0xF0..=0xFF => return None,
            _ => {}
        }

        let channel = status & 0x0F;
        match status & 0xF0 {
            0x90 if data.len() >= 3 => Some(MidiMessage::NoteOn {
                channel,
                note: data[1],
                velocity: data[2],
            }),
            0x80 if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel,
                note: data[1],
                velocity: data[2],
            }),
            0xB0 if data.len() >= 3 => Some(MidiMessage::ControlChange {
                channel,
                controller: data[1],
                value: data[2],
            }),
            0xC0 if data.len() >= 2 => Some(MidiMessage::ProgramChange {
                channel,
                program: data[1],
            }),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | (channel & 0x0F), note, velocity],
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![0x80 | (channel & 0x0F), note, velocity],
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | (channel & 0x0F), controller, value],
            MidiMessage::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program]
            }
            MidiMessage::SongPosition { beats } => {
                vec![0xF2, (beats & 0x7F) as u8, ((beats >> 7) & 0x7F) as u8]
            }
            MidiMessage::Clock => vec![0xF8],
            MidiMessage::Start => vec![0xFA],
            MidiMessage::Stop => vec![0xFC],
            MidiMessage::Continue => vec![0xFB],
        }
    }

    /// True for single-byte system real-time messages.
    pub fn is_realtime(&self) -> bool {
        matches!(
            self,
            MidiMessage::Clock | MidiMessage::Start | MidiMessage::Stop | MidiMessage::Continue
        )
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// Trait defining the interface for MIDI transport implementations
pub trait MidiEngine: Send {
    /// Sends a MIDI message to the device immediately
    fn send(&mut self, msg: MidiMessage) -> Result<()>;

    /// Returns the next inbound message without blocking, `None` if nothing is waiting
    fn poll(&mut self) -> Result<Option<MidiMessage>>;

    /// Lists the devices this engine can connect to
    fn list_devices(&self) -> Vec<String>;
}
