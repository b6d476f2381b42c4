use crate::midi::{MidiEngine, MidiError, MidiMessage, Result};
use crossbeam::channel::{unbounded, Receiver, TryRecvError};
use log::{debug, info};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

const CLIENT_NAME: &str = "midiclock";

/// MIDI transport over a system MIDI port pair, via midir.
pub struct MidirEngine {
    #[allow(dead_code)]
    input: MidiInputConnection<()>,
    output: MidiOutputConnection,
    rx: Receiver<Vec<u8>>,
}

impl MidirEngine {
    /// Connects input and output ports whose names contain `device_name`.
    pub fn new(device_name: &str) -> Result<Self> {
        let (input, rx) = Self::connect_input(device_name)?;
        let output = Self::connect_output(device_name)?;
        info!("Connected to MIDI device matching '{}'", device_name);

        Ok(MidirEngine { input, output, rx })
    }

    fn connect_input(name: &str) -> Result<(MidiInputConnection<()>, Receiver<Vec<u8>>)> {
        let mut midi_in = MidiInput::new(&format!("{}-in", CLIENT_NAME))
            .map_err(|e| MidiError::ConnectionError(e.to_string()))?;
        // Timing messages are filtered by default
        midi_in.ignore(Ignore::None);

        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| {
                MidiError::ConnectionError(format!("input device '{}' not found", name))
            })?;

        let (tx, rx) = unbounded();
        let input = midi_in
            .connect(
                in_port,
                "midiclock-input",
                move |_stamp, message, _| {
                    let _ = tx.send(message.to_vec());
                },
                (),
            )
            .map_err(|e| MidiError::ConnectionError(e.to_string()))?;
        Ok((input, rx))
    }

    fn connect_output(name: &str) -> Result<MidiOutputConnection> {
        let midi_out = MidiOutput::new(&format!("{}-out", CLIENT_NAME))
            .map_err(|e| MidiError::ConnectionError(e.to_string()))?;

        let out_ports = midi_out.ports();
        let out_port = out_ports
            .iter()
            .find(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| {
                MidiError::ConnectionError(format!("output device '{}' not found", name))
            })?;

        midi_out
            .connect(out_port, "midiclock-output")
            .map_err(|e| MidiError::ConnectionError(e.to_string()))
    }

    /// Names of all MIDI input ports on the system.
    pub fn available_devices() -> Vec<String> {
        let mut devices = Vec::new();

        if let Ok(midi_in) = MidiInput::new(&format!("{}-list", CLIENT_NAME)) {
            for port in midi_in.ports() {
                if let Ok(name) = midi_in.port_name(&port) {
                    devices.push(name);
                }
            }
        }

        devices
    }
}

impl MidiEngine for MidirEngine {
    fn send(&mut self, msg: MidiMessage) -> Result<()> {
        self.output
            .send(&msg.to_bytes())
            .map_err(|e| MidiError::SendError(e.to_string()))
    }

    fn poll(&mut self) -> Result<Option<MidiMessage>> {
        loop {
            match self.rx.try_recv() {
                Ok(data) => match MidiMessage::from_bytes(&data) {
                    Some(msg) => return Ok(Some(msg)),
                    None => debug!("Skipping unsupported MIDI data: {:02X?}", data),
                },
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => {
                    return Err(MidiError::RecvError("input connection closed".to_string()))
                }
            }
        }
    }

    fn list_devices(&self) -> Vec<String> {
        Self::available_devices()
    }
}
