pub mod beat;
pub mod cli;
pub mod config;
pub mod event_loop;
pub mod led;
pub mod logging;
pub mod midi;
pub mod pulse_timer;
pub mod song_position;
pub mod tempo;
pub mod timer;
pub mod transport;
pub mod ui;

pub use cli::Args;
pub use event_loop::{EventLoop, LoopError, Step};
pub use tempo::{ClockInterval, TempoSetting};
pub use transport::{ClockSource, SyncOutcome};

/// Names of the MIDI ports available to bind to.
pub fn handle_device_list() -> Vec<String> {
    midi::DefaultMidiEngine::available_devices()
}
