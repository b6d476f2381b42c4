// event_loop.rs

use crate::beat::BeatIndicator;
use crate::led::DigitalOutput;
use crate::midi::{MidiEngine, MidiError, MidiMessage};
use crate::song_position::{ActiveTracker, SongPositionTracker};
use crate::timer::{HardwareTimer, TimerError};
use crate::transport::{SyncOutcome, TransportSync};
use log::{error, info, trace, warn};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub enum LoopError {
    Midi(MidiError),
    Timer(TimerError),
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::Midi(e) => write!(f, "{}", e),
            LoopError::Timer(e) => write!(f, "{}", e),
        }
    }
}

impl Error for LoopError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoopError::Midi(e) => Some(e),
            LoopError::Timer(e) => Some(e),
        }
    }
}

impl From<MidiError> for LoopError {
    fn from(e: MidiError) -> Self {
        LoopError::Midi(e)
    }
}

impl From<TimerError> for LoopError {
    fn from(e: TimerError) -> Self {
        LoopError::Timer(e)
    }
}

/// What one iteration of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Emitted a Clock for a timer pulse and advanced the beat
    InternalPulse,
    /// Advanced the beat for a pulse received from the host
    ExternalPulse,
    /// Handled one inbound message
    Message(SyncOutcome),
    /// Nothing pending and nothing received
    Idle,
}

/// Single-threaded dispatcher owning every piece of clock state.
///
/// The timer callback only raises a flag; everything else, including all
/// MIDI I/O and LED writes, happens here.
pub struct EventLoop<E, H, L, S = ActiveTracker>
where
    E: MidiEngine,
    H: HardwareTimer,
    L: DigitalOutput,
    S: SongPositionTracker,
{
    midi: E,
    sync: TransportSync<H>,
    beat: BeatIndicator<L>,
    song_position: S,
}

impl<E, H, L> EventLoop<E, H, L, ActiveTracker>
where
    E: MidiEngine,
    H: HardwareTimer,
    L: DigitalOutput,
{
    pub fn new(midi: E, timer: H, led: L) -> Self {
        Self::with_tracker(midi, timer, led, ActiveTracker::default())
    }
}

impl<E, H, L, S> EventLoop<E, H, L, S>
where
    E: MidiEngine,
    H: HardwareTimer,
    L: DigitalOutput,
    S: SongPositionTracker,
{
    pub fn with_tracker(midi: E, timer: H, led: L, song_position: S) -> Self {
        EventLoop {
            midi,
            sync: TransportSync::new(timer),
            beat: BeatIndicator::new(led),
            song_position,
        }
    }

    /// Runs one iteration: an internal pulse first, then an external pulse,
    /// otherwise at most one inbound message.
    pub fn step(&mut self) -> Result<Step, LoopError> {
        if self.sync.take_internal_pulse() {
            let sent = self.midi.send(MidiMessage::Clock);
            self.on_pulse();
            sent?;
            return Ok(Step::InternalPulse);
        }

        if self.sync.take_external_pulse() {
            self.on_pulse();
            return Ok(Step::ExternalPulse);
        }

        match self.midi.poll()? {
            Some(msg) => self.dispatch(msg).map(Step::Message),
            None => Ok(Step::Idle),
        }
    }

    /// Polls until `shutdown` is set. Never sleeps.
    ///
    /// A failed Clock send is logged and the loop carries on; losing the
    /// inbound connection or the timer ends it.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<(), LoopError> {
        info!("Event loop running");
        while !shutdown.load(Ordering::Relaxed) {
            match self.step() {
                Ok(Step::Idle) => std::hint::spin_loop(),
                Ok(_) => {}
                Err(LoopError::Midi(MidiError::SendError(e))) => {
                    warn!("Clock not sent: {}", e);
                }
                Err(e) => {
                    error!("Event loop stopping: {}", e);
                    return Err(e);
                }
            }
        }
        info!("Event loop shut down");
        Ok(())
    }

    fn on_pulse(&mut self) {
        self.beat.on_pulse();
        if self.song_position.on_pulse() {
            trace!("Song position resync");
            self.beat.resync();
        }
    }

    fn dispatch(&mut self, msg: MidiMessage) -> Result<SyncOutcome, LoopError> {
        let outcome = self.sync.handle_message(msg)?;
        match outcome {
            SyncOutcome::Started => {
                self.beat.resync();
                self.song_position.reset();
            }
            SyncOutcome::SongPosition(sixteenths) => {
                if self.song_position.on_song_position(sixteenths) {
                    self.beat.resync();
                }
            }
            _ => {}
        }
        Ok(outcome)
    }

    pub fn midi(&self) -> &E {
        &self.midi
    }

    pub fn midi_mut(&mut self) -> &mut E {
        &mut self.midi
    }

    pub fn sync(&self) -> &TransportSync<H> {
        &self.sync
    }

    pub fn beat(&self) -> &BeatIndicator<L> {
        &self.beat
    }

    pub fn song_position(&self) -> &S {
        &self.song_position
    }
}
