//! Transport ownership
//!
//! Decides who drives the clock: this device's pulse timer (`Internal`) or a
//! connected host sending real-time Clock messages (`External`).
//!
//! - A tempo Control Change (any channel) or Program Change (tempo channel
//!   only) arms the pulse timer and claims the transport.
//! - Start and Stop hand the transport to the host and silence the timer.
//! - Clock from the host is passed through as an external pulse, unless the
//!   pulse timer is driving, in which case it is dropped so pulses are not
//!   counted twice.

use crate::config::{TEMPO_CONTROLLER, TEMPO_PROGRAM_CHANNEL};
use crate::midi::MidiMessage;
use crate::pulse_timer::PulseTimerController;
use crate::tempo::{map_control_value, ClockInterval, TempoSetting};
use crate::timer::{HardwareTimer, PendingFlag, Result};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    Internal,
    External,
}

/// What the event loop still has to do after a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Not a message this controller acts on
    Ignored,
    /// The pulse timer now runs at this tempo
    TempoSet(TempoSetting, ClockInterval),
    /// Host took over; the beat must restart from pulse zero
    Started,
    /// Host stopped the transport
    Stopped,
    /// An external pulse is pending
    ExternalPulse,
    /// Host repositioned the song, in 16th notes
    SongPosition(u16),
}

pub struct TransportSync<H: HardwareTimer> {
    source: ClockSource,
    pulse_timer: PulseTimerController<H>,
    external_pulse: PendingFlag,
}

impl<H: HardwareTimer> TransportSync<H> {
    /// Starts as `Internal` with the timer dormant until the first tempo message.
    pub fn new(timer: H) -> Self {
        Self {
            source: ClockSource::Internal,
            pulse_timer: PulseTimerController::new(timer),
            external_pulse: PendingFlag::new(),
        }
    }

    pub fn handle_message(&mut self, msg: MidiMessage) -> Result<SyncOutcome> {
        match msg {
            MidiMessage::ControlChange {
                controller, value, ..
            } if controller == TEMPO_CONTROLLER => self.set_tempo(value),
            MidiMessage::ProgramChange { channel, program }
                if channel == TEMPO_PROGRAM_CHANNEL =>
            {
                self.set_tempo(program)
            }
            MidiMessage::Start => Ok(self.start()),
            MidiMessage::Stop => Ok(self.stop()),
            MidiMessage::Clock => Ok(self.external_clock()),
            MidiMessage::SongPosition { beats } => Ok(SyncOutcome::SongPosition(beats)),
            other => {
                debug!("Ignoring MIDI message {:?}", other);
                Ok(SyncOutcome::Ignored)
            }
        }
    }

    fn set_tempo(&mut self, value: u8) -> Result<SyncOutcome> {
        let (tempo, interval) = map_control_value(value);
        self.pulse_timer.arm(interval)?;
        if self.source != ClockSource::Internal {
            info!("Tempo message reclaims the transport");
        }
        self.source = ClockSource::Internal;
        info!("Tempo set to {} ({} per pulse)", tempo, interval);
        Ok(SyncOutcome::TempoSet(tempo, interval))
    }

    fn start(&mut self) -> SyncOutcome {
        self.pulse_timer.disarm();
        self.external_pulse.clear();
        self.source = ClockSource::External;
        info!("Host sent Start, following external clock");
        SyncOutcome::Started
    }

    fn stop(&mut self) -> SyncOutcome {
        self.pulse_timer.disarm();
        self.source = ClockSource::External;
        info!("Host sent Stop");
        SyncOutcome::Stopped
    }

    fn external_clock(&mut self) -> SyncOutcome {
        if self.pulse_timer.is_armed() {
            debug!("Dropping external Clock while the pulse timer drives");
            return SyncOutcome::Ignored;
        }
        self.external_pulse.raise();
        SyncOutcome::ExternalPulse
    }

    /// Consumes a pending internal pulse.
    pub fn take_internal_pulse(&self) -> bool {
        self.pulse_timer.take_pulse()
    }

    /// Consumes a pending external pulse.
    pub fn take_external_pulse(&self) -> bool {
        self.external_pulse.take()
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    pub fn is_armed(&self) -> bool {
        self.pulse_timer.is_armed()
    }
}
