// beat.rs

use crate::config::{LED_OFF_TICK, TICKS_PER_BEAT};
use crate::led::DigitalOutput;
use log::trace;

/// Drives the beat LED from the position within the current quarter note.
///
/// The LED is lit for the first half of every quarter note. A tempo change
/// does not rescale the half already in progress, so the first beat after a
/// change may be lit for a slightly wrong length.
pub struct BeatIndicator<L: DigitalOutput> {
    led: L,
    pulse_counter: u32,
}

impl<L: DigitalOutput> BeatIndicator<L> {
    pub fn new(led: L) -> Self {
        Self {
            led,
            pulse_counter: 0,
        }
    }

    /// Advances by one clock pulse, whichever source produced it.
    pub fn on_pulse(&mut self) {
        if self.pulse_counter == 0 {
            self.led.set_high();
        } else if self.pulse_counter == LED_OFF_TICK {
            self.led.set_low();
        }
        trace!("Pulse {} of quarter note", self.pulse_counter);
        self.pulse_counter = (self.pulse_counter + 1) % TICKS_PER_BEAT;
    }

    /// Realigns so the next pulse starts a quarter note.
    pub fn resync(&mut self) {
        self.pulse_counter = 0;
    }

    /// Position in `0..24` of the next pulse within the quarter note.
    pub fn pulse_counter(&self) -> u32 {
        self.pulse_counter
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}
