//! Song position tracking
//!
//! Counts 16th notes (six clock pulses each) since the start of the song and
//! asks for a beat resync at every measure boundary, i.e. every 16 sixteenths.
//! The tracker is optional: without the `song-position` feature the event loop
//! is built with [`NoSongPosition`], which never asks for anything.

use crate::config::{SIXTEENTHS_PER_MEASURE, TICKS_PER_SIXTEENTH};
use log::{debug, info};

pub trait SongPositionTracker {
    /// Called once per consumed clock pulse. Returns true when the beat
    /// indicator must be realigned to the start of a quarter note.
    fn on_pulse(&mut self) -> bool;

    /// Applies an inbound Song Position Pointer. Same return contract as `on_pulse`.
    fn on_song_position(&mut self, sixteenths: u16) -> bool;

    /// Rewinds to the start of the song (transport Start).
    fn reset(&mut self);
}

/// Disabled tracker.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSongPosition;

impl SongPositionTracker for NoSongPosition {
    fn on_pulse(&mut self) -> bool {
        false
    }

    fn on_song_position(&mut self, _sixteenths: u16) -> bool {
        false
    }

    fn reset(&mut self) {}
}

#[derive(Debug, Default, Clone)]
pub struct SongPosition {
    sixteenths: u32,
    pulses_into_sixteenth: u32,
}

impl SongPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// 16th notes elapsed since the start of the song.
    pub fn sixteenths(&self) -> u32 {
        self.sixteenths
    }

    /// Advances by one 16th note; true on a measure boundary.
    pub fn on_beat(&mut self) -> bool {
        self.sixteenths = self.sixteenths.wrapping_add(1);
        self.at_measure_boundary()
    }

    fn at_measure_boundary(&self) -> bool {
        self.sixteenths % SIXTEENTHS_PER_MEASURE == 0
    }
}

impl SongPositionTracker for SongPosition {
    fn on_pulse(&mut self) -> bool {
        self.pulses_into_sixteenth += 1;
        if self.pulses_into_sixteenth < TICKS_PER_SIXTEENTH {
            return false;
        }
        self.pulses_into_sixteenth = 0;

        let resync = self.on_beat();
        if resync {
            debug!("Measure boundary at sixteenth {}", self.sixteenths);
        }
        resync
    }

    fn on_song_position(&mut self, sixteenths: u16) -> bool {
        self.sixteenths = u32::from(sixteenths);
        self.pulses_into_sixteenth = 0;
        info!("Song position set to sixteenth {}", self.sixteenths);
        self.at_measure_boundary()
    }

    fn reset(&mut self) {
        self.sixteenths = 0;
        self.pulses_into_sixteenth = 0;
    }
}

/// Tracker wired into the event loop for this build.
#[cfg(feature = "song-position")]
pub type ActiveTracker = SongPosition;

/// Tracker wired into the event loop for this build.
#[cfg(not(feature = "song-position"))]
pub type ActiveTracker = NoSongPosition;
