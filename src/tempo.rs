//! Tempo mapping: MIDI control value to BPM to clock pulse period.
//!
//! A 7-bit control value `v` selects `v + 40` BPM. The period of one MIDI
//! clock pulse at that tempo is `60_000_000 / (bpm * 24)` microseconds,
//! truncated to the whole microsecond. Truncation makes the generated clock
//! run slightly fast (less than 1 µs per pulse, at most ~24 µs per beat).

use crate::config::{BPM_OFFSET, TICKS_PER_BEAT};
use std::fmt;
use std::time::Duration;

const MICROS_PER_MINUTE: u32 = 60_000_000;

/// Beats per minute selected by a tempo message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TempoSetting {
    bpm: u32,
}

impl TempoSetting {
    pub const MIN: TempoSetting = TempoSetting { bpm: BPM_OFFSET };
    pub const MAX: TempoSetting = TempoSetting {
        bpm: BPM_OFFSET + 127,
    };

    /// Values above 127 are masked to 7 bits, as they are on the wire.
    pub fn from_control_value(value: u8) -> Self {
        TempoSetting {
            bpm: u32::from(value & 0x7F) + BPM_OFFSET,
        }
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }
}

impl fmt::Display for TempoSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

/// Period of one MIDI clock pulse, in whole microseconds. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockInterval {
    micros: u32,
}

impl ClockInterval {
    pub fn from_tempo(tempo: TempoSetting) -> Self {
        ClockInterval {
            micros: MICROS_PER_MINUTE / (tempo.bpm * TICKS_PER_BEAT),
        }
    }

    /// Builds an interval directly, clamping zero to one microsecond.
    pub fn from_micros(micros: u32) -> Self {
        ClockInterval {
            micros: micros.max(1),
        }
    }

    pub fn as_micros(&self) -> u32 {
        self.micros
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_micros(u64::from(self.micros))
    }
}

impl fmt::Display for ClockInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} µs", self.micros)
    }
}

/// Maps a tempo control value straight to its tempo and pulse period.
pub fn map_control_value(value: u8) -> (TempoSetting, ClockInterval) {
    let tempo = TempoSetting::from_control_value(value);
    (tempo, ClockInterval::from_tempo(tempo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(TempoSetting::from_control_value(0), TempoSetting::MIN);
        assert_eq!(TempoSetting::from_control_value(127), TempoSetting::MAX);
        assert_eq!(TempoSetting::MAX.bpm(), 167);
    }

    #[test]
    fn high_bit_is_masked() {
        assert_eq!(TempoSetting::from_control_value(0x80).bpm(), 40);
    }

    #[test]
    fn interval_truncates() {
        // 60_000_000 / (120 * 24) = 20833.33
        let (_, interval) = map_control_value(80);
        assert_eq!(interval.as_micros(), 20_833);
        // 60_000_000 / (167 * 24) = 14970.05
        let (_, interval) = map_control_value(127);
        assert_eq!(interval.as_micros(), 14_970);
    }

    #[test]
    fn zero_micros_clamped() {
        assert_eq!(ClockInterval::from_micros(0).as_micros(), 1);
    }
}
