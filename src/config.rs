// config.rs

use config::{Config, ConfigError, Environment, File};
use simplelog::LevelFilter;
use std::fmt;

/// MIDI clock resolution, pulses per quarter note.
pub const TICKS_PER_BEAT: u32 = 24;
/// Added to a 0-127 control value to obtain BPM (range 40-167).
pub const BPM_OFFSET: u32 = 40;
/// Pulse index at which the beat LED is switched off (half a quarter note).
pub const LED_OFF_TICK: u32 = TICKS_PER_BEAT / 2;
/// Song position is counted in 16th notes, six clock pulses each.
pub const TICKS_PER_SIXTEENTH: u32 = TICKS_PER_BEAT / 4;
pub const SIXTEENTHS_PER_MEASURE: u32 = 16;

/// Controller number whose value sets the tempo, on any channel.
pub const TEMPO_CONTROLLER: u8 = 3;
/// Wire channel (0-based) accepting tempo Program Changes: MIDI channel 15.
pub const TEMPO_PROGRAM_CHANNEL: u8 = 14;

const ENV_PREFIX: &str = "MIDICLOCK";

/// Host-side settings. The clock constants above are fixed at build time;
/// only the surroundings of the engine are configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub device: Option<String>,
    pub log_level: LevelFilter,
    pub display: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            device: None,
            log_level: LevelFilter::Info,
            display: true,
        }
    }
}

impl Settings {
    /// Layers defaults, an optional settings file and `MIDICLOCK_*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("display", true)?;

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let layered = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        Self::from_config(&layered)
    }

    fn from_config(layered: &Config) -> Result<Self, ConfigError> {
        let device = layered.get_string("device").ok();
        let log_level = parse_level(&layered.get_string("log_level")?)?;
        let display = layered.get_bool("display")?;

        Ok(Settings {
            device,
            log_level,
            display,
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device={}, log_level={}, display={}",
            self.device.as_deref().unwrap_or("<none>"),
            self.log_level,
            self.display
        )
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(ConfigError::Message(format!("unknown log level '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants() {
        assert_eq!(LED_OFF_TICK, 12);
        assert_eq!(TICKS_PER_SIXTEENTH, 6);
        assert_eq!(TICKS_PER_SIXTEENTH * SIXTEENTHS_PER_MEASURE, 4 * TICKS_PER_BEAT);
    }

    #[test]
    fn parse_level_accepts_any_case() {
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::Warn);
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn settings_summary() {
        let settings = Settings {
            device: Some("IAC Bus 1".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            settings.to_string(),
            "device=IAC Bus 1, log_level=INFO, display=true"
        );
        assert_eq!(
            Settings::default().to_string(),
            "device=<none>, log_level=INFO, display=true"
        );
    }

    #[test]
    fn layered_defaults() {
        let layered = Config::builder()
            .set_default("log_level", "info")
            .unwrap()
            .set_default("display", true)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(Settings::from_config(&layered).unwrap(), Settings::default());
    }

    #[test]
    fn layered_overrides() {
        let layered = Config::builder()
            .set_default("log_level", "info")
            .unwrap()
            .set_default("display", true)
            .unwrap()
            .set_override("device", "Teensy MIDI")
            .unwrap()
            .set_override("log_level", "trace")
            .unwrap()
            .set_override("display", false)
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::from_config(&layered).unwrap();
        assert_eq!(settings.device.as_deref(), Some("Teensy MIDI"));
        assert_eq!(settings.log_level, LevelFilter::Trace);
        assert!(!settings.display);
    }
}
