use serde::{Deserialize, Serialize};

use super::Phase;
use crate::error::ConfigError;

/// Validated scheduler configuration.
///
/// Fields are private so an invalid config cannot exist: all durations must
/// be positive and `cycle_length >= 1`. Deserialization goes through the
/// same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedulerConfig", into = "RawSchedulerConfig")]
pub struct SchedulerConfig {
    focus_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
    cycle_length: u64,
}

/// Unvalidated mirror used for serde.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawSchedulerConfig {
    focus_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
    cycle_length: u64,
}

impl TryFrom<RawSchedulerConfig> for SchedulerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSchedulerConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.focus_secs,
            raw.short_break_secs,
            raw.long_break_secs,
            raw.cycle_length,
        )
    }
}

impl From<SchedulerConfig> for RawSchedulerConfig {
    fn from(cfg: SchedulerConfig) -> Self {
        Self {
            focus_secs: cfg.focus_secs,
            short_break_secs: cfg.short_break_secs,
            long_break_secs: cfg.long_break_secs,
            cycle_length: cfg.cycle_length,
        }
    }
}

impl SchedulerConfig {
    /// Build a config, rejecting non-positive durations and a zero cycle.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidConfiguration` naming the offending
    /// field; the caller gets no scheduler from a bad config.
    pub fn new(
        focus_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        cycle_length: u64,
    ) -> Result<Self, ConfigError> {
        fn positive(field: &str, value: u64) -> Result<u64, ConfigError> {
            if value == 0 {
                return Err(ConfigError::InvalidConfiguration {
                    field: field.to_string(),
                    message: "duration must be greater than zero".to_string(),
                });
            }
            Ok(value)
        }

        if cycle_length == 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "cycle_length".to_string(),
                message: "cycle length must be at least 1".to_string(),
            });
        }

        Ok(Self {
            focus_secs: positive("focus_secs", focus_secs)?,
            short_break_secs: positive("short_break_secs", short_break_secs)?,
            long_break_secs: positive("long_break_secs", long_break_secs)?,
            cycle_length,
        })
    }

    /// Configured duration of a phase, in seconds.
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }

    pub fn focus_secs(&self) -> u64 {
        self.focus_secs
    }

    pub fn short_break_secs(&self) -> u64 {
        self.short_break_secs
    }

    pub fn long_break_secs(&self) -> u64 {
        self.long_break_secs
    }

    pub fn cycle_length(&self) -> u64 {
        self.cycle_length
    }
}

impl Default for SchedulerConfig {
    /// The classic dashboard defaults: 25/5/15 minutes, long break every 4th.
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            cycle_length: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let cfg = SchedulerConfig::new(1500, 300, 900, 4).unwrap();
        assert_eq!(cfg.focus_secs(), 1500);
        assert_eq!(cfg.duration_of(Phase::ShortBreak), 300);
        assert_eq!(cfg.duration_of(Phase::LongBreak), 900);
        assert_eq!(cfg.cycle_length(), 4);
    }

    #[test]
    fn zero_duration_rejected() {
        for (f, s, l) in [(0, 300, 900), (1500, 0, 900), (1500, 300, 0)] {
            let err = SchedulerConfig::new(f, s, l, 4).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
        }
    }

    #[test]
    fn zero_cycle_rejected() {
        let err = SchedulerConfig::new(1500, 300, 900, 0).unwrap_err();
        match err {
            ConfigError::InvalidConfiguration { field, .. } => {
                assert_eq!(field, "cycle_length");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn deserialization_validates() {
        let bad = r#"{"focus_secs":0,"short_break_secs":300,"long_break_secs":900,"cycle_length":4}"#;
        assert!(serde_json::from_str::<SchedulerConfig>(bad).is_err());

        let good = r#"{"focus_secs":1500,"short_break_secs":300,"long_break_secs":900,"cycle_length":4}"#;
        let cfg: SchedulerConfig = serde_json::from_str(good).unwrap();
        assert_eq!(cfg, SchedulerConfig::new(1500, 300, 900, 4).unwrap());
    }

    #[test]
    fn default_matches_dashboard() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.focus_secs(), 1500);
        assert_eq!(cfg.short_break_secs(), 300);
        assert_eq!(cfg.long_break_secs(), 900);
        assert_eq!(cfg.cycle_length(), 4);
    }
}
