//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    /// Nothing playing; position at the start of the current track
    #[default]
    Stopped,

    /// Play issued and not known to have failed
    Playing,

    /// Paused mid-track
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the last track ends
    #[default]
    Off,

    /// Wrap to the first track
    All,

    /// Replay the current track when it ends
    One,
}

impl RepeatMode {
    /// Next mode in the Off → All → One → Off cycle
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `previous` restarts the current track past this position (default: 3.0s)
    pub restart_threshold_secs: f64,

    /// Tracks remembered for shuffled `previous` (default: 50)
    pub history_size: usize,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Fixed seed for shuffle picks; `None` seeds from the OS
    pub shuffle_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restart_threshold_secs: 3.0,
            history_size: 50,
            shuffle: false,
            repeat: RepeatMode::Off,
            shuffle_seed: None,
        }
    }
}

/// Render seconds as `m:ss`
///
/// Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.restart_threshold_secs, 3.0);
        assert_eq!(config.history_size, 50);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(config.shuffle_seed.is_none());
    }

    #[test]
    fn repeat_cycles_through_all_modes() {
        assert_eq!(RepeatMode::Off.cycle(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycle(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycle(), RepeatMode::Off);
    }

    #[test]
    fn format_time_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn format_time_handles_unknown_duration() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-4.0), "0:00");
    }
}
