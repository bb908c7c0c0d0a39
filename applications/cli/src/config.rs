//! CLI configuration

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tunebox_playback::SessionConfig;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tunebox.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub playback: SessionConfig,

    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token for uploads
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Length the simulated engine assigns to every track
    #[serde(default = "default_track_secs")]
    pub track_secs: f64,

    /// Clock resolution
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// When false, every play is refused as an autoplay-policy rejection
    #[serde(default = "default_allow_play")]
    pub allow_play: bool,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tunebox.toml` is used when
    /// present. `TUNEBOX_`-prefixed variables override both, with `__`
    /// between nested keys (`TUNEBOX_SERVER__URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TUNEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.server.url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "server.url must be an http(s) URL, got {url:?}"
            )));
        }

        if !(self.engine.track_secs.is_finite() && self.engine.track_secs > 0.0) {
            return Err(CliError::Config(
                "engine.track_secs must be a positive number".to_string(),
            ));
        }

        if self.engine.tick_ms == 0 {
            return Err(CliError::Config("engine.tick_ms must be at least 1".to_string()));
        }

        let threshold = self.playback.restart_threshold_secs;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(CliError::Config(
                "playback.restart_threshold_secs must be zero or more".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_track_secs() -> f64 {
    30.0
}

fn default_tick_ms() -> u64 {
    250
}

fn default_allow_play() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            track_secs: default_track_secs(),
            tick_ms: default_tick_ms(),
            allow_play: default_allow_play(),
        }
    }
}
