/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::{PlaybackConfig, ScrobbleConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_scrobble")]
    pub scrobble: ScrobbleSettings,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default = "default_navigation_capacity")]
    pub navigation_capacity: usize,

    #[serde(default = "default_volume_step")]
    pub volume_step: u8,

    #[serde(default = "default_restart_threshold_secs")]
    pub restart_threshold_secs: u64,

    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrobbleSettings {
    #[serde(default = "default_fraction")]
    pub fraction: f64,

    #[serde(default = "default_ceiling_secs")]
    pub ceiling_secs: u64,

    #[serde(default = "default_seek_window_secs")]
    pub seek_window_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Interval between simulated position reports
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Track seconds played per wall-clock second
    #[serde(default = "default_speed")]
    pub speed: u32,
}

impl Settings {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `cadence.toml` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = path.map_or_else(|| PathBuf::from("cadence.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(CliError::Config(format!(
                "config file {:?} not found",
                config_path
            )));
        }

        // Override with environment variables (prefixed with CADENCE_)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
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
        if !(0.0..=1.0).contains(&self.scrobble.fraction) || self.scrobble.fraction == 0.0 {
            return Err(CliError::Config(format!(
                "scrobble fraction must be in (0, 1], got {}",
                self.scrobble.fraction
            )));
        }

        if self.scrobble.ceiling_secs == 0 {
            return Err(CliError::Config(
                "scrobble ceiling must be at least one second".to_string(),
            ));
        }

        if self.scrobble.seek_window_secs == 0 {
            return Err(CliError::Config(
                "scrobble seek window must be at least one second".to_string(),
            ));
        }

        if self.engine.tick_ms == 0 || self.engine.speed == 0 {
            return Err(CliError::Config(
                "engine tick and speed must be positive".to_string(),
            ));
        }

        if self.playback.volume_step == 0 || self.playback.volume_step > 100 {
            return Err(CliError::Config(format!(
                "volume step must be 1-100, got {}",
                self.playback.volume_step
            )));
        }

        Ok(())
    }

    /// Synchronizer tunables; volume, shuffle and repeat come from preferences
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            play_history_size: self.playback.history_size,
            navigation_capacity: self.playback.navigation_capacity,
            volume_step: self.playback.volume_step,
            restart_threshold: Duration::from_secs(self.playback.restart_threshold_secs),
            scrobble: ScrobbleConfig {
                fraction: self.scrobble.fraction,
                ceiling: Duration::from_secs(self.scrobble.ceiling_secs),
                seek_window: Duration::from_secs(self.scrobble.seek_window_secs),
            },
            ..PlaybackConfig::default()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback: default_playback(),
            scrobble: default_scrobble(),
            engine: default_engine(),
            preferences_path: default_preferences_path(),
        }
    }
}

// Default values
fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        history_size: default_history_size(),
        navigation_capacity: default_navigation_capacity(),
        volume_step: default_volume_step(),
        restart_threshold_secs: default_restart_threshold_secs(),
        seek_step_secs: default_seek_step_secs(),
    }
}

fn default_history_size() -> usize {
    100
}

fn default_navigation_capacity() -> usize {
    50
}

fn default_volume_step() -> u8 {
    5
}

fn default_restart_threshold_secs() -> u64 {
    3
}

fn default_seek_step_secs() -> u64 {
    10
}

fn default_scrobble() -> ScrobbleSettings {
    ScrobbleSettings {
        fraction: default_fraction(),
        ceiling_secs: default_ceiling_secs(),
        seek_window_secs: default_seek_window_secs(),
    }
}

fn default_fraction() -> f64 {
    0.5
}

fn default_ceiling_secs() -> u64 {
    240
}

fn default_seek_window_secs() -> u64 {
    5
}

fn default_engine() -> EngineSettings {
    EngineSettings {
        tick_ms: default_tick_ms(),
        speed: default_speed(),
    }
}

fn default_tick_ms() -> u64 {
    500
}

fn default_speed() -> u32 {
    1
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("cadence-preferences.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        let config = settings.playback_config();
        assert_eq!(config.play_history_size, 100);
        assert_eq!(config.restart_threshold, Duration::from_secs(3));
        assert_eq!(config.scrobble.ceiling, Duration::from_secs(240));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cadence.toml");
        fs::write(
            &path,
            "[scrobble]\nfraction = 0.75\n\n[engine]\nspeed = 10\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.scrobble.fraction, 0.75);
        assert_eq!(settings.scrobble.ceiling_secs, 240);
        assert_eq!(settings.engine.speed, 10);
        assert_eq!(settings.engine.tick_ms, 500);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn rejects_bad_fraction() {
        let mut settings = Settings::default();
        settings.scrobble.fraction = 1.5;
        assert!(settings.validate().is_err());
        settings.scrobble.fraction = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn fast_engine_settings_are_accepted() {
        let mut settings = Settings::default();
        settings.engine.speed = 10;
        settings.engine.tick_ms = 500;
        settings.validate().unwrap();
        settings.scrobble.seek_window_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_speed() {
        let mut settings = Settings::default();
        settings.engine.speed = 0;
        assert!(settings.validate().is_err());
    }
}
