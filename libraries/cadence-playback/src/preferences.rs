//! Persisted playback preferences
//!
//! Volume, shuffle and repeat survive restarts. Queue and navigation do not.

use crate::error::{PlaybackError, Result};
use crate::types::{PlaybackConfig, RepeatMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// User preferences stored as TOML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Volume level (0-100)
    pub volume: u8,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: 75,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl Preferences {
    /// Read preferences from `path`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let mut prefs: Self =
            toml::from_str(&text).map_err(|e| PlaybackError::Preferences(e.to_string()))?;
        prefs.volume = prefs.volume.min(100);
        Ok(prefs)
    }

    /// Write preferences to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let text =
            toml::to_string_pretty(self).map_err(|e| PlaybackError::Preferences(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Overlay these preferences on a synchronizer config
    pub fn apply_to(&self, config: &mut PlaybackConfig) {
        config.volume = self.volume.min(100);
        config.shuffle = self.shuffle;
        config.repeat = self.repeat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let prefs = Preferences {
            volume: 40,
            shuffle: true,
            repeat: RepeatMode::All,
        };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "repeat = \"one\"\nvolume = 90\n").unwrap();
        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.repeat, RepeatMode::One);
        assert_eq!(prefs.volume, 90);
        assert!(!prefs.shuffle);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "volume = [").unwrap();
        let err = Preferences::load(&path).unwrap_err();
        assert!(matches!(err, PlaybackError::Preferences(_)));
    }

    #[test]
    fn applies_to_config() {
        let mut config = PlaybackConfig::default();
        Preferences {
            volume: 10,
            shuffle: true,
            repeat: RepeatMode::One,
        }
        .apply_to(&mut config);
        assert_eq!(config.volume, 10);
        assert!(config.shuffle);
        assert_eq!(config.repeat, RepeatMode::One);
    }
}
