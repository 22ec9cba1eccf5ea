//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Catalog identifier of a track
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Track information owned by the catalog client
///
/// Queued by value behind an `Arc`; playback never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    #[serde(default)]
    pub album: Option<String>,

    /// Track duration (zero when the catalog does not know it)
    #[serde(default)]
    pub duration: Duration,
}

impl Track {
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration,
        }
    }

    /// Builder-style album setter
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

/// Queue-local identity of an entry
///
/// Assigned monotonically on insertion and never reused by the same queue, so
/// it stays valid across reorder and removal of other entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueId(u64);

impl QueueId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A track placed in the queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    pub id: QueueId,
    pub track: Arc<Track>,
}

/// Identity of one load of a track into the engine
///
/// Every load, including a RepeatOne reload of the same track, gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Off -> All -> One -> Off
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Off",
            RepeatMode::All => "All",
            RepeatMode::One => "One",
        }
    }
}

/// Scrobble eligibility policy
///
/// A play qualifies once listened time exceeds
/// `min(duration * fraction, ceiling)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrobbleConfig {
    /// Fraction of the track duration (default: 0.5)
    pub fraction: f64,

    /// Upper bound on the threshold (default: 4 minutes)
    pub ceiling: Duration,

    /// How close an engine position must land to a commanded seek target
    /// to count as the seek's confirmation (default: 5s)
    pub seek_window: Duration,
}

impl ScrobbleConfig {
    /// Listening time required for a track of `duration`
    pub fn threshold(&self, duration: Duration) -> Duration {
        if duration.is_zero() {
            return self.ceiling;
        }
        let fraction = self.fraction.clamp(0.0, 1.0);
        duration.mul_f64(fraction).min(self.ceiling)
    }
}

impl Default for ScrobbleConfig {
    fn default() -> Self {
        Self {
            fraction: 0.5,
            ceiling: Duration::from_secs(240),
            seek_window: Duration::from_secs(5),
        }
    }
}

/// Configuration for the playback synchronizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum play history size (default: 100)
    pub play_history_size: usize,

    /// Maximum navigation history size (default: 50)
    pub navigation_capacity: usize,

    /// Initial volume (0-100, default: 75)
    pub volume: u8,

    /// Volume change per step (default: 5)
    pub volume_step: u8,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// `previous()` restarts the track past this position (default: 3s)
    pub restart_threshold: Duration,

    /// Scrobble eligibility policy
    pub scrobble: ScrobbleConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            play_history_size: 100,
            navigation_capacity: 50,
            volume: 75,
            volume_step: 5,
            shuffle: false,
            repeat: RepeatMode::Off,
            restart_threshold: Duration::from_secs(3),
            scrobble: ScrobbleConfig::default(),
        }
    }
}
