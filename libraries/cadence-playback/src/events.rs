//! Playback Events
//!
//! Event-based communication for UI synchronization. The synchronizer queues
//! these as it applies intents and engine events; the UI drains them.

use crate::types::{QueueId, RepeatMode, SessionId, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the playback synchronizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackStateEvent,
    },

    /// A new session began loading a track
    TrackChanged {
        session: SessionId,
        entry: QueueId,
        track_id: TrackId,
        /// Track of the superseded session (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Engine confirmed a new position
    PositionUpdate {
        position: Duration,
        duration: Duration,
    },

    /// Play report was handed to the reporter
    Scrobbled { track_id: TrackId },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue changed (tracks added/removed/reordered)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    ShuffleChanged { enabled: bool },

    RepeatChanged { mode: RepeatMode },

    /// Last entry finished and nothing follows
    QueueFinished,

    /// Informational message for the status line
    Notice { message: String },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}

/// Playback state for events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStateEvent {
    /// No track loaded
    Stopped,
    /// Currently loading a track
    Loading,
    /// Playing audio
    Playing,
    /// Paused mid-track
    Paused,
}
