//! Playback session
//!
//! One load of one queue entry into the engine. A new session is created for
//! every load, including RepeatOne reloads, so events from an older load can be
//! told apart by their [`SessionId`].

use crate::scrobble::ScrobbleGate;
use crate::types::{QueueId, ScrobbleConfig, SessionId, Track};
use std::sync::Arc;
use std::time::Duration;

/// Session lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Load commanded, engine has not started output yet
    Loading,
    Playing,
    Paused,
    Ended,
    Errored { reason: String },
}

impl SessionState {
    /// Playing or paused: a seekable, resumable track is loaded
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Paused)
    }

    /// Loading, playing or paused
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            SessionState::Loading | SessionState::Playing | SessionState::Paused
        )
    }
}

/// The track currently owned by the engine
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    id: SessionId,
    entry: QueueId,
    track: Arc<Track>,
    position: Duration,
    state: SessionState,
    gate: ScrobbleGate,
}

impl PlaybackSession {
    pub fn new(id: SessionId, entry: QueueId, track: Arc<Track>, scrobble: &ScrobbleConfig) -> Self {
        let gate = ScrobbleGate::new(track.duration, scrobble);
        Self {
            id,
            entry,
            track,
            position: Duration::ZERO,
            state: SessionState::Loading,
            gate,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn entry(&self) -> QueueId {
        self.entry
    }

    pub fn track(&self) -> &Arc<Track> {
        &self.track
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn gate(&self) -> &ScrobbleGate {
        &self.gate
    }

    pub(crate) fn gate_mut(&mut self) -> &mut ScrobbleGate {
        &mut self.gate
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Clamp `position` into `[0, duration]`
    ///
    /// Tracks of unknown (zero) duration are not clamped.
    pub fn clamp(&self, position: Duration) -> Duration {
        if self.track.duration.is_zero() {
            position
        } else {
            position.min(self.track.duration)
        }
    }

    /// Apply an engine position report and feed the scrobble gate
    pub(crate) fn observe_position(&mut self, position: Duration) {
        self.position = self.clamp(position);
        let playing = self.state == SessionState::Playing;
        self.gate.observe(self.position, playing);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            entry: self.entry,
            track: Arc::clone(&self.track),
            position: self.position,
            state: self.state.clone(),
            listened: self.gate.listened(),
            scrobble_eligible: self.gate.is_eligible(),
        }
    }
}

/// Read-only view of a session for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub entry: QueueId,
    pub track: Arc<Track>,
    pub position: Duration,
    pub state: SessionState,
    pub listened: Duration,
    pub scrobble_eligible: bool,
}
