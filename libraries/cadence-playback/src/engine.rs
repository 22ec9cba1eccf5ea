//! Audio engine adapter
//!
//! The synchronizer drives an external audio engine through [`AudioEngine`].
//! Implementors deliver their callbacks as [`EngineEvent`]s through an
//! [`EventSink`](crate::intake::EventSink), never by touching playback state.

use crate::error::Result;
use crate::types::SessionId;
use std::time::Duration;
use url::Url;

/// External audio engine
///
/// Commands are issued only by the synchronizer, from the application
/// context. Each call returns once the command is accepted; the outcome
/// arrives later as an event tagged with the session passed to `load`.
pub trait AudioEngine: Send {
    /// Start loading `url`; events for this track carry `session`
    fn load(&mut self, session: SessionId, url: &Url) -> Result<()>;

    /// Resume output
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Unload the current track
    fn stop(&mut self) -> Result<()>;

    /// Jump to `position` from the start of the track
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Output level 0-100
    fn set_volume(&mut self, level: u8) -> Result<()>;
}

/// Engine callback payload
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    PositionChanged(Duration),
    PlaybackStarted,
    Paused,
    Ended,
    Error(String),
}

/// Engine callback tagged with the session it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub session: SessionId,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn new(session: SessionId, kind: EngineEventKind) -> Self {
        Self { session, kind }
    }
}

/// Engine that accepts every command and produces no events
///
/// For tests and for running the synchronizer without audio output.
#[derive(Debug, Default, Clone)]
pub struct NullEngine;

impl AudioEngine for NullEngine {
    fn load(&mut self, _session: SessionId, _url: &Url) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _level: u8) -> Result<()> {
        Ok(())
    }
}
