//! Cadence - Playback Queue & Synchronization
//!
//! Queue and playback-state logic for the Cadence terminal player.
//!
//! This crate provides:
//! - Queue store with stable entry identity and an identity-based cursor
//! - Shuffle that keeps the playing track in place and restores insertion order
//! - Repeat modes (Off, All, One)
//! - Navigation history (bounded back-stack of UI contexts)
//! - Play history (most recent first)
//! - Exactly-once play reporting ("scrobbling")
//! - Volume with mute
//!
//! # Architecture
//!
//! `cadence-playback` does not decode audio and does not talk to the network.
//! The audio engine and the catalog are provided via traits ([`AudioEngine`],
//! [`Catalog`]). The engine reports back through an [`EventSink`]; the
//! [`PlaybackSynchronizer`] drains those events in the application context,
//! so engine callbacks never race with user intents.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_playback::{
//!     intake, Catalog, CatalogError, NullEngine, NullReporter, PlaybackConfig,
//!     PlaybackSynchronizer, Track, TrackId,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//! use url::Url;
//!
//! struct Local;
//!
//! impl Catalog for Local {
//!     fn resolve_stream_url(&self, track: &TrackId) -> Result<Url, CatalogError> {
//!         Url::parse(&format!("file:///music/{track}.flac"))
//!             .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
//!     }
//!
//!     fn report_play(&self, _track: &TrackId) -> Result<(), CatalogError> {
//!         Ok(())
//!     }
//! }
//!
//! let (_sink, events) = intake::channel();
//! let mut player = PlaybackSynchronizer::new(
//!     PlaybackConfig::default(),
//!     Box::new(NullEngine),
//!     Arc::new(Local),
//!     Box::new(NullReporter),
//!     events,
//! );
//!
//! let first = player.append(Track::new("t1", "My Song", "Artist Name", Duration::from_secs(180)));
//! player.play_at(first).unwrap();
//! player.pump();
//! assert!(player.snapshot().session.is_some());
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use cadence_playback::{Queue, RepeatMode, Track};
//! use std::time::Duration;
//!
//! let mut queue = Queue::new();
//! let ids = queue.extend((1..=5).map(|n| {
//!     Track::new(format!("t{n}"), format!("Song {n}"), "Artist", Duration::from_secs(200))
//! }));
//! queue.set_cursor(ids[2]).unwrap();
//!
//! queue.set_shuffle(true);
//! assert_eq!(queue.cursor_index(), Some(2));
//! queue.set_shuffle(false);
//!
//! assert_eq!(queue.peek_next(RepeatMode::One), Some(ids[2]));
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod intake;
pub mod navigation;
pub mod policy;
pub mod preferences;
pub mod queue;
pub mod report;
pub mod scrobble;
pub mod session;
pub mod shuffle;
pub mod synchronizer;
pub mod types;
pub mod volume;

pub use catalog::Catalog;
pub use engine::{AudioEngine, EngineEvent, EngineEventKind, NullEngine};
pub use error::{CatalogError, PlaybackError, Result};
pub use events::{PlaybackEvent, PlaybackStateEvent};
pub use history::PlayHistory;
pub use intake::{EventIntake, EventSink};
pub use navigation::NavigationHistory;
pub use preferences::Preferences;
pub use queue::{Queue, Removal};
pub use report::{BackgroundReporter, NullReporter, PlayReporter};
pub use scrobble::{GateState, ScrobbleGate};
pub use session::{PlaybackSession, SessionSnapshot, SessionState};
pub use synchronizer::{Diagnostics, PlaybackSynchronizer, PlayerSnapshot};
pub use types::{
    PlaybackConfig, QueueEntry, QueueId, RepeatMode, ScrobbleConfig, SessionId, Track, TrackId,
};
pub use volume::Volume;
