//! Playback synchronizer - core orchestration
//!
//! Single owner of queue and session state. User intents arrive as method
//! calls; engine callbacks arrive through the [`EventIntake`] and are applied
//! by [`PlaybackSynchronizer::pump`]. Both run in the application context, so
//! state is never touched from the engine's thread.

use crate::{
    catalog::Catalog,
    engine::{AudioEngine, EngineEvent, EngineEventKind},
    error::{PlaybackError, Result},
    events::{PlaybackEvent, PlaybackStateEvent},
    history::PlayHistory,
    intake::EventIntake,
    preferences::Preferences,
    queue::Queue,
    report::PlayReporter,
    session::{PlaybackSession, SessionSnapshot, SessionState},
    types::{PlaybackConfig, QueueEntry, QueueId, RepeatMode, SessionId, Track},
    volume::Volume,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters for things that are not errors but worth watching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Engine events discarded because their session was superseded
    pub stale_events: u64,

    /// Load or playback failures (engine or stream URL resolution)
    pub playback_errors: u64,

    /// Play reports handed to the reporter
    pub reports: u64,
}

/// Everything the UI needs to draw the player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    /// Queue entries in play order
    pub entries: Vec<QueueEntry>,
    pub cursor: Option<usize>,
    pub session: Option<SessionSnapshot>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub volume: u8,
    pub muted: bool,
}

impl PlayerSnapshot {
    /// Entry under the cursor
    pub fn current(&self) -> Option<&QueueEntry> {
        self.entries.get(self.cursor?)
    }
}

/// Playback synchronizer
pub struct PlaybackSynchronizer {
    config: PlaybackConfig,

    queue: Queue,
    repeat: RepeatMode,

    /// Track currently owned by the engine
    session: Option<PlaybackSession>,

    /// Last session id handed out
    last_session: SessionId,

    engine: Box<dyn AudioEngine>,
    catalog: Arc<dyn Catalog>,
    reporter: Box<dyn PlayReporter>,
    intake: EventIntake,

    history: PlayHistory,
    volume: Volume,

    /// Failures since the last track that actually started
    consecutive_errors: usize,

    diagnostics: Diagnostics,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackSynchronizer {
    /// Create a synchronizer driving `engine`
    ///
    /// `intake` must be the receiving half of the sink given to the engine.
    pub fn new(
        config: PlaybackConfig,
        engine: Box<dyn AudioEngine>,
        catalog: Arc<dyn Catalog>,
        reporter: Box<dyn PlayReporter>,
        intake: EventIntake,
    ) -> Self {
        let mut queue = Queue::new();
        queue.set_shuffle(config.shuffle);

        let mut sync = Self {
            queue,
            repeat: config.repeat,
            session: None,
            last_session: SessionId::new(0),
            engine,
            catalog,
            reporter,
            intake,
            history: PlayHistory::new(config.play_history_size),
            volume: Volume::new(config.volume),
            consecutive_errors: 0,
            diagnostics: Diagnostics::default(),
            pending_events: Vec::new(),
            config,
        };
        if let Err(err) = sync.engine.set_volume(sync.volume.effective()) {
            warn!(error = %err, "initial volume not applied");
        }
        sync
    }

    /// Use `queue` (for instance a seeded one) instead of the default
    ///
    /// Intended right after construction; shuffle follows the config.
    pub fn with_queue(mut self, mut queue: Queue) -> Self {
        queue.set_shuffle(self.config.shuffle);
        self.queue = queue;
        self
    }

    // ===== Playback Control =====

    /// Start playing the entry `id`
    ///
    /// Supersedes whatever was playing. Load failures are not returned; they
    /// are reported as [`PlaybackEvent::Error`] and playback moves on.
    pub fn play_at(&mut self, id: QueueId) -> Result<()> {
        let entry = self.queue.get(id).cloned().ok_or(PlaybackError::UnknownEntry(id))?;
        self.queue.set_cursor(id)?;
        // A user pick starts a fresh run of attempts
        self.consecutive_errors = 0;
        self.play_entry(entry);
        Ok(())
    }

    /// Start playing the entry at `index`
    pub fn play_index(&mut self, index: usize) -> Result<()> {
        let id = self.queue.id_at(index)?;
        self.play_at(id)
    }

    /// Pause, resume, or start the cursor entry when nothing is loaded
    ///
    /// Pause and resume only command the engine; the session moves on the
    /// engine's `Paused` / `PlaybackStarted` confirmation.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        let state = self.session.as_ref().map(|s| s.state().clone());
        match state {
            // The session follows once the engine confirms
            Some(SessionState::Playing) => self.engine.pause()?,
            Some(SessionState::Paused) => self.engine.play()?,
            Some(SessionState::Loading) => {}
            _ => {
                let target = self
                    .queue
                    .cursor()
                    .or_else(|| self.queue.entries().first().map(|e| e.id));
                match target {
                    Some(id) => self.play_at(id)?,
                    None => self.emit_notice("Queue is empty"),
                }
            }
        }
        Ok(())
    }

    /// Skip to the next entry
    ///
    /// At the end of the queue with repeat off, playback is left alone.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        match self.queue.advance(self.repeat) {
            Some(id) => self.play_at(id),
            None => {
                self.emit_notice("End of queue");
                Ok(())
            }
        }
    }

    /// Go to previous entry
    ///
    /// Past `restart_threshold` into the track this restarts it instead.
    pub fn previous(&mut self) -> Result<()> {
        let restart = self.session.as_ref().is_some_and(|s| {
            s.state().is_active() && s.position() > self.config.restart_threshold
        });
        if restart {
            return self.seek_absolute(Duration::ZERO);
        }

        match self.queue.retreat(self.repeat) {
            Some(id) => self.play_at(id),
            None if self.session_is_active() => self.seek_absolute(Duration::ZERO),
            None => Ok(()),
        }
    }

    /// Stop playback and unload the track (queue and cursor are kept)
    pub fn stop(&mut self) -> Result<()> {
        self.settle_report();
        let was_loaded = self.session.take().is_some();
        if was_loaded {
            self.engine.stop()?;
            self.emit_state_changed(PlaybackStateEvent::Stopped);
        }
        Ok(())
    }

    // ===== Seek =====

    /// Seek to `position`, clamped into the track
    ///
    /// Ignored unless a track is playing or paused. The reported position
    /// changes only once the engine confirms.
    pub fn seek_absolute(&mut self, position: Duration) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if !session.state().is_active() {
            return Ok(());
        }
        let target = session.clamp(position);
        session.gate_mut().expect_seek(target);
        debug!(session = %session.id(), position = ?target, "seek");
        self.engine.seek(target)
    }

    /// Seek by `delta_secs` (negative rewinds) from the current position
    pub fn seek_relative(&mut self, delta_secs: f64) -> Result<()> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        if !delta_secs.is_finite() {
            return Ok(());
        }
        let target = (session.position().as_secs_f64() + delta_secs).max(0.0);
        let target = Duration::try_from_secs_f64(target).unwrap_or(Duration::MAX);
        self.seek_absolute(target)
    }

    // ===== Volume =====

    /// Set volume level (0-100)
    pub fn set_volume(&mut self, level: u8) -> Result<()> {
        self.volume.set_level(level);
        self.apply_volume()
    }

    pub fn volume_up(&mut self) -> Result<()> {
        self.volume.raise(self.config.volume_step);
        self.apply_volume()
    }

    pub fn volume_down(&mut self) -> Result<()> {
        self.volume.lower(self.config.volume_step);
        self.apply_volume()
    }

    /// Toggle mute; the level is kept for unmuting
    pub fn toggle_mute(&mut self) -> Result<()> {
        self.volume.toggle_mute();
        self.apply_volume()
    }

    fn apply_volume(&mut self) -> Result<()> {
        self.engine.set_volume(self.volume.effective())?;
        self.emit_volume_changed();
        Ok(())
    }

    // ===== Queue Management =====

    /// Add track to end of queue
    pub fn append(&mut self, track: impl Into<Arc<Track>>) -> QueueId {
        let id = self.queue.append(track);
        self.emit_queue_changed();
        id
    }

    /// Add tracks to end of queue, in order
    pub fn append_all<I, T>(&mut self, tracks: I) -> Vec<QueueId>
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<Track>>,
    {
        let ids = self.queue.extend(tracks);
        self.emit_queue_changed();
        ids
    }

    /// Replace the queue and start playing the entry at `start`
    ///
    /// An empty list clears the queue and stops.
    pub fn replace_queue<I, T>(&mut self, tracks: I, start: usize) -> Result<Vec<QueueId>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<Track>>,
    {
        let ids = self.queue.replace(tracks, start)?;
        self.emit_queue_changed();
        match self.queue.cursor() {
            Some(id) => self.play_at(id)?,
            None => self.stop()?,
        }
        Ok(ids)
    }

    /// Queue a track to play right after the current one
    pub fn insert_after_current(&mut self, track: impl Into<Arc<Track>>) -> QueueId {
        let id = self.queue.insert_after_current(track);
        self.emit_queue_changed();
        id
    }

    /// Remove an entry
    ///
    /// Removing the playing entry moves playback to the new cursor, or stops
    /// when nothing is left to play.
    pub fn remove(&mut self, id: QueueId) -> Result<QueueEntry> {
        let removal = self.queue.remove(id, self.repeat)?;
        self.emit_queue_changed();

        let playing_removed = self
            .session
            .as_ref()
            .is_some_and(|s| s.entry() == id && s.state().is_live());
        if playing_removed {
            match self.queue.cursor() {
                Some(next) if !removal.stop => self.play_at(next)?,
                _ => self.stop()?,
            }
        }
        Ok(removal.entry)
    }

    /// Move an entry to `new_index`; the current entry stays current
    pub fn move_entry(&mut self, id: QueueId, new_index: usize) -> Result<()> {
        self.queue.move_entry(id, new_index)?;
        self.emit_queue_changed();
        Ok(())
    }

    /// Stop and empty the queue
    pub fn clear_queue(&mut self) -> Result<()> {
        self.stop()?;
        self.queue.clear();
        self.emit_queue_changed();
        Ok(())
    }

    // ===== Shuffle & Repeat =====

    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.queue.is_shuffled() != enabled {
            self.queue.set_shuffle(enabled);
            self.pending_events.push(PlaybackEvent::ShuffleChanged { enabled });
        }
    }

    /// Flip shuffle, returning the new state
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = !self.queue.is_shuffled();
        self.set_shuffle(enabled);
        enabled
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.pending_events.push(PlaybackEvent::RepeatChanged { mode });
    }

    /// Off -> All -> One -> Off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.repeat.cycle();
        self.set_repeat(mode);
        mode
    }

    // ===== Engine Events =====

    /// Apply every engine event already queued, without blocking
    ///
    /// Returns the number of events taken from the intake.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(event) = self.intake.try_next() {
            self.apply_engine_event(event);
            count += 1;
        }
        count
    }

    /// Wait at most `timeout` for an engine event, then drain the rest
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.intake.next_timeout(timeout) {
            Some(event) => {
                self.apply_engine_event(event);
                1 + self.pump()
            }
            None => 0,
        }
    }

    /// Apply a single engine event
    ///
    /// Events for any session other than the current one are discarded.
    pub fn apply_engine_event(&mut self, event: EngineEvent) {
        let current = self.session.as_ref().map(PlaybackSession::id);
        if current != Some(event.session) {
            self.diagnostics.stale_events += 1;
            debug!(
                event_session = %event.session,
                current = ?current,
                kind = ?event.kind,
                "discarding stale engine event"
            );
            return;
        }

        match event.kind {
            EngineEventKind::PositionChanged(position) => self.on_position(position),
            EngineEventKind::PlaybackStarted => self.on_started(),
            EngineEventKind::Paused => {
                if self.session_state() == Some(&SessionState::Playing) {
                    self.set_session_state(SessionState::Paused);
                    self.emit_state_changed(PlaybackStateEvent::Paused);
                }
            }
            EngineEventKind::Ended => {
                if self.session_is_live() {
                    self.on_ended();
                }
            }
            EngineEventKind::Error(reason) => {
                if self.session_is_live() {
                    if let Some(next) = self.fail_session(reason) {
                        self.play_entry(next);
                    }
                }
            }
        }
    }

    fn on_position(&mut self, position: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.observe_position(position);
        let event = PlaybackEvent::PositionUpdate {
            position: session.position(),
            duration: session.track().duration,
        };
        let eligible = session.gate().is_eligible();
        self.pending_events.push(event);
        if eligible {
            self.settle_report();
        }
    }

    fn on_started(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let first_start = match session.state() {
            SessionState::Loading => true,
            SessionState::Paused => false,
            _ => return,
        };
        session.set_state(SessionState::Playing);
        let track = Arc::clone(session.track());
        let id = session.id();

        if first_start {
            self.consecutive_errors = 0;
            info!(session = %id, track = %track.id, title = %track.title, "playback started");
            self.history.record(Arc::clone(&track));
            self.reporter.now_playing(&track.id);
        }
        self.emit_state_changed(PlaybackStateEvent::Playing);
    }

    fn on_ended(&mut self) {
        self.set_session_state(SessionState::Ended);
        self.settle_report();
        if let Some(session) = &self.session {
            debug!(session = %session.id(), "track ended");
        }

        match self.queue.advance(self.repeat) {
            Some(id) => {
                if let Some(entry) = self.queue.get(id).cloned() {
                    self.play_entry(entry);
                }
            }
            None => self.finish_queue(),
        }
    }

    // ===== Sessions =====

    /// Load `entry`, skipping past entries that fail to load
    fn play_entry(&mut self, mut entry: QueueEntry) {
        loop {
            match self.start_session(&entry) {
                Ok(()) => return,
                Err(reason) => match self.fail_session(reason) {
                    Some(next) => entry = next,
                    None => return,
                },
            }
        }
    }

    /// Supersede the current session and command the load
    ///
    /// Returns the failure reason when the stream URL cannot be resolved or
    /// the engine rejects the load.
    fn start_session(&mut self, entry: &QueueEntry) -> std::result::Result<(), String> {
        self.settle_report();
        let previous_track_id = self.session.take().map(|s| s.track().id.clone());

        self.last_session = self.last_session.next();
        let id = self.last_session;
        let track = Arc::clone(&entry.track);
        self.session = Some(PlaybackSession::new(
            id,
            entry.id,
            Arc::clone(&track),
            &self.config.scrobble,
        ));
        debug!(session = %id, entry = %entry.id, track = %track.id, "loading track");

        self.pending_events.push(PlaybackEvent::TrackChanged {
            session: id,
            entry: entry.id,
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.emit_state_changed(PlaybackStateEvent::Loading);

        let url = self
            .catalog
            .resolve_stream_url(&track.id)
            .map_err(|e| PlaybackError::from(e).to_string())?;
        self.engine.load(id, &url).map_err(|e| e.to_string())
    }

    /// Mark the current session errored and pick what to try next
    ///
    /// An unplayable track is skipped even under RepeatOne. After as many
    /// consecutive failures as there are entries, playback stops.
    fn fail_session(&mut self, reason: String) -> Option<QueueEntry> {
        if let Some(session) = &self.session {
            warn!(session = %session.id(), track = %session.track().id, reason = %reason, "playback failed");
        }
        self.set_session_state(SessionState::Errored {
            reason: reason.clone(),
        });
        self.settle_report();
        self.diagnostics.playback_errors += 1;
        self.consecutive_errors += 1;
        self.pending_events.push(PlaybackEvent::Error { message: reason });

        if self.consecutive_errors >= self.queue.len().max(1) {
            warn!(failures = self.consecutive_errors, "giving up after repeated failures");
            self.halt_engine();
            self.emit_notice("Playback stopped after repeated errors");
            self.emit_state_changed(PlaybackStateEvent::Stopped);
            return None;
        }

        let repeat = match self.repeat {
            RepeatMode::One => RepeatMode::Off,
            other => other,
        };
        match self.queue.advance(repeat) {
            Some(id) => self.queue.get(id).cloned(),
            None => {
                self.finish_queue();
                None
            }
        }
    }

    /// Nothing left to play
    fn finish_queue(&mut self) {
        info!("queue finished");
        self.halt_engine();
        self.queue.clear_cursor();
        self.pending_events.push(PlaybackEvent::QueueFinished);
        self.emit_state_changed(PlaybackStateEvent::Stopped);
    }

    fn halt_engine(&mut self) {
        if let Err(err) = self.engine.stop() {
            warn!(error = %err, "engine stop failed");
        }
    }

    /// Hand the current session's play to the reporter if it qualifies
    fn settle_report(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.gate_mut().take_report() {
            return;
        }
        let track_id = session.track().id.clone();
        info!(session = %session.id(), track = %track_id, "reporting play");
        self.reporter.report_play(&track_id);
        self.diagnostics.reports += 1;
        self.pending_events.push(PlaybackEvent::Scrobbled { track_id });
    }

    fn set_session_state(&mut self, state: SessionState) {
        if let Some(session) = self.session.as_mut() {
            session.set_state(state);
        }
    }

    fn session_state(&self) -> Option<&SessionState> {
        self.session.as_ref().map(PlaybackSession::state)
    }

    fn session_is_live(&self) -> bool {
        self.session_state().is_some_and(SessionState::is_live)
    }

    fn session_is_active(&self) -> bool {
        self.session_state().is_some_and(SessionState::is_active)
    }

    // ===== State Queries =====

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            entries: self.queue.entries().to_vec(),
            cursor: self.queue.cursor_index(),
            session: self.session.as_ref().map(PlaybackSession::snapshot),
            shuffle: self.queue.is_shuffled(),
            repeat: self.repeat,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Tracks whose playback began, most recent first
    pub fn play_history(&self) -> &PlayHistory {
        &self.history
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Current volume, shuffle and repeat, ready to persist
    pub fn preferences(&self) -> Preferences {
        Preferences {
            volume: self.volume.level(),
            shuffle: self.queue.is_shuffled(),
            repeat: self.repeat,
        }
    }

    // ===== Events =====

    /// Get and clear pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit_state_changed(&mut self, state: PlaybackStateEvent) {
        self.pending_events.push(PlaybackEvent::StateChanged { state });
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_notice(&mut self, message: &str) {
        self.pending_events.push(PlaybackEvent::Notice {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullEngine;
    use crate::error::CatalogError;
    use crate::intake;
    use crate::report::NullReporter;
    use crate::types::TrackId;
    use url::Url;

    struct OpenCatalog;

    impl Catalog for OpenCatalog {
        fn resolve_stream_url(&self, track: &TrackId) -> std::result::Result<Url, CatalogError> {
            Url::parse(&format!("mem://stream/{}", track)).map_err(|e| CatalogError::InvalidUrl(e.to_string()))
        }

        fn report_play(&self, _track: &TrackId) -> std::result::Result<(), CatalogError> {
            Ok(())
        }
    }

    fn synchronizer() -> PlaybackSynchronizer {
        let (_sink, intake) = intake::channel();
        PlaybackSynchronizer::new(
            PlaybackConfig::default(),
            Box::new(NullEngine),
            Arc::new(OpenCatalog),
            Box::new(NullReporter),
            intake,
        )
        .with_queue(Queue::with_seed(1))
    }

    fn track(id: &str, secs: u64) -> Track {
        Track::new(id, id.to_uppercase(), "Artist", Duration::from_secs(secs))
    }

    fn started(sync: &mut PlaybackSynchronizer) -> SessionId {
        let id = sync.session().unwrap().id();
        sync.apply_engine_event(EngineEvent::new(id, EngineEventKind::PlaybackStarted));
        id
    }

    #[test]
    fn play_starts_in_loading() {
        let mut sync = synchronizer();
        let a = sync.append(track("a", 100));
        sync.play_at(a).unwrap();

        let session = sync.session().unwrap();
        assert_eq!(session.state(), &SessionState::Loading);
        assert_eq!(session.entry(), a);

        started(&mut sync);
        assert_eq!(sync.session().unwrap().state(), &SessionState::Playing);
        assert_eq!(sync.play_history().len(), 1);
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let mut sync = synchronizer();
        let a = sync.append(track("a", 100));
        sync.play_at(a).unwrap();
        started(&mut sync);

        let id = sync.session().unwrap().id();

        sync.toggle_play_pause().unwrap();
        assert_eq!(sync.session().unwrap().state(), &SessionState::Playing);
        sync.apply_engine_event(EngineEvent::new(id, EngineEventKind::Paused));
        assert_eq!(sync.session().unwrap().state(), &SessionState::Paused);

        sync.toggle_play_pause().unwrap();
        assert_eq!(sync.session().unwrap().state(), &SessionState::Paused);
        sync.apply_engine_event(EngineEvent::new(id, EngineEventKind::PlaybackStarted));
        assert_eq!(sync.session().unwrap().state(), &SessionState::Playing);
    }

    #[test]
    fn toggle_with_nothing_loaded_plays_first() {
        let mut sync = synchronizer();
        let ids = sync.append_all([track("a", 100), track("b", 100)]);
        sync.toggle_play_pause().unwrap();
        assert_eq!(sync.session().unwrap().entry(), ids[0]);
    }

    #[test]
    fn toggle_on_empty_queue_is_a_notice() {
        let mut sync = synchronizer();
        sync.toggle_play_pause().unwrap();
        assert!(sync.session().is_none());
        assert!(sync
            .drain_events()
            .contains(&PlaybackEvent::Notice { message: "Queue is empty".into() }));
    }

    #[test]
    fn bad_index_is_out_of_range() {
        let mut sync = synchronizer();
        sync.append(track("a", 100));
        assert!(sync.play_index(3).unwrap_err().is_out_of_range());
        assert!(sync.session().is_none());
    }

    #[test]
    fn volume_and_mute() {
        let mut sync = synchronizer();
        assert_eq!(sync.volume().level(), 75);
        sync.volume_up().unwrap();
        assert_eq!(sync.volume().level(), 80);
        sync.set_volume(120).unwrap();
        assert_eq!(sync.volume().level(), 100);
        sync.toggle_mute().unwrap();
        let snapshot = sync.snapshot();
        assert!(snapshot.muted);
        assert_eq!(snapshot.volume, 100);
        sync.volume_down().unwrap();
        assert_eq!(sync.volume().level(), 95);
    }

    #[test]
    fn repeat_cycles_and_is_reported() {
        let mut sync = synchronizer();
        assert_eq!(sync.cycle_repeat(), RepeatMode::All);
        assert_eq!(sync.cycle_repeat(), RepeatMode::One);
        assert_eq!(sync.preferences().repeat, RepeatMode::One);
        let events = sync.drain_events();
        assert_eq!(events.len(), 2);
        assert!(!sync.has_pending_events());
    }

    #[test]
    fn seek_ignored_while_loading() {
        let mut sync = synchronizer();
        let a = sync.append(track("a", 100));
        sync.play_at(a).unwrap();
        sync.seek_absolute(Duration::from_secs(50)).unwrap();
        sync.seek_relative(f64::NAN).unwrap();
        assert_eq!(sync.session().unwrap().position(), Duration::ZERO);
    }
}
