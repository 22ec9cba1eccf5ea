/// Interactive player session
///
/// Owns the synchronizer and the browse state, turns parsed commands into
/// intents and prints what happened.
use crate::catalog::StaticCatalog;
use crate::commands::{Command, HELP};
use crate::error::{CliError, Result};
use cadence_playback::{
    Catalog, NavigationHistory, PlaybackError, PlaybackEvent, PlaybackStateEvent, PlaybackSynchronizer, RepeatMode,
    SessionState, Track,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// What the browse pane shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Library,
    Artist(String),
    Album(String),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Library => f.write_str("Library"),
            View::Artist(name) => write!(f, "Artist: {}", name),
            View::Album(name) => write!(f, "Album: {}", name),
        }
    }
}

pub struct App {
    player: PlaybackSynchronizer,
    catalog: Arc<StaticCatalog>,
    navigation: NavigationHistory<View>,
    view: View,
    seek_step: f64,
}

impl App {
    pub fn new(
        player: PlaybackSynchronizer,
        catalog: Arc<StaticCatalog>,
        navigation_capacity: usize,
        seek_step: Duration,
    ) -> Self {
        Self {
            player,
            catalog,
            navigation: NavigationHistory::new(navigation_capacity),
            view: View::Library,
            seek_step: seek_step.as_secs_f64(),
        }
    }

    pub fn player(&self) -> &PlaybackSynchronizer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackSynchronizer {
        &mut self.player
    }

    pub fn into_player(self) -> PlaybackSynchronizer {
        self.player
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Run one command; returns `false` when the user asked to quit
    ///
    /// Rejected intents (bad positions, unknown ids) are printed, not returned.
    pub fn execute(&mut self, command: Command) -> bool {
        if command == Command::Quit {
            return false;
        }
        if let Err(err) = self.dispatch(command) {
            println!("error: {}", err);
        }
        true
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Toggle => self.player.toggle_play_pause()?,
            Command::Next => self.player.next()?,
            Command::Previous => self.player.previous()?,
            Command::Stop => self.player.stop()?,
            Command::Play(index) => self.player.play_index(index)?,
            Command::SeekBy(secs) => self.player.seek_relative(secs.unwrap_or(self.seek_step))?,
            Command::SeekBack(secs) => {
                self.player.seek_relative(-secs.unwrap_or(self.seek_step))?;
            }
            Command::SeekTo(secs) => self
                .player
                .seek_absolute(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))?,
            Command::Volume(level) => self.player.set_volume(level)?,
            Command::VolumeUp => self.player.volume_up()?,
            Command::VolumeDown => self.player.volume_down()?,
            Command::Mute => self.player.toggle_mute()?,
            Command::Shuffle => {
                let enabled = self.player.toggle_shuffle();
                println!("Shuffle {}", if enabled { "on" } else { "off" });
            }
            Command::Repeat => {
                let mode = self.player.cycle_repeat();
                println!("Repeat: {}", mode.label());
            }
            Command::Add(id) => {
                let track = self.lookup(&id)?;
                self.player.append(track);
            }
            Command::PlayNext(id) => {
                let track = self.lookup(&id)?;
                self.player.insert_after_current(track);
            }
            Command::Star(id) => self.toggle_star(id.as_deref())?,
            Command::Remove(index) => {
                let id = self.player.queue().id_at(index)?;
                let entry = self.player.remove(id)?;
                println!("Removed {}", entry.track.title);
            }
            Command::Move { from, to } => {
                let id = self.player.queue().id_at(from)?;
                self.player.move_entry(id, to)?;
            }
            Command::Clear => self.player.clear_queue()?,
            Command::PlayView => {
                let tracks: Vec<Track> = self.view_tracks().into_iter().cloned().collect();
                if tracks.is_empty() {
                    println!("Nothing to play here");
                } else {
                    self.player.replace_queue(tracks, 0)?;
                }
            }
            Command::Open(name) => self.open(&name)?,
            Command::Back => match self.navigation.pop() {
                Some(view) => {
                    self.view = view;
                    self.print_view();
                }
                None => println!("Already at the top"),
            },
            Command::List => self.print_view(),
            Command::Queue => self.print_queue(),
            Command::Status => self.print_status(),
            Command::History => self.print_history(),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    fn lookup(&self, id: &str) -> Result<Track> {
        self.catalog
            .find(id)
            .cloned()
            .ok_or_else(|| CliError::Command(format!("no track with id {id}")))
    }

    /// Flip the star on `id`, or on the playing track
    fn toggle_star(&self, id: Option<&str>) -> Result<()> {
        let track = match id {
            Some(id) => self.lookup(id)?.id,
            None => self
                .player
                .session()
                .map(|s| s.track().id.clone())
                .ok_or_else(|| CliError::Command("nothing is playing".to_string()))?,
        };
        let starred = !self.catalog.is_starred(&track);
        self.catalog
            .set_starred(&track, starred)
            .map_err(PlaybackError::from)?;
        println!("{} {}", if starred { "Starred" } else { "Unstarred" }, track);
        Ok(())
    }

    /// Enter an artist view, or an album view when no artist matches
    fn open(&mut self, name: &str) -> Result<()> {
        let next = if !self.catalog.by_artist(name).is_empty() {
            View::Artist(name.to_string())
        } else if !self.catalog.by_album(name).is_empty() {
            View::Album(name.to_string())
        } else {
            return Err(CliError::Command(format!("no artist or album named {name}")));
        };
        let previous = std::mem::replace(&mut self.view, next);
        self.navigation.push(previous);
        self.print_view();
        Ok(())
    }

    fn view_tracks(&self) -> Vec<&Track> {
        match &self.view {
            View::Library => self.catalog.tracks().iter().collect(),
            View::Artist(name) => self.catalog.by_artist(name),
            View::Album(name) => self.catalog.by_album(name),
        }
    }

    // ===== Output =====

    /// Print and clear pending player events
    pub fn report_events(&mut self) {
        for event in self.player.drain_events() {
            match event {
                PlaybackEvent::TrackChanged { track_id, .. } => {
                    if let Some(track) = self.catalog.find(track_id.as_str()) {
                        println!("Loading: {} - {}", track.artist, track.title);
                    }
                }
                PlaybackEvent::StateChanged { state } => match state {
                    PlaybackStateEvent::Playing => println!("[playing]"),
                    PlaybackStateEvent::Paused => println!("[paused]"),
                    PlaybackStateEvent::Stopped => println!("[stopped]"),
                    PlaybackStateEvent::Loading => {}
                },
                PlaybackEvent::Scrobbled { track_id } => println!("Scrobbled {}", track_id),
                PlaybackEvent::VolumeChanged { level, is_muted } => {
                    if is_muted {
                        println!("Volume {} (muted)", level);
                    } else {
                        println!("Volume {}", level);
                    }
                }
                PlaybackEvent::QueueFinished => println!("Queue finished"),
                PlaybackEvent::Notice { message } => println!("{}", message),
                PlaybackEvent::Error { message } => println!("error: {}", message),
                PlaybackEvent::PositionUpdate { .. }
                | PlaybackEvent::QueueChanged { .. }
                | PlaybackEvent::ShuffleChanged { .. }
                | PlaybackEvent::RepeatChanged { .. } => {}
            }
        }
    }

    fn print_view(&self) {
        println!("{}", self.view);
        match &self.view {
            View::Library => {
                for artist in self.catalog.artists() {
                    println!("  {}", artist);
                }
            }
            View::Artist(_) | View::Album(_) => {
                for track in self.view_tracks() {
                    println!("  [{}] {} - {} ({})", track.id, track.artist, track.title, clock(track.duration));
                }
            }
        }
    }

    fn print_queue(&self) {
        let snapshot = self.player.snapshot();
        if snapshot.entries.is_empty() {
            println!("Queue is empty");
            return;
        }
        for (index, entry) in snapshot.entries.iter().enumerate() {
            let marker = if snapshot.cursor == Some(index) { ">" } else { " " };
            println!(
                "{} {:>3}. {} - {} ({})",
                marker,
                index + 1,
                entry.track.artist,
                entry.track.title,
                clock(entry.track.duration)
            );
        }
        println!("Total {}", clock(self.player.queue().total_duration()));
    }

    fn print_status(&self) {
        let snapshot = self.player.snapshot();
        match &snapshot.session {
            Some(session) => {
                let state = match &session.state {
                    SessionState::Loading => "loading".to_string(),
                    SessionState::Playing => "playing".to_string(),
                    SessionState::Paused => "paused".to_string(),
                    SessionState::Ended => "ended".to_string(),
                    SessionState::Errored { reason } => format!("error ({reason})"),
                };
                println!(
                    "{} - {} [{}] {} / {}{}{}",
                    session.track.artist,
                    session.track.title,
                    state,
                    clock(session.position),
                    clock(session.track.duration),
                    if session.scrobble_eligible { " *" } else { "" },
                    if self.catalog.is_starred(&session.track.id) { " (starred)" } else { "" }
                );
            }
            None => println!("Stopped"),
        }
        let repeat = match snapshot.repeat {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        };
        println!(
            "volume {}{}  shuffle {}  repeat {}",
            snapshot.volume,
            if snapshot.muted { " (muted)" } else { "" },
            if snapshot.shuffle { "on" } else { "off" },
            repeat
        );
        let diagnostics = self.player.diagnostics();
        println!(
            "reports {}  errors {}  stale events {}",
            diagnostics.reports, diagnostics.playback_errors, diagnostics.stale_events
        );
    }

    fn print_history(&self) {
        let history = self.player.play_history();
        if history.is_empty() {
            println!("Nothing played yet");
        }
        for track in history.iter() {
            println!(
                "  {} - {} (played {}x)",
                track.artist,
                track.title,
                self.catalog.play_count(&track.id)
            );
        }
    }
}

/// m:ss
fn clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::{intake, NullEngine, NullReporter, PlaybackConfig, TrackId};
    use std::fs;
    use tempfile::TempDir;

    fn app_with_catalog(dir: &TempDir) -> App {
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{ "stream_base": "http://music.local/stream/", "tracks": [
                { "id": "a1", "title": "Opening", "artist": "Band", "duration_secs": 200 }
            ] }"#,
        )
        .unwrap();
        let catalog = Arc::new(StaticCatalog::load(&path).unwrap());
        let (_sink, events) = intake::channel();
        let player = PlaybackSynchronizer::new(
            PlaybackConfig::default(),
            Box::new(NullEngine),
            Arc::clone(&catalog) as Arc<dyn Catalog>,
            Box::new(NullReporter),
            events,
        );
        App::new(player, catalog, 10, Duration::from_secs(10))
    }

    #[test]
    fn star_toggles_named_track() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_catalog(&dir);
        let id = TrackId::new("a1");

        assert!(app.execute(Command::Star(Some("a1".into()))));
        assert!(app.catalog.is_starred(&id));
        assert!(app.execute(Command::Star(Some("a1".into()))));
        assert!(!app.catalog.is_starred(&id));
    }

    #[test]
    fn star_without_track_needs_playback() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_catalog(&dir);
        assert!(app.toggle_star(None).is_err());

        app.execute(Command::Add("a1".into()));
        app.execute(Command::Play(0));
        app.toggle_star(None).unwrap();
        assert!(app.catalog.is_starred(&TrackId::new("a1")));
    }

    #[test]
    fn clock_format() {
        assert_eq!(clock(Duration::from_secs(0)), "0:00");
        assert_eq!(clock(Duration::from_secs(185)), "3:05");
    }

    #[test]
    fn view_labels() {
        assert_eq!(View::Artist("Band".into()).to_string(), "Artist: Band");
        assert_eq!(View::Library.to_string(), "Library");
    }
}
