/// Simulated audio engine
///
/// Runs on its own thread like a real engine: commands go in over a channel,
/// position/end/error callbacks come back through the playback event sink.
/// No audio is produced; the clock advances `speed` track seconds per second.
use cadence_playback::{
    AudioEngine, EngineEventKind, EventSink, PlaybackError, Result, SessionId,
};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::collections::HashMap;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

#[derive(Debug)]
enum EngineCommand {
    Load(SessionId, Url),
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(u8),
    Shutdown,
}

/// Tuning for the simulated clock
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub tick: Duration,
    pub speed: u32,
}

pub struct SimulatedEngine {
    command_tx: Sender<EngineCommand>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedEngine {
    /// Spawn the engine thread
    ///
    /// `streams` maps every playable URL to its duration; anything else fails
    /// to load with an engine error.
    pub fn spawn(sink: EventSink, streams: HashMap<Url, Duration>, clock: Clock) -> Result<Self> {
        let (command_tx, command_rx) = bounded(32);
        let handle = thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || {
                let mut worker = Worker::new(sink, streams, clock);
                worker.run(&command_rx);
            })?;

        Ok(Self {
            command_tx,
            handle: Some(handle),
        })
    }

    fn send(&self, command: EngineCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| PlaybackError::Engine("engine thread is not running".to_string()))
    }
}

impl AudioEngine for SimulatedEngine {
    fn load(&mut self, session: SessionId, url: &Url) -> Result<()> {
        self.send(EngineCommand::Load(session, url.clone()))
    }

    fn play(&mut self) -> Result<()> {
        self.send(EngineCommand::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.send(EngineCommand::Pause)
    }

    fn stop(&mut self) -> Result<()> {
        self.send(EngineCommand::Stop)
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.send(EngineCommand::Seek(position))
    }

    fn set_volume(&mut self, level: u8) -> Result<()> {
        self.send(EngineCommand::Volume(level))
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        let _ = self.command_tx.send(EngineCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("engine thread panicked");
            }
        }
    }
}

/// Loaded track inside the engine thread
struct Loaded {
    session: SessionId,
    duration: Duration,
    position: Duration,
    playing: bool,
    started: bool,
}

struct Worker {
    sink: EventSink,
    streams: HashMap<Url, Duration>,
    clock: Clock,
    loaded: Option<Loaded>,
    volume: u8,
}

impl Worker {
    fn new(sink: EventSink, streams: HashMap<Url, Duration>, clock: Clock) -> Self {
        Self {
            sink,
            streams,
            clock,
            loaded: None,
            volume: 100,
        }
    }

    fn run(&mut self, commands: &Receiver<EngineCommand>) {
        debug!("engine thread started");
        let mut last_tick = Instant::now();
        loop {
            match commands.recv_timeout(self.clock.tick) {
                Ok(EngineCommand::Shutdown) => break,
                Ok(command) => self.handle(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            if now.duration_since(last_tick) >= self.clock.tick {
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                if !self.advance(elapsed) {
                    break;
                }
            }
        }
        debug!("engine thread exiting");
    }

    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Load(session, url) => match self.streams.get(&url) {
                Some(&duration) => {
                    debug!(session = %session, url = %url, "engine loading");
                    self.loaded = Some(Loaded {
                        session,
                        duration,
                        position: Duration::ZERO,
                        playing: true,
                        started: false,
                    });
                }
                None => {
                    self.loaded = None;
                    self.sink.emit(
                        session,
                        EngineEventKind::Error(format!("cannot open stream {}", url)),
                    );
                }
            },
            EngineCommand::Play => {
                if let Some(track) = self.loaded.as_mut() {
                    track.playing = true;
                    let session = track.session;
                    self.sink.emit(session, EngineEventKind::PlaybackStarted);
                }
            }
            EngineCommand::Pause => {
                if let Some(track) = self.loaded.as_mut() {
                    track.playing = false;
                    let session = track.session;
                    self.sink.emit(session, EngineEventKind::Paused);
                }
            }
            EngineCommand::Stop => self.loaded = None,
            EngineCommand::Seek(position) => {
                if let Some(track) = self.loaded.as_mut() {
                    track.position = position.min(track.duration);
                    let (session, position) = (track.session, track.position);
                    self.sink
                        .emit(session, EngineEventKind::PositionChanged(position));
                }
            }
            EngineCommand::Volume(level) => {
                self.volume = level;
                debug!(level, "engine volume");
            }
            EngineCommand::Shutdown => {}
        }
    }

    /// Move the clock; returns `false` once nobody listens any more
    fn advance(&mut self, elapsed: Duration) -> bool {
        let Some(track) = self.loaded.as_mut() else {
            return true;
        };
        let session = track.session;

        if !track.started {
            track.started = true;
            return self.sink.emit(session, EngineEventKind::PlaybackStarted);
        }
        if !track.playing {
            return true;
        }

        track.position = (track.position + elapsed * self.clock.speed).min(track.duration);
        let position = track.position;
        let finished = position >= track.duration;

        let alive = self
            .sink
            .emit(session, EngineEventKind::PositionChanged(position));
        if finished {
            self.loaded = None;
            return self.sink.emit(session, EngineEventKind::Ended);
        }
        alive
    }
}
