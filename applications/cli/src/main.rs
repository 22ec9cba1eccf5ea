/// Cadence - headless terminal driver for the playback engine
use anyhow::Context;
use cadence_playback::{
    intake, BackgroundReporter, Catalog, PlaybackSynchronizer, Preferences,
};
use clap::{Parser, Subcommand};
use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod catalog;
mod commands;
mod engine;
mod error;
mod settings;

use app::App;
use catalog::StaticCatalog;
use engine::{Clock, SimulatedEngine};
use settings::Settings;

/// How long the loop waits for engine events before checking input again
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence terminal music player (headless driver)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play from a catalog file, reading commands from stdin
    Play {
        /// Catalog JSON file
        catalog: PathBuf,

        /// Configuration file path
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Validate a catalog file and print a summary
    Check {
        /// Catalog JSON file
        catalog: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { catalog, config } => {
            play(&catalog, config.as_deref())?;
        }
        Commands::Check { catalog } => {
            check(&catalog)?;
        }
    }

    Ok(())
}

fn play(catalog_path: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::load(config_path)?;
    settings.validate()?;

    let catalog = Arc::new(StaticCatalog::load(catalog_path)?);
    tracing::info!(tracks = catalog.tracks().len(), "catalog loaded");

    let preferences = Preferences::load(&settings.preferences_path)
        .with_context(|| format!("reading {}", settings.preferences_path.display()))?;
    let mut config = settings.playback_config();
    preferences.apply_to(&mut config);

    // Engine thread talks back through the intake
    let (sink, events) = intake::channel();
    let streams: HashMap<_, _> = catalog.streams().into_iter().collect();
    let engine = SimulatedEngine::spawn(
        sink,
        streams,
        Clock {
            tick: Duration::from_millis(settings.engine.tick_ms),
            speed: settings.engine.speed,
        },
    )?;
    let reporter = Arc::new(BackgroundReporter::spawn(
        Arc::clone(&catalog) as Arc<dyn Catalog>
    )?);

    let navigation_capacity = config.navigation_capacity;
    let player = PlaybackSynchronizer::new(
        config,
        Box::new(engine),
        Arc::clone(&catalog) as Arc<dyn Catalog>,
        Box::new(Arc::clone(&reporter)),
        events,
    );
    let mut app = App::new(
        player,
        Arc::clone(&catalog),
        navigation_capacity,
        Duration::from_secs(settings.playback.seek_step_secs),
    );

    println!("Cadence ready. Type 'help' for commands.");
    let lines = spawn_stdin_reader()?;
    run(&mut app, &lines);

    let preferences = app.player().preferences();
    if let Err(err) = preferences.save(&settings.preferences_path) {
        tracing::warn!(error = %err, "preferences not saved");
    }

    // Engine and reporter handles go with the player; wait for pending reports
    drop(app.into_player());
    match Arc::try_unwrap(reporter) {
        Ok(reporter) => reporter.shutdown(),
        Err(_) => tracing::warn!("reporter still shared, pending reports may be lost"),
    }
    Ok(())
}

fn run(app: &mut App, lines: &Receiver<String>) {
    loop {
        app.player_mut().pump_timeout(PUMP_INTERVAL);
        app.report_events();

        match lines.try_recv() {
            Ok(line) => match commands::parse(&line) {
                Ok(Some(command)) => {
                    if !app.execute(command) {
                        break;
                    }
                    app.report_events();
                }
                Ok(None) => {}
                Err(err) => println!("{}", err),
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }
    }
}

/// Read stdin on its own thread so the loop keeps pumping engine events
fn spawn_stdin_reader() -> anyhow::Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(rx)
}

fn check(catalog_path: &Path) -> anyhow::Result<()> {
    let catalog = StaticCatalog::load(catalog_path)?;
    let total: Duration = catalog.tracks().iter().map(|t| t.duration).sum();

    println!("Catalog: {}", catalog_path.display());
    println!("  tracks:      {}", catalog.tracks().len());
    println!("  artists:     {}", catalog.artists().len());
    println!("  playable:    {}", catalog.streams().len());
    println!("  total time:  {}s", total.as_secs());
    for id in catalog.unavailable() {
        println!("  unavailable: {}", id);
    }
    Ok(())
}
