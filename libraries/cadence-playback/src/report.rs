//! Play reporting
//!
//! Reports are fire-and-forget: the synchronizer hands them to a
//! [`PlayReporter`] and moves on. [`BackgroundReporter`] performs the catalog
//! calls on a dedicated thread and logs failures; nothing is retried.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::TrackId;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Sink for play and now-playing notifications
pub trait PlayReporter: Send {
    /// A play qualified; count it once
    fn report_play(&self, track: &TrackId);

    /// A session started playing
    fn now_playing(&self, track: &TrackId);
}

impl<T: PlayReporter + Sync + ?Sized> PlayReporter for Arc<T> {
    fn report_play(&self, track: &TrackId) {
        (**self).report_play(track);
    }

    fn now_playing(&self, track: &TrackId) {
        (**self).now_playing(track);
    }
}

/// Reporter that drops everything
#[derive(Debug, Default, Clone)]
pub struct NullReporter;

impl PlayReporter for NullReporter {
    fn report_play(&self, _track: &TrackId) {}

    fn now_playing(&self, _track: &TrackId) {}
}

#[derive(Debug)]
enum ReportJob {
    Play(TrackId),
    NowPlaying(TrackId),
}

/// Runs catalog reports on a worker thread
///
/// Dropping the reporter closes the channel; the worker finishes the jobs
/// already queued and exits. [`BackgroundReporter::shutdown`] waits for that.
pub struct BackgroundReporter {
    tx: Option<Sender<ReportJob>>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundReporter {
    /// Spawn the worker thread
    pub fn spawn(catalog: Arc<dyn Catalog>) -> Result<Self> {
        let (tx, rx) = unbounded::<ReportJob>();
        let handle = thread::Builder::new()
            .name("play-reporter".to_string())
            .spawn(move || Self::worker(&*catalog, &rx))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    fn submit(&self, job: ReportJob) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(err) = tx.send(job) {
            warn!(job = ?err.0, "reporter thread is gone, dropping report");
        }
    }

    /// Close the queue and wait for pending reports to finish
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("reporter thread panicked");
            }
        }
    }

    fn worker(catalog: &dyn Catalog, rx: &Receiver<ReportJob>) {
        debug!("reporter thread started");
        for job in rx {
            match job {
                ReportJob::Play(track) => match catalog.report_play(&track) {
                    Ok(()) => info!(track = %track, "play reported"),
                    Err(err) => warn!(track = %track, error = %err, "play report failed"),
                },
                ReportJob::NowPlaying(track) => {
                    if let Err(err) = catalog.report_now_playing(&track) {
                        warn!(track = %track, error = %err, "now-playing notice failed");
                    }
                }
            }
        }
        debug!("reporter thread exiting");
    }
}

impl PlayReporter for BackgroundReporter {
    fn report_play(&self, track: &TrackId) {
        self.submit(ReportJob::Play(track.clone()));
    }

    fn now_playing(&self, track: &TrackId) {
        self.submit(ReportJob::NowPlaying(track.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::sync::Mutex;
    use url::Url;

    #[derive(Default)]
    struct RecordingCatalog {
        plays: Mutex<Vec<String>>,
        now_playing: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Catalog for RecordingCatalog {
        fn resolve_stream_url(&self, track: &TrackId) -> std::result::Result<Url, CatalogError> {
            Err(CatalogError::TrackNotFound(track.to_string()))
        }

        fn report_play(&self, track: &TrackId) -> std::result::Result<(), CatalogError> {
            self.plays.lock().unwrap().push(track.to_string());
            if self.fail {
                Err(CatalogError::Request("offline".into()))
            } else {
                Ok(())
            }
        }

        fn report_now_playing(&self, track: &TrackId) -> std::result::Result<(), CatalogError> {
            self.now_playing.lock().unwrap().push(track.to_string());
            Ok(())
        }
    }

    #[test]
    fn reports_reach_the_catalog() {
        let catalog = Arc::new(RecordingCatalog::default());
        let reporter = BackgroundReporter::spawn(catalog.clone()).unwrap();
        reporter.now_playing(&TrackId::new("a"));
        reporter.report_play(&TrackId::new("a"));
        reporter.report_play(&TrackId::new("b"));
        reporter.shutdown();

        assert_eq!(*catalog.plays.lock().unwrap(), ["a", "b"]);
        assert_eq!(*catalog.now_playing.lock().unwrap(), ["a"]);
    }

    #[test]
    fn failures_are_not_retried() {
        let catalog = Arc::new(RecordingCatalog {
            fail: true,
            ..Default::default()
        });
        let reporter = BackgroundReporter::spawn(catalog.clone()).unwrap();
        reporter.report_play(&TrackId::new("a"));
        reporter.shutdown();

        assert_eq!(catalog.plays.lock().unwrap().len(), 1);
    }
}
