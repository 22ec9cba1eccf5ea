/// Static catalog loaded from a JSON file
///
/// Stands in for the remote library: resolves stream URLs under a base URL and
/// keeps play counts and stars in memory.
use crate::error::{CliError, Result};
use cadence_playback::{catalog::stream_url, Catalog, CatalogError, Track, TrackId};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use url::Url;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    stream_base: Url,
    tracks: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
struct CatalogTrack {
    id: String,
    title: String,
    artist: String,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    duration_secs: u64,

    /// Unavailable tracks are listed but their stream cannot be resolved
    #[serde(default = "default_available")]
    available: bool,

    #[serde(default)]
    starred: bool,
}

fn default_available() -> bool {
    true
}

pub struct StaticCatalog {
    stream_base: Url,
    tracks: Vec<Track>,
    unavailable: Vec<TrackId>,
    play_counts: Mutex<HashMap<TrackId, u32>>,
    starred: Mutex<HashSet<TrackId>>,
}

impl StaticCatalog {
    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&text).map_err(|source| CliError::CatalogParse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self> {
        if file.stream_base.cannot_be_a_base() {
            return Err(CliError::CatalogInvalid(format!(
                "stream_base {} cannot hold track paths",
                file.stream_base
            )));
        }

        let mut seen = HashSet::new();
        let mut tracks = Vec::with_capacity(file.tracks.len());
        let mut unavailable = Vec::new();
        let mut starred = HashSet::new();
        for entry in file.tracks {
            if !seen.insert(entry.id.clone()) {
                return Err(CliError::CatalogInvalid(format!(
                    "duplicate track id {}",
                    entry.id
                )));
            }
            let mut track = Track::new(
                entry.id,
                entry.title,
                entry.artist,
                Duration::from_secs(entry.duration_secs),
            );
            track.album = entry.album;
            if !entry.available {
                unavailable.push(track.id.clone());
            }
            if entry.starred {
                starred.insert(track.id.clone());
            }
            tracks.push(track);
        }

        Ok(Self {
            stream_base: file.stream_base,
            tracks,
            unavailable,
            play_counts: Mutex::new(HashMap::new()),
            starred: Mutex::new(starred),
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn find(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id.as_str() == id)
    }

    pub fn by_artist(&self, artist: &str) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| t.artist.eq_ignore_ascii_case(artist))
            .collect()
    }

    pub fn by_album(&self, album: &str) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| t.album.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(album)))
            .collect()
    }

    /// Distinct artists in catalog order
    pub fn artists(&self) -> Vec<&str> {
        let mut artists: Vec<&str> = Vec::new();
        for track in &self.tracks {
            if !artists.contains(&track.artist.as_str()) {
                artists.push(&track.artist);
            }
        }
        artists
    }

    pub fn unavailable(&self) -> &[TrackId] {
        &self.unavailable
    }

    /// Stream URL and duration of every playable track
    pub fn streams(&self) -> Vec<(Url, Duration)> {
        self.tracks
            .iter()
            .filter_map(|t| {
                self.resolve_stream_url(&t.id)
                    .ok()
                    .map(|url| (url, t.duration))
            })
            .collect()
    }

    pub fn is_starred(&self, id: &TrackId) -> bool {
        self.starred
            .lock()
            .map(|starred| starred.contains(id))
            .unwrap_or(false)
    }

    pub fn play_count(&self, id: &TrackId) -> u32 {
        self.play_counts
            .lock()
            .map(|counts| counts.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Catalog for StaticCatalog {
    fn resolve_stream_url(&self, track: &TrackId) -> std::result::Result<Url, CatalogError> {
        if self.unavailable.contains(track) || !self.tracks.iter().any(|t| &t.id == track) {
            return Err(CatalogError::TrackNotFound(track.to_string()));
        }
        stream_url(&self.stream_base, track)
    }

    fn report_play(&self, track: &TrackId) -> std::result::Result<(), CatalogError> {
        let mut counts = self
            .play_counts
            .lock()
            .map_err(|_| CatalogError::Request("play count store poisoned".to_string()))?;
        let count = counts.entry(track.clone()).or_insert(0);
        *count += 1;
        info!(track = %track, plays = *count, "play counted");
        Ok(())
    }

    fn report_now_playing(&self, track: &TrackId) -> std::result::Result<(), CatalogError> {
        info!(track = %track, "now playing");
        Ok(())
    }

    fn set_starred(&self, track: &TrackId, starred: bool) -> std::result::Result<(), CatalogError> {
        if !self.tracks.iter().any(|t| &t.id == track) {
            return Err(CatalogError::TrackNotFound(track.to_string()));
        }
        let mut stars = self
            .starred
            .lock()
            .map_err(|_| CatalogError::Request("star store poisoned".to_string()))?;
        if starred {
            stars.insert(track.clone());
        } else {
            stars.remove(track);
        }
        info!(track = %track, starred, "star updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "stream_base": "http://music.local/stream/",
        "tracks": [
            { "id": "a1", "title": "Opening", "artist": "Band", "album": "First", "duration_secs": 200 },
            { "id": "a2", "title": "Second", "artist": "Band", "album": "First", "duration_secs": 180, "starred": true },
            { "id": "b1", "title": "Solo", "artist": "Singer", "duration_secs": 90, "available": false }
        ]
    }"#;

    fn write_sample(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("catalog.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_tracks_and_resolves_urls() {
        let dir = TempDir::new().unwrap();
        let catalog = StaticCatalog::load(&write_sample(&dir, SAMPLE)).unwrap();

        assert_eq!(catalog.tracks().len(), 3);
        assert_eq!(catalog.artists(), ["Band", "Singer"]);
        assert_eq!(catalog.by_album("first").len(), 2);
        let url = catalog.resolve_stream_url(&TrackId::new("a1")).unwrap();
        assert_eq!(url.as_str(), "http://music.local/stream/a1");
        assert_eq!(catalog.streams().len(), 2);
    }

    #[test]
    fn unavailable_tracks_do_not_resolve() {
        let dir = TempDir::new().unwrap();
        let catalog = StaticCatalog::load(&write_sample(&dir, SAMPLE)).unwrap();
        let err = catalog.resolve_stream_url(&TrackId::new("b1")).unwrap_err();
        assert_eq!(err, CatalogError::TrackNotFound("b1".into()));
        assert!(catalog.resolve_stream_url(&TrackId::new("zz")).is_err());
    }

    #[test]
    fn counts_plays() {
        let dir = TempDir::new().unwrap();
        let catalog = StaticCatalog::load(&write_sample(&dir, SAMPLE)).unwrap();
        let id = TrackId::new("a2");
        catalog.report_play(&id).unwrap();
        catalog.report_play(&id).unwrap();
        assert_eq!(catalog.play_count(&id), 2);
    }

    #[test]
    fn stars_toggle_and_unknown_tracks_fail() {
        let dir = TempDir::new().unwrap();
        let catalog = StaticCatalog::load(&write_sample(&dir, SAMPLE)).unwrap();
        let a1 = TrackId::new("a1");
        assert!(catalog.is_starred(&TrackId::new("a2")));
        assert!(!catalog.is_starred(&a1));

        catalog.set_starred(&a1, true).unwrap();
        assert!(catalog.is_starred(&a1));
        catalog.set_starred(&a1, false).unwrap();
        assert!(!catalog.is_starred(&a1));

        let err = catalog.set_starred(&TrackId::new("zz"), true).unwrap_err();
        assert_eq!(err, CatalogError::TrackNotFound("zz".into()));
    }

    #[test]
    fn rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let body = r#"{ "stream_base": "http://x/", "tracks": [
            { "id": "a", "title": "A", "artist": "X" },
            { "id": "a", "title": "B", "artist": "X" }
        ] }"#;
        let err = StaticCatalog::load(&write_sample(&dir, body)).err().unwrap();
        assert!(matches!(err, CliError::CatalogInvalid(_)));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let dir = TempDir::new().unwrap();
        let err = StaticCatalog::load(&write_sample(&dir, "{ not json")).err().unwrap();
        assert!(err.to_string().contains("catalog.json"));
    }
}
