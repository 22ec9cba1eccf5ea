//! Play history tracking
//!
//! Maintains a bounded, most-recent-first list of tracks whose playback began

use crate::types::Track;
use std::collections::VecDeque;
use std::sync::Arc;

/// Play history with bounded size
///
/// A track already at the top is not added again, so a RepeatOne loop or a
/// restart leaves a single entry.
#[derive(Debug, Clone)]
pub struct PlayHistory {
    /// History buffer (most recent = front)
    tracks: VecDeque<Arc<Track>>,

    /// Maximum history size
    max_size: usize,
}

impl PlayHistory {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record that `track` started playing
    ///
    /// If history is full, oldest track is discarded
    pub fn record(&mut self, track: Arc<Track>) {
        if self.max_size == 0 {
            return;
        }
        if self.tracks.front().is_some_and(|top| top.id == track.id) {
            return;
        }
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    /// Most recently started track
    pub fn latest(&self) -> Option<&Arc<Track>> {
        self.tracks.front()
    }

    /// Tracks, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Track>> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set maximum history size
    ///
    /// If new size is smaller than current, oldest entries are discarded
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.tracks.truncate(max_size);
    }
}

impl Default for PlayHistory {
    fn default() -> Self {
        Self::new(100)
    }
}
