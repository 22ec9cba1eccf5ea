//! Error types for playback management

use crate::types::QueueId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Positional index outside the queue
    #[error("Index out of range: {index} (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Queue-local identity that is not (or no longer) in the queue
    #[error("Queue entry not found: {0}")]
    UnknownEntry(QueueId),

    /// Load/decode/stream failure reported by the audio engine
    #[error("Engine error: {0}")]
    Engine(String),

    /// Catalog call failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Reading or writing persisted preferences failed
    #[error("Preferences error: {0}")]
    Preferences(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaybackError {
    /// True for the "caller passed a bad index or id" class of errors
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            PlaybackError::IndexOutOfRange { .. } | PlaybackError::UnknownEntry(_)
        )
    }
}

/// Errors raised by a catalog client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Track is not known to the catalog
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Stream URL could not be built
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(String),

    /// Remote call failed
    #[error("Request failed: {0}")]
    Request(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
