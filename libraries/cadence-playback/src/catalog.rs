//! Catalog client seam
//!
//! The remote library lives outside this crate. Playback only needs to turn a
//! track into a stream URL, to tell the catalog what was played, and to
//! forward favourites.

use crate::error::CatalogError;
use crate::types::TrackId;
use url::Url;

/// Remote catalog as seen by playback
///
/// Shared between the synchronizer (URL resolution) and the reporter thread
/// (play reports), hence `Send + Sync`.
pub trait Catalog: Send + Sync {
    /// Stream URL the engine should load for `track`
    fn resolve_stream_url(&self, track: &TrackId) -> Result<Url, CatalogError>;

    /// Count one play of `track`
    fn report_play(&self, track: &TrackId) -> Result<(), CatalogError>;

    /// Announce that `track` started playing
    fn report_now_playing(&self, track: &TrackId) -> Result<(), CatalogError> {
        let _ = track;
        Ok(())
    }

    /// Star or unstar `track`
    ///
    /// Catalogs without favourites accept and ignore it.
    fn set_starred(&self, track: &TrackId, starred: bool) -> Result<(), CatalogError> {
        let _ = (track, starred);
        Ok(())
    }
}

impl<T: Catalog + ?Sized> Catalog for std::sync::Arc<T> {
    fn resolve_stream_url(&self, track: &TrackId) -> Result<Url, CatalogError> {
        (**self).resolve_stream_url(track)
    }

    fn report_play(&self, track: &TrackId) -> Result<(), CatalogError> {
        (**self).report_play(track)
    }

    fn report_now_playing(&self, track: &TrackId) -> Result<(), CatalogError> {
        (**self).report_now_playing(track)
    }

    fn set_starred(&self, track: &TrackId, starred: bool) -> Result<(), CatalogError> {
        (**self).set_starred(track, starred)
    }
}

/// Build a stream URL as `<base>/<track id>`
///
/// Helper for catalogs whose streams live under one base URL.
pub fn stream_url(base: &Url, track: &TrackId) -> Result<Url, CatalogError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CatalogError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push(track.as_str());
    Ok(url)
}
