//! Spotify Web API access.
//!
//! [`CatalogApi`] is the seam the resolvers depend on; [`SpotifyApi`]
//! implements it on top of an authenticated [`SessionManager`].

use async_trait::async_trait;
use serde::Deserialize;

use linernotes_core::model::CatalogItem;

use crate::enrich::session::{SessionManager, SessionStats};
use crate::error::EnrichResult;

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    // Spotify occasionally returns `null` entries in search pages.
    #[serde(default)]
    items: Vec<Option<TrackObject>>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: Option<String>,
    duration_ms: Option<u64>,
    popularity: Option<u32>,
    explicit: Option<bool>,
    album: Option<AlbumObject>,
    #[serde(default)]
    artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    id: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistResponse {
    #[serde(default)]
    genres: Vec<String>,
}

impl TrackObject {
    fn into_item(self) -> Option<CatalogItem> {
        let track_id = self.id?;
        let (album_id, album_release_date) = self
            .album
            .map(|a| (a.id, a.release_date))
            .unwrap_or_default();

        Some(CatalogItem {
            track_id,
            duration_ms: self.duration_ms,
            popularity: self.popularity,
            explicit: self.explicit,
            album_id,
            album_release_date,
            artist_ids: self.artists.into_iter().map(|a| a.id).collect(),
        })
    }
}

impl SearchResponse {
    fn into_items(self) -> Vec<CatalogItem> {
        self.tracks
            .map(|page| {
                page.items
                    .into_iter()
                    .flatten()
                    .filter_map(TrackObject::into_item)
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Catalog seam
// ---------------------------------------------------------------------------

/// Remote catalog operations used during enrichment.
///
/// `Ok(None)` means the call produced no usable result (a non-success
/// status, for instance); only run-aborting failures are `Err`.
#[async_trait]
pub trait CatalogApi: Send {
    /// Run a track search and return the ranked items.
    async fn search_tracks(
        &mut self,
        query: &str,
        limit: u32,
    ) -> EnrichResult<Option<Vec<CatalogItem>>>;

    /// Fetch the genre tags of an artist.
    async fn artist_genres(&mut self, artist_id: &str) -> EnrichResult<Option<Vec<String>>>;
}

/// [`CatalogApi`] backed by the Spotify Web API.
#[derive(Debug)]
pub struct SpotifyApi {
    session: SessionManager,
}

impl SpotifyApi {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session_stats(&self) -> SessionStats {
        self.session.stats()
    }
}

#[async_trait]
impl CatalogApi for SpotifyApi {
    async fn search_tracks(
        &mut self,
        query: &str,
        limit: u32,
    ) -> EnrichResult<Option<Vec<CatalogItem>>> {
        let limit = limit.to_string();
        let response: Option<SearchResponse> = self
            .session
            .get_json("/search", &[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .await?;

        Ok(response.map(SearchResponse::into_items))
    }

    async fn artist_genres(&mut self, artist_id: &str) -> EnrichResult<Option<Vec<String>>> {
        let response: Option<ArtistResponse> = self
            .session
            .get_json(&format!("/artists/{artist_id}"), &[])
            .await?;

        Ok(response.map(|artist| artist.genres))
    }
}
