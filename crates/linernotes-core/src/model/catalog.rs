use serde::{Deserialize, Serialize};

/// A single track record returned by the catalog search API.
///
/// Treated as an immutable value once returned. Optional fields mirror what
/// the API may omit for a given track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog track ID.
    pub track_id: String,
    pub duration_ms: Option<u64>,
    /// Catalog popularity score (0--100).
    pub popularity: Option<u32>,
    pub explicit: Option<bool>,
    pub album_id: Option<String>,
    /// Album release date as reported (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    pub album_release_date: Option<String>,
    /// Contributing artist IDs in catalog order. An artist the catalog
    /// lists without an ID keeps its position as `None`.
    pub artist_ids: Vec<Option<String>>,
}

impl CatalogItem {
    #[must_use]
    pub fn new(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            duration_ms: None,
            popularity: None,
            explicit: None,
            album_id: None,
            album_release_date: None,
            artist_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub fn with_popularity(mut self, popularity: u32) -> Self {
        self.popularity = Some(popularity);
        self
    }

    #[must_use]
    pub fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = Some(explicit);
        self
    }

    #[must_use]
    pub fn with_album(mut self, album_id: impl Into<String>, release_date: Option<&str>) -> Self {
        self.album_id = Some(album_id.into());
        self.album_release_date = release_date.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist_id: impl Into<String>) -> Self {
        self.artist_ids.push(Some(artist_id.into()));
        self
    }

    /// Append an artist the catalog lists without an ID.
    #[must_use]
    pub fn with_unidentified_artist(mut self) -> Self {
        self.artist_ids.push(None);
        self
    }

    /// The artist used for genre enrichment.
    ///
    /// Multi-artist tracks are attributed to the first listed artist only.
    /// When that artist has no ID there is no primary artist; later artists
    /// are never promoted.
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artist_ids.first().and_then(|id| id.as_deref())
    }
}
