use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::catalog::CatalogItem;

/// One row of the listening-history or library dataset.
///
/// Supplied externally and never modified. Any field may be null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRow {
    pub track_id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub source: Option<String>,
}

impl InputRow {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            artist: Some(artist.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_track_id(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The `(title, artist)` pair used for matching, or `None` when either
    /// is null or empty.
    pub fn match_key(&self) -> Option<(&str, &str)> {
        let title = self.title.as_deref().filter(|t| !t.is_empty())?;
        let artist = self.artist.as_deref().filter(|a| !a.is_empty())?;
        Some((title, artist))
    }
}

/// An input row joined with its catalog match.
///
/// Field names are the output dataset's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub source_track_id: Option<String>,
    pub title_original: Option<String>,
    pub artist_original: Option<String>,
    pub album_original: Option<String>,
    pub source: Option<String>,

    pub spotify_track_id: String,
    pub spotify_artist_id: Option<String>,
    pub spotify_album_id: Option<String>,
    /// First four characters of the album release date; empty when unknown.
    pub release_year: String,
    pub duration_ms: Option<u64>,
    pub duration_seconds: Option<f64>,
    pub popularity: Option<u32>,
    pub explicit: Option<bool>,
    /// Comma-and-space separated genre tags; null when there are none.
    pub genres: Option<String>,

    pub extraction_date: NaiveDate,
}

impl EnrichedRow {
    /// Assemble an output row from an input row and its match.
    #[must_use]
    pub fn new(
        input: &InputRow,
        item: &CatalogItem,
        genres: &[String],
        extraction_date: NaiveDate,
    ) -> Self {
        Self {
            source_track_id: input.track_id.clone(),
            title_original: input.title.clone(),
            artist_original: input.artist.clone(),
            album_original: input.album.clone(),
            source: input.source.clone(),
            spotify_track_id: item.track_id.clone(),
            spotify_artist_id: item.primary_artist_id().map(str::to_string),
            spotify_album_id: item.album_id.clone(),
            release_year: release_year(item.album_release_date.as_deref()),
            duration_ms: item.duration_ms,
            duration_seconds: duration_seconds(item.duration_ms),
            popularity: item.popularity,
            explicit: item.explicit,
            genres: join_genres(genres),
            extraction_date,
        }
    }
}

/// Year prefix of a catalog release date.
pub fn release_year(release_date: Option<&str>) -> String {
    release_date
        .map(|date| date.chars().take(4).collect())
        .unwrap_or_default()
}

/// Milliseconds to seconds, rounded to two decimals.
///
/// Rounds the binary value of `ms / 1000` correctly, so `1005` gives `1.0`
/// (`1.005` is stored just below the midpoint).
pub fn duration_seconds(duration_ms: Option<u64>) -> Option<f64> {
    duration_ms.and_then(|ms| format!("{:.2}", ms as f64 / 1000.0).parse().ok())
}

pub fn join_genres(genres: &[String]) -> Option<String> {
    if genres.is_empty() {
        None
    } else {
        Some(genres.join(", "))
    }
}
