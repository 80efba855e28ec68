//! In-memory [`CatalogApi`] for resolver and engine tests.

use std::collections::HashMap;

use async_trait::async_trait;

use linernotes_core::model::CatalogItem;

use crate::enrich::spotify::CatalogApi;
use crate::error::EnrichResult;

/// Canned search pages and artist genres, recording every call.
///
/// Unknown queries return an empty page; unknown artists behave like a
/// failed request.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    searches: HashMap<String, Option<Vec<CatalogItem>>>,
    genres: HashMap<String, Vec<String>>,
    pub search_calls: Vec<String>,
    pub artist_calls: Vec<String>,
    pub last_limit: Option<u32>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, items: Vec<CatalogItem>) -> Self {
        self.searches.insert(query.to_string(), Some(items));
        self
    }

    pub fn with_failed_search(mut self, query: &str) -> Self {
        self.searches.insert(query.to_string(), None);
        self
    }

    pub fn with_genres(mut self, artist_id: &str, genres: &[&str]) -> Self {
        self.genres.insert(
            artist_id.to_string(),
            genres.iter().map(|g| (*g).to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn search_tracks(
        &mut self,
        query: &str,
        limit: u32,
    ) -> EnrichResult<Option<Vec<CatalogItem>>> {
        self.search_calls.push(query.to_string());
        self.last_limit = Some(limit);
        Ok(self
            .searches
            .get(query)
            .cloned()
            .unwrap_or_else(|| Some(Vec::new())))
    }

    async fn artist_genres(&mut self, artist_id: &str) -> EnrichResult<Option<Vec<String>>> {
        self.artist_calls.push(artist_id.to_string());
        Ok(self.genres.get(artist_id).cloned())
    }
}
