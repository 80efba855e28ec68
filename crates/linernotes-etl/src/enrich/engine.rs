//! Batch enrichment.
//!
//! Drives input rows, strictly one after another, through the catalog and
//! genre resolvers and collects one [`EnrichedRow`] per matched row, in
//! input order. Rows without a title or artist and rows without a catalog
//! match produce no output.

use chrono::Utc;

use linernotes_core::model::{EnrichedRow, InputRow};
use linernotes_core::Cache;

use crate::enrich::catalog::{CatalogResolver, MatchCache, MatchKey, MatchOutcome};
use crate::enrich::genre::{GenreCache, GenreResolver};
use crate::enrich::spotify::CatalogApi;
use crate::error::EnrichResult;

/// Tunables for an [`EnrichmentEngine`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Result page size requested per search.
    pub search_limit: u32,
    /// Log progress every this many input rows; `0` disables it.
    pub progress_interval: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            search_limit: 5,
            progress_interval: 30,
        }
    }
}

/// What happened to a single input row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Enriched(Box<EnrichedRow>),
    /// Title or artist missing; nothing was looked up.
    Incomplete,
    /// Neither the primary nor the fallback search found the track.
    Unmatched,
}

/// Counters reported at the end of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub input_rows: usize,
    pub skipped_incomplete: usize,
    pub unmatched: usize,
    pub enriched: usize,
    pub match_cache_size: usize,
    pub genre_cache_size: usize,
    pub match_cache_hits: u64,
    pub genre_cache_hits: u64,
    pub fallback_searches: u64,
}

/// Output of [`EnrichmentEngine::run`].
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    pub rows: Vec<EnrichedRow>,
    pub stats: EnrichmentStats,
}

/// Orchestrates a batch through both resolvers.
#[derive(Debug)]
pub struct EnrichmentEngine<A, M = MatchCache, G = GenreCache> {
    api: A,
    catalog: CatalogResolver<M>,
    genres: GenreResolver<G>,
    progress_interval: usize,
}

impl<A: CatalogApi> EnrichmentEngine<A> {
    /// Engine with fresh in-memory caches.
    pub fn new(api: A, settings: &EngineSettings) -> Self {
        Self::with_caches(api, settings, MatchCache::new(), GenreCache::new())
    }
}

impl<A, M, G> EnrichmentEngine<A, M, G>
where
    A: CatalogApi,
    M: Cache<MatchKey, MatchOutcome>,
    G: Cache<String, Vec<String>>,
{
    /// Engine over caller-supplied caches.
    pub fn with_caches(api: A, settings: &EngineSettings, match_cache: M, genre_cache: G) -> Self {
        Self {
            api,
            catalog: CatalogResolver::new(match_cache, settings.search_limit),
            genres: GenreResolver::new(genre_cache),
            progress_interval: settings.progress_interval,
        }
    }

    /// Enrich a single row.
    pub async fn enrich_row(&mut self, row: &InputRow) -> EnrichResult<RowOutcome> {
        let Some((title, artist)) = row.match_key() else {
            return Ok(RowOutcome::Incomplete);
        };

        let Some(item) = self.catalog.resolve(&mut self.api, title, artist).await? else {
            log::warn!("No match found: {} - {}", title, artist);
            return Ok(RowOutcome::Unmatched);
        };

        let genres = match item.primary_artist_id() {
            Some(artist_id) => {
                self.genres
                    .resolve_genres(&mut self.api, artist_id)
                    .await?
            }
            None => {
                log::debug!(
                    "Match {} has no identified first artist; skipping genres",
                    item.track_id
                );
                Vec::new()
            }
        };

        let extraction_date = Utc::now().date_naive();
        Ok(RowOutcome::Enriched(Box::new(EnrichedRow::new(
            row,
            &item,
            &genres,
            extraction_date,
        ))))
    }

    /// Enrich a whole batch, preserving input order.
    ///
    /// # Errors
    ///
    /// Only run-aborting failures (rejected credentials, persistent 401s,
    /// unreachable API) are returned; no partial output is produced then.
    pub async fn run(&mut self, rows: &[InputRow]) -> EnrichResult<EnrichmentReport> {
        let total = rows.len();
        log::info!("Starting catalog enrichment for {} tracks", total);

        let mut enriched = Vec::new();
        let mut stats = EnrichmentStats {
            input_rows: total,
            ..EnrichmentStats::default()
        };

        for (idx, row) in rows.iter().enumerate().map(|(i, r)| (i + 1, r)) {
            match self.enrich_row(row).await? {
                RowOutcome::Enriched(output) => enriched.push(*output),
                RowOutcome::Incomplete => stats.skipped_incomplete += 1,
                RowOutcome::Unmatched => stats.unmatched += 1,
            }

            if self.progress_interval > 0 && idx % self.progress_interval == 0 {
                log::info!("  -> {}/{} tracks processed", idx, total);
            }
        }

        stats.enriched = enriched.len();
        stats.match_cache_size = self.catalog.cache_len();
        stats.genre_cache_size = self.genres.cache_len();
        stats.match_cache_hits = self.catalog.stats().cache_hits;
        stats.genre_cache_hits = self.genres.cache_hits();
        stats.fallback_searches = self.catalog.stats().fallback_searches;

        log::info!(
            "Enrichment complete: {} enriched, {} unmatched, {} incomplete",
            stats.enriched,
            stats.unmatched,
            stats.skipped_incomplete
        );

        Ok(EnrichmentReport {
            rows: enriched,
            stats,
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
