//! Track matching.
//!
//! Maps a `(title, artist)` pair to a single best-guess [`CatalogItem`].
//! The catalog's top-ranked search result is taken as the match; no
//! similarity scoring is applied on top of the API's ranking.

use linernotes_core::model::CatalogItem;
use linernotes_core::{Cache, MemoryCache};

use crate::enrich::spotify::CatalogApi;
use crate::error::{EnrichError, EnrichResult};

/// Match cache key: `(title, artist)` exactly as they appear in the input.
pub type MatchKey = (String, String);

/// Match cache value. `None` records that nothing was found.
pub type MatchOutcome = Option<CatalogItem>;

/// Default in-memory match cache.
pub type MatchCache = MemoryCache<MatchKey, MatchOutcome>;

/// Primary search: title and artist as structured filters.
pub fn primary_query(title: &str, artist: &str) -> String {
    format!("track:{title} artist:{artist}")
}

/// Fallback search: title only.
pub fn fallback_query(title: &str) -> String {
    format!("track:{title}")
}

/// Lookup counters, cumulative over the resolver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub cache_hits: u64,
    pub fallback_searches: u64,
}

/// Resolves tracks against the catalog, memoizing every outcome.
#[derive(Debug)]
pub struct CatalogResolver<C = MatchCache> {
    cache: C,
    search_limit: u32,
    stats: CatalogStats,
}

impl<C> CatalogResolver<C>
where
    C: Cache<MatchKey, MatchOutcome>,
{
    pub fn new(cache: C, search_limit: u32) -> Self {
        Self {
            cache,
            search_limit,
            stats: CatalogStats::default(),
        }
    }

    /// Resolve `(title, artist)` to a catalog item.
    ///
    /// A cached outcome, negative ones included, is returned without any
    /// network call. On a miss the primary query runs first; if it yields
    /// nothing the title-only fallback runs. Whatever came out is cached
    /// under the original key.
    pub async fn resolve<A>(
        &mut self,
        api: &mut A,
        title: &str,
        artist: &str,
    ) -> EnrichResult<MatchOutcome>
    where
        A: CatalogApi + ?Sized,
    {
        let key = (title.to_string(), artist.to_string());
        let search_limit = self.search_limit;
        let stats = &mut self.stats;
        let mut searched = false;

        let found = self
            .cache
            .get_or_try_insert_with(key, || {
                searched = true;
                async move {
                    let primary = api
                        .search_tracks(&primary_query(title, artist), search_limit)
                        .await?;
                    if let Some(item) = top_result(primary) {
                        return Ok(Some(item));
                    }

                    log::info!("Fallback search: {}", title);
                    stats.fallback_searches += 1;
                    let fallback = api
                        .search_tracks(&fallback_query(title), search_limit)
                        .await?;
                    Ok::<_, EnrichError>(top_result(fallback))
                }
            })
            .await?;

        if !searched {
            self.stats.cache_hits += 1;
        }
        Ok(found)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn stats(&self) -> CatalogStats {
        self.stats
    }
}

fn top_result(items: Option<Vec<CatalogItem>>) -> Option<CatalogItem> {
    items.and_then(|items| items.into_iter().next())
}
