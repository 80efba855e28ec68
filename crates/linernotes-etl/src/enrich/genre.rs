//! Artist genre lookup, memoized per artist.

use linernotes_core::{Cache, MemoryCache};

use crate::enrich::spotify::CatalogApi;
use crate::error::{EnrichError, EnrichResult};

/// Default in-memory genre cache keyed by catalog artist ID.
pub type GenreCache = MemoryCache<String, Vec<String>>;

#[derive(Debug)]
pub struct GenreResolver<C = GenreCache> {
    cache: C,
    cache_hits: u64,
}

impl<C> GenreResolver<C>
where
    C: Cache<String, Vec<String>>,
{
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            cache_hits: 0,
        }
    }

    /// Genre tags for `artist_id`, fetched at most once per artist.
    ///
    /// A failed fetch degrades to an empty list, which is cached like any
    /// other result.
    pub async fn resolve_genres<A>(
        &mut self,
        api: &mut A,
        artist_id: &str,
    ) -> EnrichResult<Vec<String>>
    where
        A: CatalogApi + ?Sized,
    {
        let mut fetched = false;

        let genres = self
            .cache
            .get_or_try_insert_with(artist_id.to_string(), || {
                fetched = true;
                async move {
                    let genres = api.artist_genres(artist_id).await?.unwrap_or_else(|| {
                        log::debug!("No genres available for artist {}", artist_id);
                        Vec::new()
                    });
                    Ok::<_, EnrichError>(genres)
                }
            })
            .await?;

        if !fetched {
            self.cache_hits += 1;
        }
        Ok(genres)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }
}
