//! Catalog enrichment for linernotes.
//!
//! Extracts listening-history rows from a Google Takeout export, matches
//! them against the Spotify catalog through an authenticated,
//! rate-limit-aware session and assembles enriched rows, memoizing track
//! matches and artist genres for the length of a run.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;

pub use config::Config;
pub use enrich::engine::{EngineSettings, EnrichmentEngine, EnrichmentReport, EnrichmentStats};
pub use enrich::session::{SessionManager, SessionSettings, SessionStats};
pub use enrich::spotify::{CatalogApi, SpotifyApi};
pub use error::{EnrichError, EnrichResult};
pub use extract::{extract_watch_history, WatchEvent};
