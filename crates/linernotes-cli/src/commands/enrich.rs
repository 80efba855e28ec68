use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use linernotes_core::model::InputRow;
use linernotes_core::Credentials;
use linernotes_etl::{Config, EnrichmentEngine, SessionManager, SpotifyApi};

pub async fn run_enrich(config: &Config, input: &Path, output: &Path) -> Result<()> {
    println!("➡️  Loading rows: {}", input.display());
    let rows: Vec<InputRow> = read_rows(input)?;

    let credentials = Credentials::load(&config.credentials_path)
        .context("Failed to load catalog credentials")?;
    let session = SessionManager::connect(credentials, config.session_settings())
        .await
        .context("Failed to authenticate with the Spotify API")?;

    println!("🎧 Starting Spotify enrichment for {} tracks...", rows.len());

    let mut engine = EnrichmentEngine::new(SpotifyApi::new(session), &config.engine_settings());
    let report = engine.run(&rows).await?;

    write_rows(output, &report.rows)?;

    let stats = report.stats;
    let session = engine.api().session_stats();
    println!("✓ Spotify enrichment complete → {}", output.display());
    println!("  Total enriched tracks: {}", stats.enriched);
    println!("  Unmatched: {}", stats.unmatched);
    println!("  Skipped (missing title/artist): {}", stats.skipped_incomplete);
    println!("  Fallback searches: {}", stats.fallback_searches);
    println!("  Track cache size: {}", stats.match_cache_size);
    println!("  Genre cache size: {}", stats.genre_cache_size);
    println!(
        "  API requests: {} ({} re-authentications, {} rate-limit waits)",
        session.requests, session.reauthentications, session.rate_limited
    );

    Ok(())
}

/// Read rows from a JSON array.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input {}", path.display()))?;
    let rows = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse rows from {}", path.display()))?;
    Ok(rows)
}

/// Write rows as a JSON array, creating parent directories.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows).context("Failed to write rows")?;
    writer.flush().context("Failed to write rows")?;
    Ok(())
}
