use anyhow::Result;
use std::path::Path;

use linernotes_etl::{extract_watch_history, WatchEvent};

use super::enrich::{read_rows, write_rows};

pub fn run_extract(input: &Path, output: &Path) -> Result<()> {
    println!("➡️  Loading watch history: {}", input.display());
    let events: Vec<WatchEvent> = read_rows(input)?;

    let rows = extract_watch_history(&events);
    write_rows(output, &rows)?;

    println!("✓ Saved watch history → {}", output.display());
    println!(
        "  YouTube Music plays: {} (of {} events)",
        rows.len(),
        events.len()
    );

    Ok(())
}
