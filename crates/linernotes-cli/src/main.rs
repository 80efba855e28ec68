use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use linernotes_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "linernotes", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Extract YouTube Music plays from a Google Takeout watch history
    ///
    /// Reads `watch-history.json` from a Takeout export and keeps only
    /// YouTube Music events. Titles lose their "Watched " prefix, artists
    /// lose the " - Topic" suffix of auto-generated channels, and the video
    /// ID is taken from the `v` parameter of the watch URL.
    ///
    /// The result is a JSON array of rows ready for `enrich`.
    Extract {
        /// Takeout watch-history.json
        input: PathBuf,

        /// Where to write the extracted rows (JSON array)
        output: PathBuf,
    },
    /// Enrich listening-history rows with Spotify catalog metadata
    ///
    /// Reads a JSON array of rows with `track_id`, `title`, `artist`, `album`
    /// and `source` fields. For each row with both a title and an artist:
    ///
    /// - Searches the catalog by title and artist, falling back to a
    ///   title-only search when nothing is found
    /// - Takes the top-ranked result as the match
    /// - Looks up the genres of the first credited artist
    ///
    /// Rows without a match are skipped. Track matches and artist genres are
    /// cached for the duration of the run, so repeated plays of the same
    /// song cost a single lookup.
    ///
    /// The enriched rows are written as a JSON array once the whole batch
    /// has been processed.
    Enrich {
        /// Input rows (JSON array)
        input: PathBuf,

        /// Where to write the enriched rows (JSON array)
        output: PathBuf,

        /// Credentials file (default: ~/.config/linernotes/spotify_credentials.json)
        #[arg(long)]
        credentials: Option<PathBuf>,
    },
    /// Inspect or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print a single config value, or the whole config file
    Get {
        key: Option<String>,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if missing
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output } => {
            commands::run_extract(&input, &output)?;
        }
        Commands::Enrich {
            input,
            output,
            credentials,
        } => {
            let config = match credentials {
                Some(path) => Config::load_with_credentials_path(path)?,
                None => Config::load()?,
            };
            commands::run_enrich(&config, &input, &output).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config()?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
