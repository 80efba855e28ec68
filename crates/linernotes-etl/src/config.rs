use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::enrich::engine::EngineSettings;
use crate::enrich::session::SessionSettings;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Configuration for linernotes.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (LINER_* prefix)
/// 3. Config file (~/.config/linernotes/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the catalog API credentials (JSON with `client_id` and
    /// `client_secret`).
    ///
    /// Can be set via:
    /// - CLI: --credentials /path/to/credentials.json
    /// - ENV: LINER_CREDENTIALS_PATH
    /// - Config: credentials_path = "/path/to/credentials.json"
    /// - Default: ~/.config/linernotes/spotify_credentials.json
    pub credentials_path: PathBuf,

    /// Base URL of the catalog Web API.
    pub api_base_url: String,

    /// Client-credentials token endpoint.
    pub token_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Consecutive 401 responses tolerated per request before giving up.
    pub max_reauth_attempts: u32,

    /// Wait used on 429 when the server sends no usable Retry-After.
    pub default_retry_after_secs: u64,

    /// Retries, after the first send, for requests that fail before reaching
    /// the server.
    pub transport_retries: usize,

    /// Result page size for track searches.
    pub search_limit: u32,

    /// Emit a progress line every this many input rows.
    pub progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout_secs: 30,
            max_reauth_attempts: 3,
            default_retry_after_secs: 2,
            transport_retries: 3,
            search_limit: 5,
            progress_interval: 30,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/linernotes/config.toml
    /// Reads environment variables with LINER_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("liner");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom credentials path.
    ///
    /// This is used when the --credentials CLI flag is provided.
    pub fn load_with_credentials_path(credentials_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.credentials_path = credentials_path;
        Ok(config)
    }

    /// Settings for the authenticated API session.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            token_url: self.token_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_reauth_attempts: self.max_reauth_attempts,
            default_retry_after: Duration::from_secs(self.default_retry_after_secs),
            transport_retries: self.transport_retries,
        }
    }

    /// Settings for the batch engine.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            search_limit: self.search_limit.max(1),
            progress_interval: self.progress_interval,
        }
    }
}

/// Get the default credentials path.
///
/// Returns: ~/.config/linernotes/spotify_credentials.json (or platform equivalent)
fn default_credentials_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linernotes")
        .join("spotify_credentials.json")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/linernotes/config.toml
/// - macOS: ~/Library/Application Support/linernotes/config.toml
/// - Windows: %APPDATA%\linernotes\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linernotes")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Linernotes Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (LINER_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Catalog API credentials file
#
# A JSON document of the form:
#   { "client_id": "...", "client_secret": "..." }
#
# Create an app at https://developer.spotify.com/dashboard to obtain them.
#
# Can also be set via:
# - CLI: linernotes enrich --credentials /path/to/credentials.json ...
# - Environment: LINER_CREDENTIALS_PATH=/path/to/credentials.json
#credentials_path = "/path/to/spotify_credentials.json"

# API endpoints
#api_base_url = "https://api.spotify.com/v1"
#token_url = "https://accounts.spotify.com/api/token"

# Per-request timeout (seconds)
#request_timeout_secs = 30

# Re-authentications allowed per request when the API keeps returning 401
#max_reauth_attempts = 3

# Wait applied on 429 responses without a Retry-After header (seconds)
#default_retry_after_secs = 2

# Retries after the first send for requests that fail before reaching the server
#transport_retries = 3

# Number of search results requested per query (the first one wins)
#search_limit = 5

# Log progress every N input rows
#progress_interval = 30
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
