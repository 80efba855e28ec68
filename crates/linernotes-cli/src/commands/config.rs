use anyhow::{Context, Result};
use linernotes_etl::{config, Config};

const VALID_KEYS: &str = "credentials_path, api_base_url, token_url, request_timeout_secs, \
max_reauth_attempts, default_retry_after_secs, transport_retries, search_limit, progress_interval";

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  credentials_path: {}", config.credentials_path.display());
    println!(
        "  credentials file exists: {}",
        if config.credentials_path.exists() { "yes" } else { "no" }
    );
    println!("  api_base_url: {}", config.api_base_url);
    println!("  token_url: {}", config.token_url);
    println!("  request_timeout_secs: {}", config.request_timeout_secs);
    println!("  max_reauth_attempts: {}", config.max_reauth_attempts);
    println!("  default_retry_after_secs: {}", config.default_retry_after_secs);
    println!("  transport_retries: {}", config.transport_retries);
    println!("  search_limit: {}", config.search_limit);
    println!("  progress_interval: {}", config.progress_interval);

    println!("\nPriority: CLI args > ENV vars (LINER_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;

        let value = match key.as_str() {
            "credentials_path" => config.credentials_path.display().to_string(),
            "api_base_url" => config.api_base_url,
            "token_url" => config.token_url,
            "request_timeout_secs" => config.request_timeout_secs.to_string(),
            "max_reauth_attempts" => config.max_reauth_attempts.to_string(),
            "default_retry_after_secs" => config.default_retry_after_secs.to_string(),
            "transport_retries" => config.transport_retries.to_string(),
            "search_limit" => config.search_limit.to_string(),
            "progress_interval" => config.progress_interval.to_string(),
            _ => {
                anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS);
            }
        };
        println!("{}", value);
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'linernotes config init' to create it.");
        }
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure linernotes.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
