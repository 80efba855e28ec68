use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("credentials file not found: {}", path.display())]
    MissingCredentials { path: PathBuf },

    #[error("invalid credentials in {}: {message}", path.display())]
    InvalidCredentials { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
