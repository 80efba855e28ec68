//! Enrichment error types.
//!
//! Only failures that abort the run are errors. A non-success API response
//! other than 401/429 is not an error: it surfaces as an absent result.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while enriching a batch.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The identity provider refused the client-credentials exchange.
    #[error("authentication rejected by {source_name} ({status}): {body}")]
    AuthRejected {
        source_name: String,
        status: StatusCode,
        body: String,
    },

    /// The API kept answering 401 after repeated re-authentication.
    #[error("{source_name} still unauthorized after {attempts} re-authentications")]
    Unauthorized { source_name: String, attempts: u32 },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest` (connect failure, timeout, ...).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// An error propagated from the core layer (credentials, I/O).
    #[error(transparent)]
    Core(#[from] linernotes_core::Error),
}

impl EnrichError {
    /// Returns `true` when the request never got a response (connect
    /// failure or timeout) and may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
