//! Client identity for the catalog API.
//!
//! Credentials live in a small JSON secret file:
//!
//! ```json
//! { "client_id": "...", "client_secret": "..." }
//! ```
//!
//! They are read once at startup. A missing or malformed file is fatal.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Client-credentials identity used to obtain bearer tokens.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load credentials from a JSON secret file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] when the file does not exist and
    /// [`Error::InvalidCredentials`] when it cannot be parsed or either field
    /// is blank.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingCredentials {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let credentials: Self =
            serde_json::from_str(&contents).map_err(|e| Error::InvalidCredentials {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if credentials.client_id.trim().is_empty() || credentials.client_secret.trim().is_empty() {
            return Err(Error::InvalidCredentials {
                path: path.to_path_buf(),
                message: "client_id and client_secret must not be empty".to_string(),
            });
        }

        log::debug!("Loaded catalog credentials from {}", path.display());
        Ok(credentials)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

// The secret never appears in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
