//! Authenticated session against the catalog Web API.
//!
//! The [`SessionManager`] owns the bearer token obtained through the
//! client-credentials grant and is the only place it is read or replaced.
//! Every GET goes through [`SessionManager::get_json`], which recovers from
//! the two transient failure classes the API produces:
//!
//! - **401**: the token expired. The manager re-authenticates and retries,
//!   giving up after `max_reauth_attempts` consecutive re-authentications.
//! - **429**: rate limited. The manager sleeps for the server's
//!   `Retry-After` (or a default) and retries, without a cap.
//!
//! Any other non-success status yields `Ok(None)`.

use std::fmt;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use linernotes_core::Credentials;

use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL};
use crate::error::{EnrichError, EnrichResult};

const SOURCE_NAME: &str = "Spotify";

const USER_AGENT: &str = "linernotes/0.1.0 (https://github.com/oxur/linernotes)";

/// Connection and retry policy for a [`SessionManager`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Base URL that request paths are appended to, without trailing slash.
    pub api_base_url: String,
    pub token_url: String,
    pub request_timeout: Duration,
    pub max_reauth_attempts: u32,
    /// Wait applied on 429 when `Retry-After` is absent or malformed.
    pub default_retry_after: Duration,
    /// Retries, after the first send, for requests that fail before a
    /// response arrives.
    pub transport_retries: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            max_reauth_attempts: 3,
            default_retry_after: Duration::from_secs(2),
            transport_retries: 3,
        }
    }
}

/// Request counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// API GETs issued, retries included.
    pub requests: u64,
    /// Token exchanges, the initial one included.
    pub authentications: u64,
    /// Token exchanges triggered by a 401.
    pub reauthentications: u64,
    /// 429 responses waited out.
    pub rate_limited: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The current bearer token. Replaced wholesale on refresh.
struct Session {
    access_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Owns the API session and issues authenticated GET requests.
#[derive(Debug)]
pub struct SessionManager {
    http: Client,
    credentials: Credentials,
    settings: SessionSettings,
    session: Session,
    stats: SessionStats,
}

impl SessionManager {
    /// Build the HTTP client and perform the initial token exchange.
    ///
    /// # Errors
    ///
    /// Fails with [`EnrichError::AuthRejected`] when the identity provider
    /// refuses the credentials; there is no fallback identity.
    pub async fn connect(credentials: Credentials, settings: SessionSettings) -> EnrichResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()?;

        let mut stats = SessionStats::default();
        let session = request_token(&http, &credentials, &settings, &mut stats).await?;
        log::info!("Authenticated with {} API", SOURCE_NAME);

        Ok(Self {
            http,
            credentials,
            settings,
            session,
            stats,
        })
    }

    /// Exchange the stored credentials for a fresh bearer token.
    pub async fn authenticate(&mut self) -> EnrichResult<()> {
        self.session =
            request_token(&self.http, &self.credentials, &self.settings, &mut self.stats).await?;
        Ok(())
    }

    /// Issue an authenticated GET for `path` (relative to the API base URL)
    /// and decode the JSON body.
    ///
    /// Returns `Ok(None)` for any non-success status other than 401/429 and
    /// for bodies that fail to decode. Callers treat that as a normal,
    /// recoverable outcome.
    pub async fn get_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
    ) -> EnrichResult<Option<T>> {
        let url = format!("{}{}", self.settings.api_base_url, path);
        let mut reauths = 0u32;

        loop {
            self.stats.requests += 1;
            let response = self
                .send(|| {
                    self.http
                        .get(&url)
                        .bearer_auth(&self.session.access_token)
                        .query(query)
                })
                .await?;

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if reauths >= self.settings.max_reauth_attempts {
                    return Err(EnrichError::Unauthorized {
                        source_name: SOURCE_NAME.to_string(),
                        attempts: reauths,
                    });
                }
                reauths += 1;
                log::warn!(
                    "{} returned 401 for {}; re-authenticating ({}/{})",
                    SOURCE_NAME,
                    path,
                    reauths,
                    self.settings.max_reauth_attempts
                );
                self.authenticate().await?;
                self.stats.reauthentications += 1;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(response.headers(), self.settings.default_retry_after);
                self.stats.rate_limited += 1;
                log::warn!(
                    "Rate limited by {} on {}; waiting {}s (rate-limit wait #{})",
                    SOURCE_NAME,
                    path,
                    wait.as_secs(),
                    self.stats.rate_limited
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                log::warn!("{} API error: {} - {}", SOURCE_NAME, status, body);
                return Ok(None);
            }

            return match response.json::<T>().await {
                Ok(body) => Ok(Some(body)),
                Err(e) => {
                    log::warn!("Unreadable {} response for {}: {}", SOURCE_NAME, path, e);
                    Ok(None)
                }
            };
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    async fn send<F>(&self, build: F) -> EnrichResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        send_with_backoff(build, self.settings.transport_retries).await
    }
}

/// Send a request, retrying connect failures and timeouts with exponential
/// backoff. Any HTTP response, whatever its status, ends the retries.
async fn send_with_backoff<F>(build: F, retries: usize) -> EnrichResult<Response>
where
    F: Fn() -> RequestBuilder,
{
    (|| {
        let request = build();
        async move { request.send().await.map_err(EnrichError::from) }
    })
    .retry(ExponentialBuilder::default().with_max_times(retries))
    .when(EnrichError::is_transient)
    .notify(|e: &EnrichError, wait: Duration| {
        log::warn!(
            "{} request failed ({}); retrying in {:?}",
            SOURCE_NAME,
            e,
            wait
        );
    })
    .await
}

/// Client-credentials exchange.
///
/// A 429 from the token endpoint is waited out like any other rate limit, so
/// a re-authentication in the middle of a run does not abort it.
async fn request_token(
    http: &Client,
    credentials: &Credentials,
    settings: &SessionSettings,
    stats: &mut SessionStats,
) -> EnrichResult<Session> {
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id()),
        ("client_secret", credentials.client_secret()),
    ];

    loop {
        let response = send_with_backoff(
            || http.post(&settings.token_url).form(&form),
            settings.transport_retries,
        )
        .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait = retry_after(response.headers(), settings.default_retry_after);
            stats.rate_limited += 1;
            log::warn!(
                "Token endpoint rate limited; waiting {}s before re-authenticating",
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::AuthRejected {
                source_name: SOURCE_NAME.to_string(),
                status,
                body,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| EnrichError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        stats.authentications += 1;
        log::debug!("Obtained new {} access token", SOURCE_NAME);
        return Ok(Session {
            access_token: token.access_token,
        });
    }
}

/// Delay requested by a 429 response.
///
/// Reads `Retry-After` as whole seconds and falls back to `default` when the
/// header is missing or not a number.
pub fn retry_after(headers: &HeaderMap, default: Duration) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
