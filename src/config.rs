//! Client configuration.

use std::time::Duration;

use tracing::warn;

use crate::error::RequestError;

/// Public API host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api-public-v3.clappia.com";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "CLAPPIA_API_KEY";
pub const ENV_BASE_URL: &str = "CLAPPIA_BASE_URL";
pub const ENV_WORKPLACE_ID: &str = "CLAPPIA_WORKPLACE_ID";
pub const ENV_TIMEOUT_SECS: &str = "CLAPPIA_TIMEOUT_SECS";

/// Credentials and endpoint for one workplace. Immutable for a client's lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub workplace_id: String,
    pub timeout_secs: u64,
}

// Keeps the API key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("workplace_id", &self.workplace_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: &str, base_url: &str, workplace_id: &str) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim().to_string(),
            workplace_id: workplace_id.trim().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Read configuration from `CLAPPIA_*` environment variables.
    ///
    /// Missing values are left empty (base URL falls back to
    /// [`DEFAULT_BASE_URL`]); [`validate`](Self::validate) reports them.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();

        let base_url = match get(ENV_BASE_URL) {
            url if url.is_empty() => DEFAULT_BASE_URL.to_string(),
            url => url,
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            raw if raw.is_empty() => DEFAULT_TIMEOUT_SECS,
            raw => raw.parse().unwrap_or_else(|_| {
                warn!(
                    value = %raw,
                    "{} is not a whole number of seconds, using {}",
                    ENV_TIMEOUT_SECS,
                    DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
        };

        Self {
            api_key: get(ENV_API_KEY),
            base_url,
            workplace_id: get(ENV_WORKPLACE_ID),
            timeout_secs,
        }
    }

    /// Check that every required value is present.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::Configuration` naming the first missing value.
    pub fn validate(&self) -> Result<(), RequestError> {
        let missing = if self.api_key.trim().is_empty() {
            "API key is not configured"
        } else if self.base_url.trim().is_empty() {
            "Base URL is not configured"
        } else if self.workplace_id.trim().is_empty() {
            "Workplace ID is not configured"
        } else {
            return Ok(());
        };
        Err(RequestError::Configuration {
            message: missing.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join the base URL and an endpoint path with exactly one slash.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}
