//! Client configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for a [`TeiClient`](crate::TeiClient).
///
/// Headers and cookies are sent on every request. Nothing is validated
/// here; a malformed base URL or header surfaces on the first call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    /// `None` means no limit.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a config for the server at `base_url`, without extra headers,
    /// cookies or timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `TEI_HOST` (default `http://localhost:8080`)
    /// - `TEI_TIMEOUT_SECONDS` (default 30, `0` disables the timeout)
    /// - `TEI_API_TOKEN`, sent as a bearer `Authorization` header when set
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("TEI_HOST")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let timeout_seconds = match std::env::var("TEI_TIMEOUT_SECONDS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TEI_TIMEOUT_SECONDS is not a number: {value:?}"))?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        let mut config = Self::new(host).with_timeout(Duration::from_secs(timeout_seconds));

        if let Some(token) = std::env::var("TEI_API_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            config = config.with_header("Authorization", format!("Bearer {}", token));
        }

        Ok(config)
    }

    /// Header names are stored lowercased, so the value set last wins
    /// whatever the casing.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(
            headers
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into())),
        );
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_cookies<I, K, V>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.cookies
            .extend(cookies.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the per-request timeout. A zero duration disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Build the URL for an endpoint path such as `embed`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Serializes tests that mutate the environment against tests that build
/// HTTP clients, which read proxy variables.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
