//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MESSAGE_POLL_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".auconnect-session";

/// Errors raised while building [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash.
    pub base_url: String,
    /// Interval of the unread-message poller.
    pub message_poll: Duration,
    /// Interval of the pending-request poller. `None` keeps requests on
    /// fetch-on-mount / fetch-on-open only.
    pub request_poll: Option<Duration>,
    pub timeouts: HttpTimeouts,
    /// File backing the persisted session username.
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            message_poll: Duration::from_millis(DEFAULT_MESSAGE_POLL_MS),
            request_poll: None,
            timeouts: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `AUCONNECT_BASE_URL`: default `http://localhost:8080`
    /// - `AUCONNECT_MESSAGE_POLL_MS`: default 5000, must be non-zero
    /// - `AUCONNECT_REQUEST_POLL_MS`: unset or `0` disables request polling
    /// - `AUCONNECT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUCONNECT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `AUCONNECT_SESSION_FILE`: default `.auconnect-session`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the message poll interval is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("AUCONNECT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

        let message_poll_ms = env_parse("AUCONNECT_MESSAGE_POLL_MS", DEFAULT_MESSAGE_POLL_MS);
        if message_poll_ms == 0 {
            return Err(ConfigError::Invalid { key: "AUCONNECT_MESSAGE_POLL_MS", value: "0".into() });
        }

        let request_poll = std::env::var("AUCONNECT_REQUEST_POLL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        let timeouts = HttpTimeouts {
            request_secs: env_parse("AUCONNECT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("AUCONNECT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let session_file = std::env::var("AUCONNECT_SESSION_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            message_poll: Duration::from_millis(message_poll_ms),
            request_poll,
            timeouts,
            session_file,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
