//! Configuration types for seekterm.
//!
//! The binary builds a [`Config`] from CLI flags and environment variables;
//! library users and tests can start from [`Config::default`] and override
//! what they need.

use std::time::Duration;

use crate::error::{SeekError, SeekResult};

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:7777";

/// Environment variable consulted for the backend address.
pub const BACKEND_URL_ENV: &str = "SEEKTERM_BACKEND_URL";

/// Interval between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Timeout applied to health, answer, screenshot and stop requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application configuration.
///
/// # Examples
///
/// ```
/// use seekterm::types::config::Config;
/// use std::time::Duration;
///
/// let config = Config::default()
///     .with_backend_url("http://localhost:8000/")
///     .unwrap()
///     .with_poll_interval(Duration::from_millis(500));
///
/// assert_eq!(config.backend_url, "http://localhost:8000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend, without a trailing slash.
    pub backend_url: String,

    /// Interval between poll ticks for health, latest answer and screenshot.
    pub poll_interval: Duration,

    /// Timeout for read-style requests.
    ///
    /// `POST /query` is not bounded by this: the backend holds the request
    /// open until the agent finishes.
    pub request_timeout: Duration,

    /// Optional query submitted as soon as the session starts.
    pub initial_prompt: Option<String>,

    /// Whether to run headless: submit `initial_prompt`, print the answer, exit.
    pub print_mode: bool,

    /// Whether print mode also writes the agent's reasoning.
    pub show_reasoning: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            initial_prompt: None,
            print_mode: false,
            show_reasoning: false,
        }
    }
}

impl Config {
    /// Sets the backend URL after validating and normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`SeekError::Config`] if the URL is empty or is not `http(s)`.
    pub fn with_backend_url(mut self, url: &str) -> SeekResult<Self> {
        self.backend_url = normalize_backend_url(url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_initial_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.initial_prompt = Some(prompt.into());
        self
    }
}

/// Trims whitespace and trailing slashes and checks the scheme.
///
/// # Errors
///
/// Returns [`SeekError::Config`] for empty or non-HTTP URLs.
pub fn normalize_backend_url(url: &str) -> SeekResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SeekError::config("backend URL must not be empty"));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(SeekError::config(format!(
            "backend URL '{trimmed}' must start with http:// or https://"
        )));
    }
    Ok(trimmed.to_string())
}
