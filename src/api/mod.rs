//! HTTP client for the assistant backend.
//!
//! The backend is consumed as-is; this module only knows its five endpoints:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`BackendClient::check_health`] | `GET /health` |
//! | [`BackendClient::latest_answer`] | `GET /latest_answer` |
//! | [`BackendClient::screenshot`] | `GET /screenshots/updated_screen.png?timestamp=<ms>` |
//! | [`BackendClient::query`] | `POST /query` |
//! | [`BackendClient::stop`] | `GET /stop` |

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{SeekError, SeekResult};
use crate::types::config::Config;
use crate::types::AnswerPayload;
use crate::util::now_millis;

pub const HEALTH_PATH: &str = "/health";
pub const LATEST_ANSWER_PATH: &str = "/latest_answer";
pub const SCREENSHOT_PATH: &str = "/screenshots/updated_screen.png";
pub const QUERY_PATH: &str = "/query";
pub const STOP_PATH: &str = "/stop";

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    /// Voice output on the backend; always disabled from the terminal.
    pub tts_enabled: bool,
}

/// Cheaply cloneable client; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl BackendClient {
    /// Creates a client for `base_url` with the default request timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, crate::types::config::DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client for `base_url` whose read calls time out after `timeout`.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: timeout,
        }
    }

    /// Creates a client from the application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_timeout(&config.backend_url, config.request_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks backend liveness.
    ///
    /// # Errors
    ///
    /// Returns an error on any network failure or non-success status.
    pub async fn check_health(&self) -> SeekResult<()> {
        self.get(HEALTH_PATH).await.map(drop)
    }

    /// Fetches the most recent answer the backend has produced.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status (the backend
    /// answers 404 before the first answer exists) or an undecodable body.
    pub async fn latest_answer(&self) -> SeekResult<AnswerPayload> {
        let response = self.get(LATEST_ANSWER_PATH).await?;
        response
            .json::<AnswerPayload>()
            .await
            .map_err(|e| SeekError::from_reqwest(LATEST_ANSWER_PATH, &e))
    }

    /// Fetches the current screenshot as raw image bytes.
    ///
    /// A fresh `timestamp` query parameter defeats intermediate caches.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status or an
    /// unreadable body.
    pub async fn screenshot(&self) -> SeekResult<Vec<u8>> {
        let url = format!("{}?timestamp={}", self.url(SCREENSHOT_PATH), now_millis());
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SeekError::from_reqwest(SCREENSHOT_PATH, &e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SeekError::from_reqwest(SCREENSHOT_PATH, &e))?;
        debug!(bytes = bytes.len(), "Fetched screenshot");
        Ok(bytes.to_vec())
    }

    /// Submits a query and waits for the backend's answer.
    ///
    /// The backend keeps the request open while the agent works, so no
    /// timeout is applied.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status or an
    /// undecodable body.
    pub async fn query(&self, query: &str) -> SeekResult<AnswerPayload> {
        let request = QueryRequest {
            query,
            tts_enabled: false,
        };

        debug!(endpoint = QUERY_PATH, chars = query.chars().count(), "Submitting query");

        let response = self
            .client
            .post(self.url(QUERY_PATH))
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SeekError::from_reqwest(QUERY_PATH, &e))?;

        response
            .json::<AnswerPayload>()
            .await
            .map_err(|e| SeekError::from_reqwest(QUERY_PATH, &e))
    }

    /// Asks the backend to stop the running agent.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or non-success status. The
    /// response body is ignored.
    pub async fn stop(&self) -> SeekResult<()> {
        self.get(STOP_PATH).await.map(drop)
    }

    async fn get(&self, path: &'static str) -> SeekResult<reqwest::Response> {
        self.client
            .get(self.url(path))
            .timeout(self.request_timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SeekError::from_reqwest(path, &e))
    }
}
