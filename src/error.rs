//! Centralized error types for seekterm.
//!
//! Every fallible call against the backend, and every screenshot decode,
//! reports a [`SeekError`]. The controller never propagates these past its
//! own boundary: each category degrades to a status flag, a transcript entry
//! or a placeholder image.
//!
//! # Example
//!
//! ```
//! use seekterm::error::{SeekError, SeekResult};
//!
//! fn require_success(endpoint: &str, status: u16) -> SeekResult<()> {
//!     if status >= 400 {
//!         return Err(SeekError::status(endpoint, status));
//!     }
//!     Ok(())
//! }
//!
//! let err = require_success("/health", 503).unwrap_err();
//! assert!(err.is_connectivity());
//! ```

use thiserror::Error;

/// Result type alias using `SeekError`.
pub type SeekResult<T> = Result<T, SeekError>;

/// Centralized error type for seekterm.
#[derive(Debug, Error)]
pub enum SeekError {
    // ============== Backend Errors ==============
    /// The request never produced a response (connection refused, timeout, DNS).
    #[error("{endpoint}: network error: {message}")]
    Network {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Description of the network error.
        message: String,
    },

    /// The backend answered with a non-success status code.
    #[error("{endpoint}: backend returned status {status}")]
    Status {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be read or decoded.
    #[error("{endpoint}: invalid response: {message}")]
    InvalidResponse {
        /// Endpoint path that was requested.
        endpoint: String,
        /// Description of the decode failure.
        message: String,
    },

    // ============== Screenshot Errors ==============
    /// Screenshot bytes could not be decoded into a frame.
    #[error("screenshot: {message}")]
    Image {
        /// Description of the decode failure.
        message: String,
    },

    // ============== Configuration Errors ==============
    /// Invalid configuration value.
    #[error("config: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

// ============== Constructor Methods ==============

impl SeekError {
    /// Creates a network error for `endpoint`.
    #[must_use]
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a non-success status error for `endpoint`.
    #[must_use]
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Creates an invalid response error for `endpoint`.
    #[must_use]
    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn image(message: impl Into<String>) -> Self {
        Self::Image {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Maps a reqwest failure on `endpoint` to the matching variant.
    ///
    /// Status errors (from `error_for_status`) keep their code, body decode
    /// failures become [`SeekError::InvalidResponse`], everything else is
    /// treated as a network failure.
    #[must_use]
    pub fn from_reqwest(endpoint: impl Into<String>, err: &reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if let Some(status) = err.status() {
            return Self::status(endpoint, status.as_u16());
        }
        if err.is_decode() || err.is_body() {
            return Self::invalid_response(endpoint, err.to_string());
        }
        Self::network(endpoint, err.to_string())
    }
}

// ============== Category Methods ==============

impl SeekError {
    /// Returns `true` for failures that mean the backend is unreachable or unhealthy.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }

    /// Returns the endpoint the error relates to, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Network { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::InvalidResponse { endpoint, .. } => Some(endpoint),
            Self::Image { .. } | Self::Config { .. } => None,
        }
    }

    /// Returns the module name associated with this error.
    #[must_use]
    pub fn module(&self) -> &'static str {
        match self {
            Self::Network { .. } | Self::Status { .. } | Self::InvalidResponse { .. } => "api",
            Self::Image { .. } => "screenshot",
            Self::Config { .. } => "config",
        }
    }
}

// ============== Unit Tests ==============
