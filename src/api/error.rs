//! Error types for the WiGLE API client.
//!
//! Variants carry the request context (URL or path) the underlying errors
//! lack, so diagnostics name the exact call that failed.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur talking to the WiGLE API or persisting a download.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// mid-stream disconnects).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The API rejected the supplied credential (401 or 403).
    #[error("authentication failed (HTTP {status}): the API rejected the supplied token")]
    AuthRequired {
        /// The HTTP status code that signalled the rejection.
        status: u16,
    },

    /// The supplied token cannot be placed in an Authorization header.
    #[error("token contains characters that cannot appear in an Authorization header")]
    InvalidToken,

    /// The listing response body was not the expected JSON shape.
    #[error("malformed listing response from {url}: {source}")]
    Decode {
        /// The URL whose response failed to parse.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// File system error while writing a download (create file, write, flush).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an authentication-rejected error.
    pub fn auth_required(status: u16) -> Self {
        Self::AuthRequired { status }
    }

    /// Creates a decode error for a malformed listing response.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error means the token was rejected or unusable.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthRequired { .. } | Self::InvalidToken)
    }
}
