//! Error types.
//!
//! Two families:
//!
//! - [`Error`]: infrastructure failures that stop the process from starting
//!   or serving: binding a port, building the upstream client.
//! - [`ApiError`]: one failed upstream call. Never fatal. Handlers turn it
//!   into a not-found page, a 500 on the JSON API, or an empty fallback.
//!
//! Application-level outcomes (404, 500) are [`Response`](crate::Response)
//! values, not errors.

use reqwest::StatusCode;
use thiserror::Error;

/// The error type returned by the server's fallible setup operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid backend url `{url}`: {source}")]
    BackendUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// A failed upstream call.
///
/// The three variants carry different causes but callers treat them the same
/// way: the operation failed, here is why.
#[derive(Debug, Error)]
pub enum ApiError {
    /// DNS, connect, timeout, or the body stream broke mid-read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with something other than the expected status.
    #[error("request to {url} failed with status: {status}")]
    Status { url: String, status: StatusCode },

    /// Body did not match the expected shape.
    #[error("failed to parse {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Upstream status code, when the failure was a status error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}
