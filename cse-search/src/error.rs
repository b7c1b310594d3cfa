//! Error types for the cse-search crate.
//!
//! [`SearchError`] covers client construction and configuration failures.
//! [`RestError`] is the classified failure of a single search request; it is
//! serializable so the host can log the raw status code and body.
//!
//! No API keys appear in error messages.

use serde::{Deserialize, Serialize};

/// Errors raised while configuring or building the search client.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The HTTP client could not be constructed or a request could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid client settings.
    #[error("config error: {0}")]
    Config(String),

    /// TLS material (certificate, key, CA bundle) could not be loaded.
    #[error("TLS error: {0}")]
    Tls(String),

    /// I/O error while reading TLS material from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for cse-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

/// `error` value used for every non-200 response.
pub const NON_200_ERROR: &str = "Did not receive HTTP 200 Status Code";

/// Detail used for transport failures and empty response bodies.
pub const NETWORK_ERROR_DETAIL: &str = "Network Error Encountered";

/// A classified request failure.
///
/// Serializes to the host's error envelope:
/// `{ "error", "statusCode", "detail", "body" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{detail}")]
pub struct RestError {
    /// Short error label, or the transport error text.
    pub error: String,
    /// Raw HTTP status code, when a response was received.
    #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none", default)]
    pub status_code: Option<u16>,
    /// Human-readable explanation suitable for display in the host.
    pub detail: String,
    /// Raw decoded response body, kept for diagnostic logging.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl RestError {
    /// A failure where no usable response was received.
    #[must_use]
    pub fn network(error: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            error: error.into(),
            status_code: None,
            detail: NETWORK_ERROR_DETAIL.to_owned(),
            body,
        }
    }

    /// A failure where the API answered with a non-200 status.
    #[must_use]
    pub fn status(status: u16, detail: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            error: NON_200_ERROR.to_owned(),
            status_code: Some(status),
            detail: detail.into(),
            body: Some(body),
        }
    }
}
