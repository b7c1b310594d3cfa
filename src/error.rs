//! Error types for the CSE integration.

use cse_search::SearchError;

/// Top-level error type for the integration.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// Static configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Startup failed; the integration cannot serve lookups.
    #[error("startup error: {0}")]
    Startup(String),

    /// Search client construction failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Host command payload was malformed.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, IntegrationError>;
