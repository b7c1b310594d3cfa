//! Core types for CSE queries, plus accessors for the response fields this
//! crate inspects.
//!
//! Response bodies stay raw JSON end to end; the host renders the full body.
//! The accessors read single fields by JSON pointer, so an unexpected shape
//! elsewhere in the body never hides them.

use serde_json::Value;

/// Google Custom Search JSON API endpoint.
pub const CSE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1/";

/// Per-lookup query parameters shared by every request in a batch.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Google API key (`key`).
    pub api_key: String,
    /// Custom Search Engine ID (`cx`).
    pub cx: String,
    /// Number of results requested per query (`num`).
    pub max_results: u32,
}

impl std::fmt::Debug for SearchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchParams")
            .field("api_key", &"<redacted>")
            .field("cx", &self.cx)
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// `searchInformation.totalResults`, which the API sends as a string.
#[must_use]
pub fn total_results(body: &Value) -> Option<&str> {
    body.pointer("/searchInformation/totalResults")
        .and_then(Value::as_str)
}

/// `error.message`, if present and non-empty.
#[must_use]
pub fn api_error_message(body: &Value) -> Option<&str> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
}
