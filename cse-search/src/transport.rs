//! Trait seam between the batch orchestrator and the network.
//!
//! [`HttpTransport`] sends requests with the shared [`reqwest::Client`].
//! Tests substitute their own [`SearchTransport`] to control timing and
//! responses without touching the network.

use crate::error::SearchError;
use crate::request::SearchRequest;

/// A raw HTTP response: status code plus the decoded body, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// `None` when the body was empty or JSON `null`.
    pub body: Option<serde_json::Value>,
}

/// Executes a single [`SearchRequest`].
///
/// All implementations must be `Send + Sync` so one transport can serve a
/// whole batch of concurrent requests.
pub trait SearchTransport: Send + Sync {
    /// Send the request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] when no response was received
    /// (connection, TLS, or proxy failure, or a truncated body).
    fn execute(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<RawResponse, SearchError>> + Send;
}

/// Production transport backed by the shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SearchTransport for HttpTransport {
    async fn execute(&self, request: &SearchRequest) -> Result<RawResponse, SearchError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url());
        if request.expect_json() {
            builder = builder.header(reqwest::header::ACCEPT, "application/json");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("request failed: {e}")))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SearchError::Http(format!("failed to read response body: {e}")))?;

        let body = if request.expect_json() {
            decode_body(&bytes)
        } else {
            non_empty_text(&bytes).map(serde_json::Value::String)
        };
        Ok(RawResponse { status, body })
    }
}

/// Decode a response body as JSON.
///
/// Bodies that are not valid JSON are kept as a JSON string so the raw
/// text still reaches diagnostics. Empty bodies and JSON `null` yield `None`.
#[must_use]
pub fn decode_body(bytes: &[u8]) -> Option<serde_json::Value> {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Null) => None,
        Ok(value) => Some(value),
        Err(_) => non_empty_text(bytes).map(serde_json::Value::String),
    }
}

fn non_empty_text(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        None
    } else {
        Some(text.into_owned())
    }
}
