//! # cse-search
//!
//! Google Custom Search Engine (CSE) client for batch indicator lookups.
//!
//! ## Design
//!
//! - One shared [`reqwest::Client`] built at startup from [`ClientSettings`]
//!   (client certificate, CA bundle, proxy, certificate verification)
//! - One exact-phrase `GET` per search term
//! - At most [`MAX_PARALLEL_LOOKUPS`] requests in flight per batch
//! - Responses classified into success or a typed [`RestError`]
//! - All-or-nothing batches: one failed request fails the whole batch
//!
//! ## Security
//!
//! - API keys are redacted from every `Debug` rendering and log line
//! - Query values are logged only at trace level

pub mod classify;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod request;
pub mod transport;
pub mod types;

pub use classify::Classified;
pub use config::ClientSettings;
pub use error::{RestError, Result, SearchError};
pub use orchestrator::{SearchTerm, MAX_PARALLEL_LOOKUPS};
pub use transport::{HttpTransport, RawResponse, SearchTransport};
pub use types::{api_error_message, total_results, SearchParams, CSE_ENDPOINT};

use url::Url;

/// A ready-to-use CSE searcher: a transport plus the endpoint it targets.
#[derive(Debug, Clone)]
pub struct CseSearcher<T> {
    transport: T,
    endpoint: Url,
}

impl CseSearcher<HttpTransport> {
    /// Build the shared HTTP client from `settings` and target the public
    /// CSE endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the settings are invalid or the client
    /// cannot be constructed.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let client = http::build_client(settings)?;
        Self::new(HttpTransport::new(client))
    }
}

impl<T: SearchTransport> CseSearcher<T> {
    /// Wrap a transport, targeting the public CSE endpoint.
    ///
    /// # Errors
    ///
    /// Never fails in practice; [`CSE_ENDPOINT`] is a valid URL.
    pub fn new(transport: T) -> Result<Self> {
        Self::with_endpoint(transport, CSE_ENDPOINT)
    }

    /// Wrap a transport targeting `endpoint` (used against mock servers).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `endpoint` is not a valid URL.
    pub fn with_endpoint(transport: T, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SearchError::Config(format!("invalid endpoint {endpoint}: {e}")))?;
        Ok(Self { transport, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Search every entity, bounded to [`MAX_PARALLEL_LOOKUPS`] in flight.
    ///
    /// # Errors
    ///
    /// Returns the first [`RestError`] from any request; see
    /// [`orchestrator::search_batch`].
    pub async fn search_all<E>(
        &self,
        params: &SearchParams,
        entities: Vec<E>,
    ) -> std::result::Result<Vec<Classified<E>>, RestError>
    where
        E: SearchTerm + Send,
    {
        orchestrator::search_batch(&self.transport, &self.endpoint, params, entities).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_public_cse() {
        let searcher = CseSearcher::from_settings(&ClientSettings::default()).expect("client");
        assert_eq!(searcher.endpoint().as_str(), CSE_ENDPOINT);
    }

    fn transport() -> HttpTransport {
        HttpTransport::new(http::build_client(&ClientSettings::default()).expect("client"))
    }

    #[test]
    fn with_endpoint_overrides() {
        let searcher =
            CseSearcher::with_endpoint(transport(), "http://127.0.0.1:9999/customsearch/v1/")
                .expect("valid endpoint");
        assert_eq!(searcher.endpoint().port(), Some(9999));
    }

    #[test]
    fn with_endpoint_rejects_invalid_url() {
        let result = CseSearcher::with_endpoint(transport(), "not a url");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid endpoint"));
    }
}
