//! Construction of one CSE request per search term.

use crate::types::SearchParams;
use url::Url;

/// A fully-formed CSE request for a single search term.
///
/// Built once per entity in a batch and discarded after the response is
/// classified.
#[derive(Clone)]
pub struct SearchRequest {
    method: reqwest::Method,
    endpoint: Url,
    query: Vec<(&'static str, String)>,
    term: String,
    expect_json: bool,
}

impl SearchRequest {
    /// Build a GET request searching for `term` as an exact phrase.
    ///
    /// The term is wrapped in literal double quotes so the engine matches
    /// it verbatim.
    #[must_use]
    pub fn new(endpoint: &Url, params: &SearchParams, term: &str) -> Self {
        let query = vec![
            ("key", params.api_key.clone()),
            ("cx", params.cx.clone()),
            ("num", params.max_results.to_string()),
            ("q", format!("\"{term}\"")),
        ];
        Self {
            method: reqwest::Method::GET,
            endpoint: endpoint.clone(),
            query,
            term: term.to_owned(),
            expect_json: true,
        }
    }

    #[must_use]
    pub fn method(&self) -> &reqwest::Method {
        &self.method
    }

    /// The unquoted search term this request was built for.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether the response body is decoded as JSON.
    #[must_use]
    pub fn expect_json(&self) -> bool {
        self.expect_json
    }

    /// The full request URL, with query parameters encoded in the order
    /// `key`, `cx`, `num`, `q`.
    #[must_use]
    pub fn url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }
}

impl std::fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(k, v)| if *k == "key" { (*k, "<redacted>") } else { (*k, v.as_str()) })
            .collect();
        f.debug_struct("SearchRequest")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint.as_str())
            .field("query", &query)
            .field("json", &self.expect_json)
            .finish()
    }
}
