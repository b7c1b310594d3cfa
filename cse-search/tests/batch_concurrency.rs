//! Concurrency and ordering tests for batch searches.
//!
//! A fake transport records how many requests are in flight and delays
//! responses per term, so these tests run without any network.

use cse_search::orchestrator::search_batch;
use cse_search::request::SearchRequest;
use cse_search::{
    RawResponse, SearchError, SearchParams, SearchTransport, CSE_ENDPOINT, MAX_PARALLEL_LOOKUPS,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Default)]
struct CountingTransport {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
    delays_ms: HashMap<String, u64>,
    completion_order: Mutex<Vec<String>>,
}

impl CountingTransport {
    fn with_delays(delays: &[(&str, u64)]) -> Self {
        Self {
            delays_ms: delays.iter().map(|(t, d)| ((*t).to_string(), *d)).collect(),
            ..Default::default()
        }
    }
}

impl SearchTransport for CountingTransport {
    async fn execute(&self, request: &SearchRequest) -> Result<RawResponse, SearchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays_ms.get(request.term()).copied().unwrap_or(20);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completion_order
            .lock()
            .expect("lock")
            .push(request.term().to_string());

        Ok(RawResponse {
            status: 200,
            body: Some(json!({
                "searchInformation": {"totalResults": "1"},
                "term": request.term()
            })),
        })
    }
}

fn params() -> SearchParams {
    SearchParams {
        api_key: "k".into(),
        cx: "c".into(),
        max_results: 5,
    }
}

fn endpoint() -> Url {
    Url::parse(CSE_ENDPOINT).expect("valid endpoint")
}

#[tokio::test]
async fn never_more_than_ten_in_flight() {
    let transport = CountingTransport::default();
    let entities: Vec<String> = (0..25).map(|i| format!("10.0.0.{i}")).collect();

    let results = search_batch(&transport, &endpoint(), &params(), entities)
        .await
        .expect("batch succeeds");

    assert_eq!(results.len(), 25);
    assert_eq!(transport.total.load(Ordering::SeqCst), 25);
    let peak = transport.peak.load(Ordering::SeqCst);
    assert!(peak <= MAX_PARALLEL_LOOKUPS, "peak in-flight was {peak}");
    assert_eq!(peak, MAX_PARALLEL_LOOKUPS);
}

#[tokio::test]
async fn results_follow_input_order_not_completion_order() {
    let transport = CountingTransport::with_delays(&[("A", 60), ("B", 40), ("C", 0)]);
    let entities = vec!["A".to_string(), "B".to_string(), "C".to_string()];

    let results = search_batch(&transport, &endpoint(), &params(), entities)
        .await
        .expect("batch succeeds");

    let completed = transport.completion_order.lock().expect("lock").clone();
    assert_eq!(completed.first().map(String::as_str), Some("C"));

    let order: Vec<&str> = results.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    assert_eq!(results[2].body["term"], "C");
}

struct FailingAfterDelay;

impl SearchTransport for FailingAfterDelay {
    async fn execute(&self, request: &SearchRequest) -> Result<RawResponse, SearchError> {
        if request.term() == "unreachable" {
            return Err(SearchError::Http("dns error: no such host".into()));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(RawResponse {
            status: 200,
            body: Some(json!({"searchInformation": {"totalResults": "2"}})),
        })
    }
}

#[tokio::test]
async fn transport_failure_fails_batch_with_network_error() {
    let entities = vec!["a".to_string(), "unreachable".to_string(), "b".to_string()];
    let err = search_batch(&FailingAfterDelay, &endpoint(), &params(), entities)
        .await
        .unwrap_err();

    assert_eq!(err.detail, "Network Error Encountered");
    assert!(err.error.contains("no such host"));
}
