//! Bounded-parallel batch search: one request per entity, all-or-nothing.
//!
//! Requests run through a [`futures`] stream buffered to
//! [`MAX_PARALLEL_LOOKUPS`]. Results are returned in input order regardless
//! of completion order. The first classified failure ends the batch: no
//! further requests are started and requests still in flight are dropped.

use crate::classify::{classify, Classified};
use crate::error::RestError;
use crate::request::SearchRequest;
use crate::transport::SearchTransport;
use crate::types::SearchParams;
use futures::{StreamExt, TryStreamExt};
use url::Url;

/// Maximum number of requests in flight at once.
pub const MAX_PARALLEL_LOOKUPS: usize = 10;

/// Anything that can be searched for by value.
pub trait SearchTerm {
    /// The raw value to search for, without quoting.
    fn search_term(&self) -> &str;
}

impl SearchTerm for String {
    fn search_term(&self) -> &str {
        self
    }
}

impl SearchTerm for &str {
    fn search_term(&self) -> &str {
        self
    }
}

/// Search for every entity in `entities` with at most
/// [`MAX_PARALLEL_LOOKUPS`] requests in flight.
///
/// # Errors
///
/// Returns the first [`RestError`] produced by any request. Partial results
/// are discarded.
pub async fn search_batch<T, E>(
    transport: &T,
    endpoint: &Url,
    params: &SearchParams,
    entities: Vec<E>,
) -> Result<Vec<Classified<E>>, RestError>
where
    T: SearchTransport,
    E: SearchTerm + Send,
{
    let tasks = entities.into_iter().enumerate().map(|(index, entity)| {
        let request = SearchRequest::new(endpoint, params, entity.search_term());
        tracing::trace!(?request, "request options");
        async move {
            let outcome = transport.execute(&request).await;
            match &outcome {
                Ok(response) => tracing::trace!(
                    status = response.status,
                    body = ?response.body,
                    "search response"
                ),
                Err(err) => tracing::trace!(error = %err, "search transport failed"),
            }
            classify(entity, outcome).map(|classified| (index, classified))
        }
    });

    let mut completed: Vec<(usize, Classified<E>)> = futures::stream::iter(tasks)
        .buffer_unordered(MAX_PARALLEL_LOOKUPS)
        .try_collect()
        .await?;

    completed.sort_unstable_by_key(|(index, _)| *index);
    Ok(completed.into_iter().map(|(_, classified)| classified).collect())
}
