//! Lookup results returned to the host.

use crate::entity::Entity;
use cse_search::{Classified, total_results};
use serde::{Deserialize, Serialize};

/// The result for one entity.
///
/// `data` is `None` (serialized as `null`) when the search found nothing,
/// which the host shows as "no information found".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub entity: Entity,
    pub data: Option<LookupData>,
}

/// Summary tags plus the raw API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupData {
    /// One human-readable line: `Total Results: <N>`.
    pub summary: Vec<String>,
    /// The full decoded CSE response.
    pub details: serde_json::Value,
}

impl From<Classified<Entity>> for LookupResult {
    fn from(classified: Classified<Entity>) -> Self {
        let Classified { entity, body } = classified;
        let data = summarize(body);
        Self { entity, data }
    }
}

/// Shape a successful response body into result data.
///
/// Returns `None` when `totalResults` is `"0"`, or when the body carries no
/// `searchInformation.totalResults` string at all.
#[must_use]
pub fn summarize(body: serde_json::Value) -> Option<LookupData> {
    let total = match total_results(&body) {
        Some("0") | None => return None,
        Some(total) => total.to_owned(),
    };
    Some(LookupData {
        summary: vec![format!("Total Results: {total}")],
        details: body,
    })
}
