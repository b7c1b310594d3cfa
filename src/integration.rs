//! The integration entry points the host drives: lookups, option
//! validation, and metadata.
//!
//! An [`Integration`] owns its search transport. Production code builds one
//! with [`crate::startup::startup`]; tests inject a fake transport.

use crate::config::IntegrationConfig;
use crate::entity::Entity;
use crate::lookup::LookupResult;
use crate::options::{LookupOptions, OptionViolation, validate_options};
use cse_search::{CseSearcher, RestError, SearchParams, SearchTransport};

/// A started integration, ready to serve lookups.
#[derive(Debug)]
pub struct Integration<T> {
    searcher: CseSearcher<T>,
    config: IntegrationConfig,
}

impl<T: SearchTransport> Integration<T> {
    #[must_use]
    pub fn new(searcher: CseSearcher<T>, config: IntegrationConfig) -> Self {
        Self { searcher, config }
    }

    #[must_use]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    #[must_use]
    pub fn searcher(&self) -> &CseSearcher<T> {
        &self.searcher
    }

    /// Look up every entity and return one result per entity, in input order.
    ///
    /// # Errors
    ///
    /// If any single entity's request fails, the whole batch fails with that
    /// entity's [`RestError`] and no results are returned.
    pub async fn do_lookup(
        &self,
        entities: Vec<Entity>,
        params: &SearchParams,
    ) -> Result<Vec<LookupResult>, RestError> {
        tracing::trace!(?entities, "doLookup entities");

        let classified = match self.searcher.search_all(params, entities).await {
            Ok(classified) => classified,
            Err(err) => {
                tracing::error!(
                    error = %err.error,
                    status = ?err.status_code,
                    detail = %err.detail,
                    body = ?err.body,
                    "lookup batch failed"
                );
                return Err(err);
            }
        };

        let results: Vec<LookupResult> = classified.into_iter().map(LookupResult::from).collect();
        tracing::debug!(?results, "lookup results");
        Ok(results)
    }

    /// Validate admin-supplied options. Never fails.
    #[must_use]
    pub fn validate_options(&self, options: &LookupOptions) -> Vec<OptionViolation> {
        validate_options(options)
    }

    /// Host-facing metadata: name, entity types, option definitions.
    #[must_use]
    pub fn describe(&self) -> serde_json::Value {
        let config = &self.config;
        serde_json::json!({
            "name": config.name,
            "acronym": config.acronym,
            "description": config.description,
            "entity_types": config.entity_types,
            "custom_types": config.custom_types,
            "default_color": config.default_color,
            "on_demand_only": config.on_demand_only,
            "options": config.options,
        })
    }
}
