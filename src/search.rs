// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search front-end and result translation.
//!
//! [`EntrySearch`] issues a raw query-string search for a model and
//! translates the hit list back into a primary-key filter for the consuming
//! data-layer query. Translation never widens the consuming query: a
//! missing hit list, an empty hit list or unusable document ids all
//! collapse to "match nothing".

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::client::{SearchClient, SearchRequest, SearchResponse};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::metrics;
use crate::model::{DocumentId, Model};
use crate::resolver::IndexParameterResolver;

/// Options for a query-string search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Raw query string, forwarded verbatim. Without one the search is a
    /// no-op outcome.
    pub query: Option<String>,
    /// Result window size; falls back to the configured default
    pub limit: Option<usize>,
    /// Result window offset; defaults to 0
    pub offset: Option<usize>,
}

impl SearchOptions {
    /// Options carrying just a query string
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// The consuming query seam: the data-layer query object the translated
/// identifier filter is applied to.
pub trait RecordQuery {
    /// Constrain the query to the given primary keys
    fn restrict_to_ids(&mut self, ids: &BTreeSet<String>);

    /// Constrain the query to match nothing
    fn restrict_to_none(&mut self);
}

/// Identifier filter translated from a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    /// No usable hits; the consuming query must return nothing
    MatchNone,
    /// Deduplicated primary keys, locale suffixes stripped
    Ids(BTreeSet<String>),
}

impl IdFilter {
    /// Translate a search response into an identifier filter.
    ///
    /// Locale suffixes are split off each document id and discarded;
    /// translation is keyed purely on primary key.
    #[must_use]
    pub fn from_response(response: &SearchResponse) -> Self {
        let Some(ref hits) = response.hits else {
            return Self::MatchNone;
        };

        let ids: BTreeSet<String> = hits
            .hits
            .iter()
            .map(|hit| DocumentId::split(&hit.id).0)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            Self::MatchNone
        } else {
            Self::Ids(ids)
        }
    }

    /// Apply this filter to a consuming query
    pub fn apply(&self, query: &mut dyn RecordQuery) {
        match self {
            Self::MatchNone => query.restrict_to_none(),
            Self::Ids(ids) => query.restrict_to_ids(ids),
        }
    }
}

/// Query-string search front-end for indexed models.
pub struct EntrySearch {
    resolver: Arc<IndexParameterResolver>,
    client: Arc<dyn SearchClient>,
    default_limit: usize,
}

impl EntrySearch {
    pub fn new(
        resolver: Arc<IndexParameterResolver>,
        client: Arc<dyn SearchClient>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            resolver,
            client,
            default_limit: config.search_limit,
        }
    }

    /// Search a model's index with a raw query string.
    ///
    /// Returns `None` without contacting the engine when the model has
    /// indexing disabled or the options carry no query string.
    #[tracing::instrument(skip(self, model, options), fields(model = model.name()))]
    pub async fn search_by_query_string(
        &self,
        model: &Model,
        options: &SearchOptions,
    ) -> Result<Option<SearchResponse>, SyncError> {
        let start = Instant::now();
        let Some(target) = self.resolver.resolve(model)? else {
            metrics::record_operation(model.name(), "search", "skipped");
            return Ok(None);
        };
        let Some(ref query) = options.query else {
            metrics::record_operation(model.name(), "search", "skipped");
            return Ok(None);
        };

        let request = SearchRequest::query_string(
            query.clone(),
            options.limit.unwrap_or(self.default_limit),
            options.offset.unwrap_or(0),
        );

        let response = self
            .client
            .search(&target.index, &target.doc_type, &request)
            .await?;

        let hit_count = response.hits.as_ref().map_or(0, |h| h.hits.len());
        debug!(hits = hit_count, "Query-string search completed");
        metrics::record_operation(model.name(), "search", "success");
        metrics::record_latency("search", start.elapsed());

        Ok(Some(response))
    }

    /// Narrow a consuming query to the identifiers a search result names.
    pub fn apply_result_to_query(&self, response: &SearchResponse, query: &mut dyn RecordQuery) {
        IdFilter::from_response(response).apply(query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Hit, Hits};

    /// Minimal consuming query capturing the applied constraint.
    #[derive(Default)]
    struct CapturedQuery {
        ids: Option<BTreeSet<String>>,
        none: bool,
    }

    impl RecordQuery for CapturedQuery {
        fn restrict_to_ids(&mut self, ids: &BTreeSet<String>) {
            self.ids = Some(ids.clone());
        }

        fn restrict_to_none(&mut self) {
            self.none = true;
        }
    }

    fn response_with_ids(ids: &[&str]) -> SearchResponse {
        SearchResponse {
            hits: Some(Hits {
                total: ids.len() as u64,
                hits: ids
                    .iter()
                    .map(|id| Hit {
                        id: id.to_string(),
                        score: None,
                        source: None,
                    })
                    .collect(),
            }),
        }
    }

    #[test]
    fn test_translation_strips_locales_and_deduplicates() {
        let response = response_with_ids(&["7-en", "7-fr", "9"]);
        let filter = IdFilter::from_response(&response);

        let expected: BTreeSet<String> = ["7", "9"].iter().map(|s| s.to_string()).collect();
        assert_eq!(filter, IdFilter::Ids(expected));
    }

    #[test]
    fn test_missing_hit_list_matches_nothing() {
        let response = SearchResponse { hits: None };
        assert_eq!(IdFilter::from_response(&response), IdFilter::MatchNone);
    }

    #[test]
    fn test_empty_hit_list_matches_nothing() {
        let response = response_with_ids(&[]);
        assert_eq!(IdFilter::from_response(&response), IdFilter::MatchNone);
    }

    #[test]
    fn test_all_hits_malformed_matches_nothing() {
        let response = response_with_ids(&["", ""]);
        assert_eq!(IdFilter::from_response(&response), IdFilter::MatchNone);
    }

    #[test]
    fn test_apply_restricts_ids() {
        let mut query = CapturedQuery::default();
        IdFilter::from_response(&response_with_ids(&["7-en", "9"])).apply(&mut query);

        let ids = query.ids.unwrap();
        assert!(ids.contains("7"));
        assert!(ids.contains("9"));
        assert!(!query.none);
    }

    #[test]
    fn test_apply_match_none() {
        let mut query = CapturedQuery::default();
        IdFilter::from_response(&SearchResponse { hits: None }).apply(&mut query);
        assert!(query.none);
        assert!(query.ids.is_none());
    }
}
