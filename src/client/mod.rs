// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search engine client seam.
//!
//! The pipeline talks to the search engine exclusively through
//! [`SearchClient`]. Documents are addressed by `(index, type, id)`; index
//! creation carries a `mappings` object keyed by type name; updates carry a
//! partial-merge body under a `doc` envelope; searches carry `query_string`,
//! `size` and `from`. Transport, auth and timeouts live in the
//! implementation, not here.

pub mod memory;

pub use memory::InMemorySearchClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::IndexDocument;

#[derive(Error, Debug)]
pub enum SearchClientError {
    /// Index creation hit an already-existing index. The schema mapper
    /// recovers from this locally; everything else propagates.
    #[error("index '{0}' already exists")]
    IndexExists(String),
    #[error("document not found")]
    NotFound,
    #[error("search backend error: {0}")]
    Backend(String),
}

/// Mappings of one index, keyed by type name.
pub type IndexMappings = BTreeMap<String, Value>;

/// A query-string search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw query string, forwarded verbatim
    pub query: String,
    /// Whether wildcards in the query are analyzed
    pub analyze_wildcard: bool,
    /// Result window size
    pub size: usize,
    /// Result window offset
    pub from: usize,
}

impl SearchRequest {
    /// Build a request with the engine defaults for wildcard analysis
    #[must_use]
    pub fn query_string(query: impl Into<String>, size: usize, from: usize) -> Self {
        Self {
            query: query.into(),
            analyze_wildcard: true,
            size,
            from,
        }
    }

    /// The wire-shape request body
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "query": {
                "query_string": {
                    "query": self.query,
                    "analyze_wildcard": self.analyze_wildcard,
                },
            },
            "size": self.size,
            "from": self.from,
        })
    }
}

/// A search response, mirroring the engine's `hits.hits[]` shape.
///
/// `hits` is `None` when the engine returned no hit list at all; the read
/// path treats that as "match nothing", never "match everything".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<Hits>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hits {
    pub total: u64,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

/// Abstracts the search engine behind the documented request contracts.
///
/// Implementations are injected into the pipeline, which enables testing
/// against [`InMemorySearchClient`] without a live engine.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Create an index with all its type mappings in one request.
    ///
    /// Fails with [`SearchClientError::IndexExists`] when the index is
    /// already there.
    async fn create_index(
        &self,
        index: &str,
        mappings: &IndexMappings,
    ) -> Result<(), SearchClientError>;

    /// Replace the mapping of a single type on an existing index
    async fn put_mapping(
        &self,
        index: &str,
        doc_type: &str,
        mapping: &Value,
    ) -> Result<(), SearchClientError>;

    /// Index or replace a document
    async fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        document: &IndexDocument,
    ) -> Result<(), SearchClientError>;

    /// Partially update a document.
    ///
    /// `body` carries the changed fields under a `doc` envelope; merge
    /// semantics are owned by the engine.
    async fn update_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), SearchClientError>;

    /// Delete a document by id
    async fn delete_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<(), SearchClientError>;

    /// Run a query-string search against one `(index, type)` pair
    async fn search(
        &self,
        index: &str,
        doc_type: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_body_shape() {
        let request = SearchRequest::query_string("title:ride*", 50, 0);
        let body = request.to_body();

        assert_eq!(body["query"]["query_string"]["query"], "title:ride*");
        assert_eq!(body["query"]["query_string"]["analyze_wildcard"], true);
        assert_eq!(body["size"], 50);
        assert_eq!(body["from"], 0);
    }

    #[test]
    fn test_search_response_parses_wire_shape() {
        let raw = r#"{
            "hits": {
                "total": 2,
                "hits": [
                    {"_id": "7-en", "_score": 1.2, "_source": {"title": "a"}},
                    {"_id": "9"}
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(raw).unwrap();
        let hits = response.hits.unwrap();
        assert_eq!(hits.total, 2);
        assert_eq!(hits.hits[0].id, "7-en");
        assert_eq!(hits.hits[1].score, None);
    }

    #[test]
    fn test_search_response_without_hit_list() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.hits.is_none());
    }
}
