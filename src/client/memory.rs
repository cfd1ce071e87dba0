//! In-memory search client.
//!
//! Implements the full [`SearchClient`] seam against process memory, with
//! the same failure semantics the pipeline relies on: re-creating an index
//! fails with `IndexExists`, updates merge under the `doc` envelope, and
//! query-string search does a naive substring match over document values.
//! Useful for tests and for hosts that want the pipeline wired up before a
//! real engine is available.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    Hit, Hits, IndexMappings, SearchClient, SearchClientError, SearchRequest, SearchResponse,
};
use crate::model::IndexDocument;

#[derive(Default)]
struct IndexState {
    mappings: IndexMappings,
    // (doc_type, id) -> document; BTreeMap keeps search results deterministic
    documents: BTreeMap<(String, String), Value>,
}

pub struct InMemorySearchClient {
    indices: RwLock<HashMap<String, IndexState>>,
    requests: AtomicU64,
}

impl InMemorySearchClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            indices: RwLock::new(HashMap::new()),
            requests: AtomicU64::new(0),
        }
    }

    /// Number of requests served, across all operations
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Whether an index exists
    #[must_use]
    pub fn has_index(&self, index: &str) -> bool {
        self.indices.read().contains_key(index)
    }

    /// The stored mapping of one type, if any
    #[must_use]
    pub fn mapping(&self, index: &str, doc_type: &str) -> Option<Value> {
        self.indices
            .read()
            .get(index)
            .and_then(|state| state.mappings.get(doc_type).cloned())
    }

    /// A stored document, if any
    #[must_use]
    pub fn document(&self, index: &str, doc_type: &str, id: &str) -> Option<Value> {
        self.indices.read().get(index).and_then(|state| {
            state
                .documents
                .get(&(doc_type.to_string(), id.to_string()))
                .cloned()
        })
    }

    /// Number of documents stored in an index
    #[must_use]
    pub fn document_count(&self, index: &str) -> usize {
        self.indices
            .read()
            .get(index)
            .map_or(0, |state| state.documents.len())
    }

    /// Drop all indices and documents
    pub fn clear(&self) {
        self.indices.write().clear();
    }

    fn touch(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for InMemorySearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for InMemorySearchClient {
    async fn create_index(
        &self,
        index: &str,
        mappings: &IndexMappings,
    ) -> Result<(), SearchClientError> {
        self.touch();
        let mut indices = self.indices.write();
        if indices.contains_key(index) {
            return Err(SearchClientError::IndexExists(index.to_string()));
        }

        indices.insert(
            index.to_string(),
            IndexState {
                mappings: mappings.clone(),
                documents: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn put_mapping(
        &self,
        index: &str,
        doc_type: &str,
        mapping: &Value,
    ) -> Result<(), SearchClientError> {
        self.touch();
        let mut indices = self.indices.write();
        let state = indices
            .get_mut(index)
            .ok_or_else(|| SearchClientError::Backend(format!("no such index '{index}'")))?;

        state.mappings.insert(doc_type.to_string(), mapping.clone());
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        document: &IndexDocument,
    ) -> Result<(), SearchClientError> {
        self.touch();
        let mut indices = self.indices.write();
        // Engines auto-create an index on first document
        let state = indices.entry(index.to_string()).or_default();
        state.documents.insert(
            (doc_type.to_string(), id.to_string()),
            Value::Object(document.clone()),
        );
        Ok(())
    }

    async fn update_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), SearchClientError> {
        self.touch();
        let patch = body
            .get("doc")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                SearchClientError::Backend("update body must carry a 'doc' object".to_string())
            })?
            .clone();

        let mut indices = self.indices.write();
        let existing = indices
            .get_mut(index)
            .and_then(|state| {
                state
                    .documents
                    .get_mut(&(doc_type.to_string(), id.to_string()))
            })
            .ok_or(SearchClientError::NotFound)?;

        if let Value::Object(fields) = existing {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<(), SearchClientError> {
        self.touch();
        if let Some(state) = self.indices.write().get_mut(index) {
            state
                .documents
                .remove(&(doc_type.to_string(), id.to_string()));
        }
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        doc_type: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchClientError> {
        self.touch();
        let indices = self.indices.read();
        let state = indices
            .get(index)
            .ok_or_else(|| SearchClientError::Backend(format!("no such index '{index}'")))?;

        let needle = request.query.to_lowercase();
        let matched: Vec<Hit> = state
            .documents
            .iter()
            .filter(|((stored_type, _), _)| stored_type.as_str() == doc_type)
            .filter(|(_, document)| request.query == "*" || value_matches(document, &needle))
            .map(|((_, id), document)| Hit {
                id: id.clone(),
                score: Some(1.0),
                source: Some(document.clone()),
            })
            .collect();

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(request.from)
            .take(request.size)
            .collect();

        Ok(SearchResponse {
            hits: Some(Hits { total, hits }),
        })
    }
}

/// Naive query match: any string value containing the needle, case
/// insensitive, searched recursively.
fn value_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|item| value_matches(item, needle)),
        Value::Object(map) => map.values().any(|item| value_matches(item, needle)),
        Value::Number(n) => n.to_string() == needle,
        Value::Bool(b) => b.to_string() == needle,
        Value::Null => false,
    }
}
