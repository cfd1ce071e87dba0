//! Per-model index routing.
//!
//! A model opts into indexing by carrying an `index/type` route in its
//! option bag. [`IndexParameterResolver`] resolves the route once per model
//! name and caches the outcome for its own lifetime, including the
//! "disabled" outcome. Malformed routes are a configuration error surfaced
//! at call time, never cached.

use dashmap::DashMap;

use crate::error::SyncError;
use crate::model::Model;

/// Resolved destination for a model's documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
    /// Index name
    pub index: String,
    /// Type name within the index
    pub doc_type: String,
}

/// Resolves and caches the `(index, type)` pair per model name.
///
/// The cache is append-only and shared read-mostly; repeated resolutions
/// are O(1) lookups.
pub struct IndexParameterResolver {
    option_key: String,
    targets: DashMap<String, Option<IndexTarget>>,
}

impl IndexParameterResolver {
    /// Create a resolver reading the route from `option_key`
    #[must_use]
    pub fn new(option_key: impl Into<String>) -> Self {
        Self {
            option_key: option_key.into(),
            targets: DashMap::new(),
        }
    }

    /// Resolve the index target for a model.
    ///
    /// Returns `None` when the model has no route option (indexing
    /// disabled). A route without a `/` separator is an error.
    pub fn resolve(&self, model: &Model) -> Result<Option<IndexTarget>, SyncError> {
        if let Some(cached) = self.targets.get(model.name()) {
            return Ok(cached.value().clone());
        }

        let target = match model.get_option(&self.option_key) {
            None | Some("") => None,
            Some(route) => {
                let (index, doc_type) =
                    route
                        .split_once('/')
                        .ok_or_else(|| SyncError::InvalidIndexRoute {
                            model: model.name().to_string(),
                            value: route.to_string(),
                        })?;
                Some(IndexTarget {
                    index: index.to_string(),
                    doc_type: doc_type.to_string(),
                })
            }
        };

        self.targets
            .insert(model.name().to_string(), target.clone());
        Ok(target)
    }
}
