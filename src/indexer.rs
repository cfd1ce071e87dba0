// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Document indexer.
//!
//! Drives single-entry index/update/delete operations and full-model
//! re-indexing against the search client. Models without an index route are
//! a no-op outcome (`false`), not an error.
//!
//! Re-indexing pages through a model's entries in ascending-identifier
//! order, 1000 rows at a time by default, until a short page terminates the
//! loop. Pages are fetched and indexed independently, so a mid-run failure
//! loses only the in-flight page. Localized models are re-indexed once per
//! known locale.

use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::client::SearchClient;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::metrics;
use crate::model::{DocumentId, EntrySource, IndexableEntry, Model, ModelRegistry};
use crate::resolver::IndexParameterResolver;

/// Synchronizes entries of registered models into the search index.
pub struct DocumentIndexer {
    registry: Arc<dyn ModelRegistry>,
    entries: Arc<dyn EntrySource>,
    resolver: Arc<IndexParameterResolver>,
    client: Arc<dyn SearchClient>,
    page_size: usize,
}

impl DocumentIndexer {
    pub fn new(
        registry: Arc<dyn ModelRegistry>,
        entries: Arc<dyn EntrySource>,
        resolver: Arc<IndexParameterResolver>,
        client: Arc<dyn SearchClient>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            registry,
            entries,
            resolver,
            client,
            page_size: config.reindex_page_size,
        }
    }

    /// Index or replace one entry's document.
    ///
    /// Returns `false` without contacting the engine when the model has
    /// indexing disabled.
    #[tracing::instrument(skip(self, model, entry), fields(model = model.name(), id = %entry.id()))]
    pub async fn index_entry(
        &self,
        model: &Model,
        entry: &dyn IndexableEntry,
    ) -> Result<bool, SyncError> {
        let start = Instant::now();
        let Some(target) = self.resolver.resolve(model)? else {
            metrics::record_operation(model.name(), "index", "skipped");
            return Ok(false);
        };

        let document_id = DocumentId::for_entry(entry);
        let document = entry.to_index_document();

        match self
            .client
            .index_document(&target.index, &target.doc_type, document_id.as_str(), &document)
            .await
        {
            Ok(()) => {
                debug!(document_id = %document_id, "Indexed entry");
                metrics::record_operation(model.name(), "index", "success");
                metrics::record_latency("index", start.elapsed());
                Ok(true)
            }
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "Failed to index entry");
                metrics::record_operation(model.name(), "index", "error");
                metrics::record_entry_failure(model.name(), "index");
                Err(e.into())
            }
        }
    }

    /// Partially update one entry's document under a `doc` envelope.
    ///
    /// Merge semantics are owned by the engine; only the fields present in
    /// the entry's document are touched.
    #[tracing::instrument(skip(self, model, entry), fields(model = model.name(), id = %entry.id()))]
    pub async fn update_entry(
        &self,
        model: &Model,
        entry: &dyn IndexableEntry,
    ) -> Result<bool, SyncError> {
        let start = Instant::now();
        let Some(target) = self.resolver.resolve(model)? else {
            metrics::record_operation(model.name(), "update", "skipped");
            return Ok(false);
        };

        let document_id = DocumentId::for_entry(entry);
        let body = json!({"doc": entry.to_index_document()});

        match self
            .client
            .update_document(&target.index, &target.doc_type, document_id.as_str(), &body)
            .await
        {
            Ok(()) => {
                debug!(document_id = %document_id, "Updated entry");
                metrics::record_operation(model.name(), "update", "success");
                metrics::record_latency("update", start.elapsed());
                Ok(true)
            }
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "Failed to update entry");
                metrics::record_operation(model.name(), "update", "error");
                metrics::record_entry_failure(model.name(), "update");
                Err(e.into())
            }
        }
    }

    /// Delete one entry's document.
    #[tracing::instrument(skip(self, model, entry), fields(model = model.name(), id = %entry.id()))]
    pub async fn delete_entry(
        &self,
        model: &Model,
        entry: &dyn IndexableEntry,
    ) -> Result<bool, SyncError> {
        let start = Instant::now();
        let Some(target) = self.resolver.resolve(model)? else {
            metrics::record_operation(model.name(), "delete", "skipped");
            return Ok(false);
        };

        let document_id = DocumentId::for_entry(entry);

        match self
            .client
            .delete_document(&target.index, &target.doc_type, document_id.as_str())
            .await
        {
            Ok(()) => {
                debug!(document_id = %document_id, "Deleted entry");
                metrics::record_operation(model.name(), "delete", "success");
                metrics::record_latency("delete", start.elapsed());
                Ok(true)
            }
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "Failed to delete entry");
                metrics::record_operation(model.name(), "delete", "error");
                metrics::record_entry_failure(model.name(), "delete");
                Err(e.into())
            }
        }
    }

    /// Re-index every entry of a model, across all its locales.
    ///
    /// No-op for disabled models. Pages must be fetched sequentially within
    /// one locale; independent models or locales may run concurrently since
    /// they touch disjoint document sets.
    #[tracing::instrument(skip(self, model), fields(model = model.name()))]
    pub async fn index_model(&self, model: &Model) -> Result<(), SyncError> {
        if self.resolver.resolve(model)?.is_none() {
            debug!("Indexing disabled, skipping model");
            return Ok(());
        }

        let locales = if model.is_localized() {
            self.registry.locales()
        } else {
            vec![self.registry.default_locale()]
        };

        let mut total = 0usize;
        for locale in &locales {
            let mut page = 1usize;
            loop {
                let offset = (page - 1) * self.page_size;
                let entries = self
                    .entries
                    .entries_page(model.name(), locale, offset as u64, self.page_size)
                    .await?;
                let count = entries.len();

                for entry in &entries {
                    self.index_entry(model, entry.as_ref()).await?;
                }

                metrics::record_page(model.name(), locale, count);
                debug!(locale = %locale, page, rows = count, "Indexed page");
                total += count;

                if count < self.page_size {
                    break;
                }
                page += 1;
            }
        }

        info!(entries = total, locales = locales.len(), "Re-indexed model");
        Ok(())
    }

    /// Re-index a collection of models, sequentially.
    pub async fn index_models(&self, models: &[Arc<Model>]) -> Result<(), SyncError> {
        for model in models {
            self.index_model(model).await?;
        }
        Ok(())
    }
}
