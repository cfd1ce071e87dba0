//! Write-event glue.
//!
//! The data layer notifies the dispatcher after a successful insert, update
//! or delete; the dispatcher forwards the entry to the matching indexer
//! operation. Kept thin on purpose: retry policy and background scheduling
//! belong to the host.

use std::sync::Arc;

use crate::error::SyncError;
use crate::indexer::DocumentIndexer;
use crate::model::{IndexableEntry, Model};

/// A completed write on the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEvent {
    Inserted,
    Updated,
    Deleted,
}

/// Forwards post-write notifications to the document indexer.
pub struct SyncDispatcher {
    indexer: Arc<DocumentIndexer>,
}

impl SyncDispatcher {
    pub fn new(indexer: Arc<DocumentIndexer>) -> Self {
        Self { indexer }
    }

    /// Handle a post-write notification for one entry.
    ///
    /// Returns `false` when the model has indexing disabled.
    pub async fn handle(
        &self,
        event: WriteEvent,
        model: &Model,
        entry: &dyn IndexableEntry,
    ) -> Result<bool, SyncError> {
        match event {
            WriteEvent::Inserted => self.indexer.index_entry(model, entry).await,
            WriteEvent::Updated => self.indexer.update_entry(model, entry).await,
            WriteEvent::Deleted => self.indexer.delete_entry(model, entry).await,
        }
    }
}
