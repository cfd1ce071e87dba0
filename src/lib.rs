//! # Elastic Sync
//!
//! Keeps an Elasticsearch-style search index synchronized with records
//! managed by an ORM-style data layer, and translates search results back
//! into record identifiers the data layer can filter on.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Data Layer (host)                     │
//! │  • ModelRegistry: models, fields, relations, options        │
//! │  • EntrySource: paged, id-ordered entry access              │
//! │  • Post-write notifications                                 │
//! └─────────────────────────────────────────────────────────────┘
//!          │ write events                        ▲ id filter
//!          ▼                                     │
//! ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │  SyncDispatcher  │  │   SchemaMapper   │  │   EntrySearch    │
//! │  insert/update/  │  │  model schema →  │  │  query string →  │
//! │  delete → index  │  │  index mappings  │  │  primary keys    │
//! └──────────────────┘  └──────────────────┘  └──────────────────┘
//!          │                     │                     │
//!          ▼                     ▼                     │
//! ┌──────────────────────────────────────────┐         │
//! │             DocumentIndexer              │         │
//! │  • single-entry index/update/delete      │         │
//! │  • paginated full-model reindex          │         │
//! │  • per-model routing via the resolver    │         │
//! └──────────────────────────────────────────┘         │
//!                       │                              │
//!                       ▼                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │              SearchClient (trait seam)                      │
//! │  (index, type, id) addressing · mappings · query_string     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use elastic_sync::{
//!     InMemorySearchClient, IndexParameterResolver, SchemaMapper, SyncConfig,
//! };
//! use elastic_sync::model::{InMemoryModelRegistry, Model, PropertyType};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), elastic_sync::SyncError> {
//! let mut registry = InMemoryModelRegistry::new("en");
//! registry.register(
//!     Model::new("Article")
//!         .option("elastic.index", "content/article")
//!         .property("id", PropertyType::Pk)
//!         .property("title", PropertyType::String),
//! );
//!
//! let config = SyncConfig::default();
//! let resolver = Arc::new(IndexParameterResolver::new(config.route_option.clone()));
//! let client = Arc::new(InMemorySearchClient::new());
//!
//! let mapper = SchemaMapper::new(Arc::new(registry), resolver, client.clone());
//! mapper.define_indices().await?;
//!
//! assert!(client.has_index("content"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`model`]: model/field definitions, entries, the registry and entry
//!   source seams
//! - [`client`]: the search engine seam and an in-memory implementation
//! - [`resolver`]: per-model `(index, type)` routing with a process cache
//! - [`mapper`]: schema translation and idempotent index definition
//! - [`indexer`]: entry operations and paginated re-indexing
//! - [`search`]: query-string search and result-to-id-filter translation
//! - [`dispatcher`]: post-write event glue

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod indexer;
pub mod mapper;
pub mod metrics;
pub mod model;
pub mod resolver;
pub mod search;

pub use client::{
    Hit, Hits, InMemorySearchClient, IndexMappings, SearchClient, SearchClientError,
    SearchRequest, SearchResponse,
};
pub use config::SyncConfig;
pub use dispatcher::{SyncDispatcher, WriteEvent};
pub use error::SyncError;
pub use indexer::DocumentIndexer;
pub use mapper::SchemaMapper;
pub use model::{
    DocumentBuilder, DocumentId, EntrySource, IndexDocument, IndexableEntry, Model, ModelRegistry,
};
pub use resolver::{IndexParameterResolver, IndexTarget};
pub use search::{EntrySearch, IdFilter, RecordQuery, SearchOptions};
