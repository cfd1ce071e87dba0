//! Configuration for the sync pipeline.
//!
//! # Example
//!
//! ```
//! use elastic_sync::SyncConfig;
//!
//! // Minimal config (uses defaults)
//! let config = SyncConfig::default();
//! assert_eq!(config.reindex_page_size, 1000);
//!
//! // Full config
//! let config = SyncConfig {
//!     reindex_page_size: 500,
//!     search_limit: 25,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the sync pipeline.
///
/// All fields have sensible defaults matching the behaviour of the pipeline
/// against a stock Elasticsearch-style engine.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Page size used while re-indexing a whole model (default: 1000)
    #[serde(default = "default_reindex_page_size")]
    pub reindex_page_size: usize,

    /// Default result window for query-string searches (default: 50)
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Model option key carrying the `index/type` route
    /// (default: "elastic.index")
    #[serde(default = "default_route_option")]
    pub route_option: String,
}

fn default_reindex_page_size() -> usize {
    1000
}
fn default_search_limit() -> usize {
    50
}
fn default_route_option() -> String {
    "elastic.index".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reindex_page_size: default_reindex_page_size(),
            search_limit: default_search_limit(),
            route_option: default_route_option(),
        }
    }
}
