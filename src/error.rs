//! Error taxonomy for the sync pipeline.
//!
//! Configuration errors (bad index route, unmapped field type) are fatal for
//! the operation that hit them and carry enough context to name the model and
//! field. Client failures are wrapped, not retried; retry policy belongs to
//! the caller.

use thiserror::Error;

use crate::client::SearchClientError;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The model's index-route option is present but not of the form
    /// `index/type`.
    #[error("invalid index route for model '{model}': expecting 'index/type', got '{value}'")]
    InvalidIndexRoute { model: String, value: String },

    /// A property field carries a type tag with no index mapping.
    #[error("could not map '{field}' of model '{model}': no mapping available for type '{tag}'")]
    UnmappedFieldType {
        model: String,
        field: String,
        tag: String,
    },

    /// A relation field references a model the registry does not know.
    #[error("unknown model '{name}' referenced by '{field}' of model '{model}'")]
    UnknownModel {
        name: String,
        model: String,
        field: String,
    },

    /// The data-access layer failed while paging entries.
    #[error("data access error: {0}")]
    DataAccess(String),

    /// A failure surfaced by the search client.
    #[error(transparent)]
    Client(#[from] SearchClientError),
}
