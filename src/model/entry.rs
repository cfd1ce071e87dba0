//! Entries and their index documents.
//!
//! The pipeline never inspects record state directly. Any record type that
//! exposes an identifier, an optional locale and a pre-built index document
//! can flow through it; see [`IndexableEntry`]. [`DocumentBuilder`] helps
//! implementors assemble that document under the same field rules the schema
//! mapper applies.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use super::{FieldKind, Model, PropertyType};
use crate::error::SyncError;

/// The field-value mapping submitted to the search engine for one entry.
pub type IndexDocument = serde_json::Map<String, Value>;

/// Capability interface for records the pipeline can index.
///
/// Production of the document is entirely delegated to the record type
/// (hand-written, derived, or generated by the data layer at build time).
pub trait IndexableEntry: Send + Sync {
    /// Primary key of the record, rendered as a string
    fn id(&self) -> String;

    /// Locale of this variant, for entries of a localized model
    fn locale(&self) -> Option<String> {
        None
    }

    /// The document indexed for this entry
    fn to_index_document(&self) -> IndexDocument;
}

/// Identifier addressing one document in the search index.
///
/// `primaryKey` for plain entries, `primaryKey + "-" + locale` for localized
/// ones. The separator is not escaped: a primary key that itself contains
/// `-` cannot be told apart from a locale suffix when splitting. The wire
/// format is kept as-is; changing it would change every document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId(String);

impl DocumentId {
    /// Build a document id from a primary key and optional locale
    #[must_use]
    pub fn new(id: &str, locale: Option<&str>) -> Self {
        match locale {
            Some(locale) => Self(format!("{id}-{locale}")),
            None => Self(id.to_string()),
        }
    }

    /// Build the document id for an entry
    #[must_use]
    pub fn for_entry(entry: &dyn IndexableEntry) -> Self {
        Self::new(&entry.id(), entry.locale().as_deref())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a raw document id back into primary key and locale.
    ///
    /// Splits on the first `-`. A separator at position 0 does not count,
    /// so an id that starts with `-` is returned whole.
    #[must_use]
    pub fn split(raw: &str) -> (&str, Option<&str>) {
        match raw.split_once('-') {
            Some((id, locale)) if !id.is_empty() => (id, Some(locale)),
            _ => (raw, None),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paged, ordered access to a model's entries, provided by the data layer.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch one page of entries for `model` in `locale`, ordered by
    /// ascending identifier. A page shorter than `limit` is the last page.
    async fn entries_page(
        &self,
        model: &str,
        locale: &str,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<Box<dyn IndexableEntry>>, SyncError>;
}

/// Helper for assembling an [`IndexDocument`] under the model's field rules.
///
/// Applies the same per-field policy the schema mapper uses on the mapping
/// side: omitted and non-indexable properties are dropped, the primary key
/// is dropped (it already addresses the document), booleans are coerced,
/// to-many values are string lists, to-one values are scalar-only nested
/// objects. [`finish`](Self::finish) derives the `geo` field when the model
/// declares both `latitude` and `longitude`.
///
/// # Example
///
/// ```
/// use elastic_sync::model::{DocumentBuilder, Model, PropertyType};
/// use serde_json::json;
///
/// let model = Model::new("Place")
///     .property("id", PropertyType::Pk)
///     .property("name", PropertyType::String)
///     .property("latitude", PropertyType::Float)
///     .property("longitude", PropertyType::Float);
///
/// let doc = DocumentBuilder::new(&model)
///     .value("id", json!(7))
///     .value("name", json!("Harbour"))
///     .value("latitude", json!(51.05))
///     .value("longitude", json!(3.72))
///     .finish();
///
/// assert!(doc.get("id").is_none());
/// assert_eq!(doc["geo"]["lat"], json!(51.05));
/// ```
pub struct DocumentBuilder<'a> {
    model: &'a Model,
    doc: IndexDocument,
}

impl<'a> DocumentBuilder<'a> {
    /// Start a document for an entry of `model`
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            doc: IndexDocument::new(),
        }
    }

    /// Set a scalar property value.
    ///
    /// Unknown fields, omitted fields, non-property fields and
    /// non-indexable property types are ignored.
    #[must_use]
    pub fn value(mut self, field: &str, value: Value) -> Self {
        let Some(definition) = self.model.field(field) else {
            return self;
        };
        if definition.omit {
            return self;
        }
        let FieldKind::Property(ref property_type) = definition.kind else {
            return self;
        };

        match property_type {
            PropertyType::Binary
            | PropertyType::File
            | PropertyType::Image
            | PropertyType::Password
            | PropertyType::Pk
            | PropertyType::Serialized
            | PropertyType::Custom(_) => self,
            PropertyType::Boolean => {
                self.doc
                    .insert(field.to_string(), Value::Bool(coerce_bool(&value)));
                self
            }
            PropertyType::Date
            | PropertyType::DateTime
            | PropertyType::Email
            | PropertyType::RichContent
            | PropertyType::String
            | PropertyType::Text
            | PropertyType::Website
            | PropertyType::Wysiwyg
            | PropertyType::Float
            | PropertyType::Integer
            | PropertyType::Time => {
                self.doc.insert(field.to_string(), value);
                self
            }
        }
    }

    /// Set a to-many field as the string representations of its entries
    #[must_use]
    pub fn strings(mut self, field: &str, items: Vec<String>) -> Self {
        let Some(definition) = self.model.field(field) else {
            return self;
        };
        if definition.omit || !matches!(definition.kind, FieldKind::Collection { .. }) {
            return self;
        }

        self.doc.insert(
            field.to_string(),
            Value::Array(items.into_iter().map(Value::String).collect()),
        );
        self
    }

    /// Set a to-one field as a nested scalar document, or null when unset
    #[must_use]
    pub fn related(mut self, field: &str, related: Option<IndexDocument>) -> Self {
        let Some(definition) = self.model.field(field) else {
            return self;
        };
        if definition.omit || !matches!(definition.kind, FieldKind::Relation { .. }) {
            return self;
        }

        let value = match related {
            Some(doc) => Value::Object(doc),
            None => Value::Null,
        };
        self.doc.insert(field.to_string(), value);
        self
    }

    /// Set the locale of this variant, for entries of a localized model
    #[must_use]
    pub fn locale(mut self, locale: &str) -> Self {
        self.doc
            .insert("locale".to_string(), Value::String(locale.to_string()));
        self
    }

    /// Finish the document, deriving `geo` when the model declares both
    /// `latitude` and `longitude`. `geo` is null when either value is unset.
    #[must_use]
    pub fn finish(mut self) -> IndexDocument {
        if self.model.field("latitude").is_some() && self.model.field("longitude").is_some() {
            let geo = match (self.doc.get("latitude"), self.doc.get("longitude")) {
                (Some(lat), Some(lon)) if !lat.is_null() && !lon.is_null() => {
                    let mut point = IndexDocument::new();
                    point.insert("lat".to_string(), lat.clone());
                    point.insert("lon".to_string(), lon.clone());
                    Value::Object(point)
                }
                _ => Value::Null,
            };
            self.doc.insert("geo".to_string(), geo);
        }

        self.doc
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
