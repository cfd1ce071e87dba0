// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Model definitions consumed by the sync pipeline.
//!
//! A [`Model`] is a named record type with an ordered field schema, a
//! localization flag and an option bag. Fields are a closed sum over three
//! kinds: scalar properties, to-one relations and to-many collections.
//! Adding a new field kind is a compile-time exhaustiveness failure in the
//! mapper, not a silent default branch.
//!
//! # Example
//!
//! ```
//! use elastic_sync::model::{Model, PropertyType};
//!
//! let model = Model::new("Article")
//!     .option("elastic.index", "content/article")
//!     .property("id", PropertyType::Pk)
//!     .property("title", PropertyType::String)
//!     .property("published", PropertyType::Boolean)
//!     .relation("author", "Author")
//!     .collection("tags", "Tag")
//!     .localized();
//!
//! assert!(model.is_localized());
//! assert_eq!(model.fields().len(), 5);
//! ```

mod entry;
mod registry;

pub use entry::{DocumentBuilder, DocumentId, EntrySource, IndexDocument, IndexableEntry};
pub use registry::{InMemoryModelRegistry, ModelRegistry};

use std::collections::HashMap;

/// Primitive type tag of a scalar property field.
///
/// The first group (binary through serialized) is not indexable and is
/// silently left out of mappings and documents. `Custom` covers data-layer
/// extension types the pipeline has no mapping for; encountering one during
/// schema generation is a fatal configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Binary,
    File,
    Image,
    Password,
    Serialized,
    Boolean,
    Date,
    DateTime,
    Email,
    RichContent,
    String,
    Text,
    Website,
    Wysiwyg,
    Float,
    Pk,
    Integer,
    Time,
    Custom(String),
}

impl PropertyType {
    /// The wire-level tag name, used in error messages.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Binary => "binary",
            Self::File => "file",
            Self::Image => "image",
            Self::Password => "password",
            Self::Serialized => "serialized",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Email => "email",
            Self::RichContent => "richcontent",
            Self::String => "string",
            Self::Text => "text",
            Self::Website => "website",
            Self::Wysiwyg => "wysiwyg",
            Self::Float => "float",
            Self::Pk => "pk",
            Self::Integer => "integer",
            Self::Time => "time",
            Self::Custom(tag) => tag,
        }
    }
}

/// The three field kinds a model can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar value with a primitive type tag
    Property(PropertyType),
    /// To-one reference to another model, indexed as a nested object
    Relation { model: String },
    /// To-many reference to another model, indexed as a list of strings
    Collection { model: String },
}

/// One field of a model's schema.
#[derive(Debug, Clone)]
pub struct ModelField {
    /// Field name as it appears in the index document
    pub name: String,
    /// Field kind (scalar, to-one, to-many)
    pub kind: FieldKind,
    /// Whether the field is excluded from the index entirely
    pub omit: bool,
}

/// A named record type with an ordered field schema.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    localized: bool,
    fields: Vec<ModelField>,
    options: HashMap<String, String>,
}

impl Model {
    /// Create a new model definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            localized: false,
            fields: Vec::new(),
            options: HashMap::new(),
        }
    }

    /// Mark the model as localized (entries exist per locale)
    #[must_use]
    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    /// Set an option on the model's option bag
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add a scalar property field
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        self.fields.push(ModelField {
            name: name.into(),
            kind: FieldKind::Property(property_type),
            omit: false,
        });
        self
    }

    /// Add a to-one relation field referencing another model
    #[must_use]
    pub fn relation(mut self, name: impl Into<String>, model: impl Into<String>) -> Self {
        self.fields.push(ModelField {
            name: name.into(),
            kind: FieldKind::Relation {
                model: model.into(),
            },
            omit: false,
        });
        self
    }

    /// Add a to-many collection field referencing another model
    #[must_use]
    pub fn collection(mut self, name: impl Into<String>, model: impl Into<String>) -> Self {
        self.fields.push(ModelField {
            name: name.into(),
            kind: FieldKind::Collection {
                model: model.into(),
            },
            omit: false,
        });
        self
    }

    /// Flag the named field as omitted from the index
    #[must_use]
    pub fn omitted(mut self, name: &str) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.omit = true;
        }
        self
    }

    /// Model name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether entries of this model exist in locale-specific variants
    #[must_use]
    pub fn is_localized(&self) -> bool {
        self.localized
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[ModelField] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up an option by key
    #[must_use]
    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}
