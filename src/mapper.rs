// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema mapper.
//!
//! Translates model field schemas into search-engine mapping documents and
//! pushes them to the engine. Each enabled model contributes one type
//! mapping; models sharing an index name land in the same index under
//! different type names.
//!
//! Index creation is idempotent: the mapper first tries to create the index
//! with all collected type mappings in one request, and when the index is
//! already there it falls back to updating each type's mapping individually.
//!
//! # Field mapping rules
//!
//! ```text
//! property binary/file/image/password/serialized   omitted
//! property boolean                                 boolean
//! property date/datetime                           date
//! property email/richcontent/string/text/
//!          website/wysiwyg                         string
//! property float                                   float
//! property pk/integer/time                         long
//! property anything else                           fatal configuration error
//! collection (to-many)                             string
//! relation (to-one)                                object of the related
//!                                                  model's scalar properties
//! ```
//!
//! Relation nesting is one level deep: the related model's own relation and
//! collection fields are not expanded.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::{IndexMappings, SearchClient, SearchClientError};
use crate::error::SyncError;
use crate::model::{FieldKind, Model, ModelField, ModelRegistry, PropertyType};
use crate::resolver::IndexParameterResolver;

/// Translates model definitions into index mappings and applies them.
pub struct SchemaMapper {
    registry: Arc<dyn ModelRegistry>,
    resolver: Arc<IndexParameterResolver>,
    client: Arc<dyn SearchClient>,
}

impl SchemaMapper {
    pub fn new(
        registry: Arc<dyn ModelRegistry>,
        resolver: Arc<IndexParameterResolver>,
        client: Arc<dyn SearchClient>,
    ) -> Self {
        Self {
            registry,
            resolver,
            client,
        }
    }

    /// Define the indices for all registered models.
    ///
    /// New indices are created, existing ones have their type mappings
    /// updated. Safe to call repeatedly.
    #[tracing::instrument(skip(self))]
    pub async fn define_indices(&self) -> Result<(), SyncError> {
        let definitions = self.build_index_definitions()?;

        for (index, types) in definitions {
            match self.client.create_index(&index, &types).await {
                Ok(()) => {
                    info!(index = %index, types = types.len(), "Created index");
                }
                Err(SearchClientError::IndexExists(_)) => {
                    for (doc_type, mapping) in &types {
                        self.client.put_mapping(&index, doc_type, mapping).await?;
                        debug!(index = %index, doc_type = %doc_type, "Updated mapping");
                    }
                    info!(index = %index, types = types.len(), "Updated mappings on existing index");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Build the mapping documents for all enabled models, grouped by index
    /// name and keyed by type name.
    ///
    /// Recomputed on every call; nothing is cached here.
    pub fn build_index_definitions(&self) -> Result<BTreeMap<String, IndexMappings>, SyncError> {
        let mut definitions: BTreeMap<String, IndexMappings> = BTreeMap::new();

        for model in self.registry.models() {
            let Some(target) = self.resolver.resolve(&model)? else {
                continue;
            };

            let mapping = self.model_mapping(&model)?;
            definitions
                .entry(target.index)
                .or_default()
                .insert(target.doc_type, mapping);
        }

        Ok(definitions)
    }

    /// The type mapping of one model: `_source` plus a properties object.
    fn model_mapping(&self, model: &Model) -> Result<Value, SyncError> {
        let mut properties = self.fields_mapping(model)?;

        if model.is_localized() {
            properties.insert(
                "locale".to_string(),
                json!({
                    "type": "string",
                    "index": "not_analyzed",
                }),
            );
        }

        // Structural heuristic: a latitude/longitude pair in the mapped
        // properties gets a derived geo_point field
        if properties.contains_key("latitude") && properties.contains_key("longitude") {
            properties.insert("geo".to_string(), json!({"type": "geo_point"}));
        }

        Ok(json!({
            "_source": {
                "enabled": true,
            },
            "properties": properties,
        }))
    }

    fn fields_mapping(&self, model: &Model) -> Result<Map<String, Value>, SyncError> {
        let mut mapping = Map::new();

        for field in model.fields() {
            if field.omit {
                continue;
            }

            if let Some(field_mapping) = self.field_mapping(model, field)? {
                mapping.insert(field.name.clone(), field_mapping);
            }
        }

        Ok(mapping)
    }

    /// The mapping of one field, or `None` for non-indexable properties.
    fn field_mapping(&self, model: &Model, field: &ModelField) -> Result<Option<Value>, SyncError> {
        match &field.kind {
            FieldKind::Property(property_type) => {
                property_mapping(model.name(), &field.name, property_type)
            }
            FieldKind::Collection { .. } => Ok(Some(json!({"type": "string"}))),
            FieldKind::Relation { model: related } => {
                let related_model =
                    self.registry
                        .model(related)
                        .ok_or_else(|| SyncError::UnknownModel {
                            name: related.clone(),
                            model: model.name().to_string(),
                            field: field.name.clone(),
                        })?;

                Ok(Some(json!({
                    "type": "object",
                    "properties": self.object_mapping(&related_model)?,
                })))
            }
        }
    }

    /// The scalar-only mapping of a related model. Relation and collection
    /// fields of the related model are not expanded.
    fn object_mapping(&self, model: &Model) -> Result<Map<String, Value>, SyncError> {
        let mut mapping = Map::new();

        for field in model.fields() {
            let FieldKind::Property(ref property_type) = field.kind else {
                continue;
            };

            if let Some(property) = property_mapping(model.name(), &field.name, property_type)? {
                mapping.insert(field.name.clone(), property);
            }
        }

        Ok(mapping)
    }
}

/// The type spec of one scalar property, or `None` for non-indexable tags.
fn property_mapping(
    model: &str,
    field: &str,
    property_type: &PropertyType,
) -> Result<Option<Value>, SyncError> {
    match property_type {
        PropertyType::Binary
        | PropertyType::File
        | PropertyType::Image
        | PropertyType::Password
        | PropertyType::Serialized => Ok(None),
        PropertyType::Boolean => Ok(Some(json!({"type": "boolean"}))),
        PropertyType::Date | PropertyType::DateTime => Ok(Some(json!({"type": "date"}))),
        PropertyType::Email
        | PropertyType::RichContent
        | PropertyType::String
        | PropertyType::Text
        | PropertyType::Website
        | PropertyType::Wysiwyg => Ok(Some(json!({"type": "string"}))),
        PropertyType::Float => Ok(Some(json!({"type": "float"}))),
        PropertyType::Pk | PropertyType::Integer | PropertyType::Time => {
            Ok(Some(json!({"type": "long"})))
        }
        PropertyType::Custom(tag) => Err(SyncError::UnmappedFieldType {
            model: model.to_string(),
            field: field.to_string(),
            tag: tag.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemorySearchClient;
    use crate::model::InMemoryModelRegistry;

    fn mapper_for(models: Vec<Model>) -> (SchemaMapper, Arc<InMemorySearchClient>) {
        let mut registry = InMemoryModelRegistry::new("en");
        for model in models {
            registry.register(model);
        }
        let client = Arc::new(InMemorySearchClient::new());
        let mapper = SchemaMapper::new(
            Arc::new(registry),
            Arc::new(IndexParameterResolver::new("elastic.index")),
            client.clone() as Arc<dyn SearchClient>,
        );
        (mapper, client)
    }

    fn article_model() -> Model {
        Model::new("Article")
            .option("elastic.index", "content/article")
            .property("id", PropertyType::Pk)
            .property("title", PropertyType::String)
            .property("published", PropertyType::Boolean)
            .property("created", PropertyType::DateTime)
            .property("rating", PropertyType::Float)
            .property("attachment", PropertyType::File)
    }

    #[test]
    fn test_property_mapping_table() {
        let cases = [
            (PropertyType::Boolean, "boolean"),
            (PropertyType::Date, "date"),
            (PropertyType::DateTime, "date"),
            (PropertyType::Email, "string"),
            (PropertyType::RichContent, "string"),
            (PropertyType::String, "string"),
            (PropertyType::Text, "string"),
            (PropertyType::Website, "string"),
            (PropertyType::Wysiwyg, "string"),
            (PropertyType::Float, "float"),
            (PropertyType::Pk, "long"),
            (PropertyType::Integer, "long"),
            (PropertyType::Time, "long"),
        ];

        for (property_type, expected) in cases {
            let mapping = property_mapping("M", "f", &property_type)
                .unwrap()
                .unwrap();
            assert_eq!(mapping["type"], expected, "tag {}", property_type.tag());
        }
    }

    #[test]
    fn test_non_indexable_tags_are_omitted() {
        for property_type in [
            PropertyType::Binary,
            PropertyType::File,
            PropertyType::Image,
            PropertyType::Password,
            PropertyType::Serialized,
        ] {
            assert!(property_mapping("M", "f", &property_type).unwrap().is_none());
        }
    }

    #[test]
    fn test_unmapped_tag_is_fatal_and_names_field_and_model() {
        let err = property_mapping("Article", "shape", &PropertyType::Custom("geojson".into()))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Article"));
        assert!(message.contains("shape"));
        assert!(message.contains("geojson"));
    }

    #[test]
    fn test_disabled_model_contributes_nothing() {
        let (mapper, _) = mapper_for(vec![Model::new("Hidden").property(
            "title",
            PropertyType::String,
        )]);
        assert!(mapper.build_index_definitions().unwrap().is_empty());
    }

    #[test]
    fn test_type_mapping_shape() {
        let (mapper, _) = mapper_for(vec![article_model()]);
        let definitions = mapper.build_index_definitions().unwrap();

        let mapping = &definitions["content"]["article"];
        assert_eq!(mapping["_source"]["enabled"], true);

        let properties = mapping["properties"].as_object().unwrap();
        assert_eq!(properties["id"]["type"], "long");
        assert_eq!(properties["title"]["type"], "string");
        assert_eq!(properties["published"]["type"], "boolean");
        assert_eq!(properties["created"]["type"], "date");
        assert_eq!(properties["rating"]["type"], "float");
        assert!(!properties.contains_key("attachment"));
    }

    #[test]
    fn test_omitted_field_is_skipped() {
        let (mapper, _) = mapper_for(vec![article_model().omitted("title")]);
        let definitions = mapper.build_index_definitions().unwrap();
        let properties = definitions["content"]["article"]["properties"]
            .as_object()
            .unwrap()
            .clone();
        assert!(!properties.contains_key("title"));
    }

    #[test]
    fn test_localized_model_gets_locale_field() {
        let (mapper, _) = mapper_for(vec![article_model().localized()]);
        let definitions = mapper.build_index_definitions().unwrap();
        let locale = &definitions["content"]["article"]["properties"]["locale"];
        assert_eq!(locale["type"], "string");
        assert_eq!(locale["index"], "not_analyzed");
    }

    #[test]
    fn test_latitude_longitude_pair_derives_geo_point() {
        let model = Model::new("Place")
            .option("elastic.index", "content/place")
            .property("latitude", PropertyType::Float)
            .property("longitude", PropertyType::Float);
        let (mapper, _) = mapper_for(vec![model]);

        let definitions = mapper.build_index_definitions().unwrap();
        let geo = &definitions["content"]["place"]["properties"]["geo"];
        assert_eq!(geo["type"], "geo_point");
    }

    #[test]
    fn test_latitude_alone_derives_no_geo() {
        let model = Model::new("Place")
            .option("elastic.index", "content/place")
            .property("latitude", PropertyType::Float);
        let (mapper, _) = mapper_for(vec![model]);

        let definitions = mapper.build_index_definitions().unwrap();
        let properties = definitions["content"]["place"]["properties"]
            .as_object()
            .unwrap()
            .clone();
        assert!(!properties.contains_key("geo"));
    }

    #[test]
    fn test_relation_nests_scalar_properties_only() {
        let author = Model::new("Author")
            .property("id", PropertyType::Pk)
            .property("name", PropertyType::String)
            .property("avatar", PropertyType::Image)
            .relation("employer", "Company")
            .collection("articles", "Article");
        let article = article_model().relation("author", "Author");
        let (mapper, _) = mapper_for(vec![article, author]);

        let definitions = mapper.build_index_definitions().unwrap();
        let author_mapping = &definitions["content"]["article"]["properties"]["author"];
        assert_eq!(author_mapping["type"], "object");

        let nested = author_mapping["properties"].as_object().unwrap();
        assert_eq!(nested["id"]["type"], "long");
        assert_eq!(nested["name"]["type"], "string");
        assert!(!nested.contains_key("avatar"));
        // One level of nesting only
        assert!(!nested.contains_key("employer"));
        assert!(!nested.contains_key("articles"));
    }

    #[test]
    fn test_relation_to_unknown_model_is_an_error() {
        let (mapper, _) = mapper_for(vec![article_model().relation("author", "Missing")]);
        let err = mapper.build_index_definitions().unwrap_err();
        assert!(matches!(err, SyncError::UnknownModel { .. }));
    }

    #[test]
    fn test_collection_maps_to_string() {
        let (mapper, _) = mapper_for(vec![article_model().collection("tags", "Tag")]);
        let definitions = mapper.build_index_definitions().unwrap();
        let tags = &definitions["content"]["article"]["properties"]["tags"];
        assert_eq!(tags["type"], "string");
    }

    #[test]
    fn test_models_share_an_index_under_different_types() {
        let page = Model::new("Page")
            .option("elastic.index", "content/page")
            .property("title", PropertyType::String);
        let (mapper, _) = mapper_for(vec![article_model(), page]);

        let definitions = mapper.build_index_definitions().unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions["content"].len(), 2);
        assert!(definitions["content"].contains_key("article"));
        assert!(definitions["content"].contains_key("page"));
    }

    #[tokio::test]
    async fn test_define_indices_creates_then_updates() {
        let (mapper, client) = mapper_for(vec![article_model()]);

        mapper.define_indices().await.unwrap();
        assert!(client.has_index("content"));
        assert!(client.mapping("content", "article").is_some());

        // Second run falls back to per-type mapping updates
        mapper.define_indices().await.unwrap();
        assert!(client.mapping("content", "article").is_some());
    }
}
