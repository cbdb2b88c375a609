//! Schema module: defines the field/type registry of a record type.
//!
//! This module provides the FilterSchema type and builder. Wire field names are
//! lower-camel while schema names are upper-camel, so every lookup through
//! [`FilterSchema::resolve`] upper-cases the first character before matching.

use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct FilterSchema {
    fields: HashMap<String, FieldType>,
}

impl FilterSchema {
    /// Exact lookup, no name normalization.
    pub fn get_field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    /// Resolves a wire field name to the canonical schema name and its type.
    pub fn resolve(&self, wire_name: &str) -> Option<(&str, &FieldType)> {
        let normalized = normalize_field_name(wire_name);
        self.fields
            .get_key_value(normalized.as_ref())
            .map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn fields(&self) -> &HashMap<String, FieldType> {
        &self.fields
    }

    /// Get the total number of fields.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }
}

/// Upper-cases the first character of a wire field name.
pub fn normalize_field_name(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            let mut normalized: String = first.to_uppercase().collect();
            normalized.push_str(chars.as_str());
            Cow::Owned(normalized)
        }
        _ => Cow::Borrowed(name),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterSchemaBuilder {
    fields: HashMap<String, FieldType>,
}

impl FilterSchemaBuilder {
    pub fn new() -> Self {
        Self { fields: HashMap::new() }
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    pub fn build(self) -> FilterSchema {
        FilterSchema { fields: self.fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use serde_json;

    #[test]
    fn test_field_registration_and_retrieval() {
        let schema = FilterSchemaBuilder::new()
            .field("Age", FieldType::Int)
            .field("Name", FieldType::String)
            .build();
        assert_eq!(schema.get_field_type("Age"), Some(&FieldType::Int));
        assert_eq!(schema.get_field_type("Name"), Some(&FieldType::String));
        assert_eq!(schema.get_field_type("Missing"), None);
        assert_eq!(schema.num_fields(), 2);
    }

    #[test]
    fn test_resolve_normalizes_first_character() {
        let schema = FilterSchemaBuilder::new()
            .field("CreatedAt", FieldType::DateTime)
            .build();
        assert_eq!(schema.resolve("createdAt"), Some(("CreatedAt", &FieldType::DateTime)));
        assert_eq!(schema.resolve("CreatedAt"), Some(("CreatedAt", &FieldType::DateTime)));
        // only the first character is normalized
        assert_eq!(schema.resolve("createdat"), None);
        assert_eq!(schema.resolve(""), None);
    }

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name("name"), "Name");
        assert_eq!(normalize_field_name("Name"), "Name");
        assert_eq!(normalize_field_name("été"), "Été");
        assert!(matches!(normalize_field_name("Name"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_schema_serialization_deserialization() {
        let schema = FilterSchemaBuilder::new()
            .field("Age", FieldType::optional(FieldType::Int))
            .field("Id", FieldType::Other("Guid".into()))
            .build();
        let json = serde_json::to_string(&schema).unwrap();
        let deserialized: FilterSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, deserialized);
    }

    #[test]
    fn test_schema_from_json_config() {
        let schema: FilterSchema = serde_json::from_str(
            r#"{"fields": {"Name": "String", "Score": {"Optional": "Float"}}}"#,
        )
        .unwrap();
        assert_eq!(schema.resolve("score"), Some(("Score", &FieldType::optional(FieldType::Float))));
    }

    #[test]
    fn test_schema_builder_overwrite_field() {
        let schema = FilterSchemaBuilder::new()
            .field("Age", FieldType::Int)
            .field("Age", FieldType::Float)
            .build();
        // Last one wins
        assert_eq!(schema.get_field_type("Age"), Some(&FieldType::Float));
    }
}
