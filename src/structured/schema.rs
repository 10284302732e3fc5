//! Schema generation utilities.
//!
//! Emits the OpenAPI-subset dialect the generation service accepts as a
//! `responseSchema`: upper-case type names, no `additionalProperties`.

use serde_json::json;

/// Builder for object schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    properties: Vec<(String, serde_json::Value)>,
    required: Vec<String>,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Add a property and mark it required in one step.
    pub fn require(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, schema));
        self
    }

    pub fn build(self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!("OBJECT"));

        let mut properties = serde_json::Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        map.insert("properties".into(), properties.into());

        if !self.required.is_empty() {
            map.insert("required".into(), self.required.into());
        }

        map.into()
    }
}

pub fn schema_from_type_name(type_name: &str) -> serde_json::Value {
    match type_name {
        "string" => json!({"type": "STRING"}),
        "integer" => json!({"type": "INTEGER"}),
        "number" => json!({"type": "NUMBER"}),
        "boolean" => json!({"type": "BOOLEAN"}),
        "array" => json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        _ => json!({"type": "OBJECT"}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generator_basic() {
        let schema = SchemaGenerator::new()
            .add_property("name", schema_from_type_name("string"))
            .add_property("distance", schema_from_type_name("number"))
            .build();

        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["name"]["type"], "STRING");
        assert_eq!(schema["properties"]["distance"]["type"], "NUMBER");
        assert!(schema.get("required").is_none());
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_require_records_order() {
        let schema = SchemaGenerator::new()
            .require("isValid", schema_from_type_name("boolean"))
            .require("reason", schema_from_type_name("string"))
            .build();
        assert_eq!(schema["required"], json!(["isValid", "reason"]));
    }

    #[test]
    fn test_array_defaults_to_string_items() {
        assert_eq!(schema_from_type_name("array")["items"]["type"], "STRING");
        assert_eq!(schema_from_type_name("unknown")["type"], "OBJECT");
    }
}
