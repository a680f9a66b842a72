//! LoopBack model schema documents (`common/models/<slug>.json`).

use serde_json::{Map, Value, json};

use crate::domain::entities::common::{RelativePath, paths};
use crate::domain::entities::ordered_map::OrderedMap;
use crate::domain::naming;

/// JSON type of a model property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    /// Another generated model, referenced by name.
    Model(String),
    Array(Box<PropertyType>),
}

impl PropertyType {
    pub fn array_of(item: PropertyType) -> Self {
        Self::Array(Box::new(item))
    }

    /// `"string"`, `"Globals"`, `["number"]`, ...
    pub fn to_json(&self) -> Value {
        match self {
            Self::String => Value::from("string"),
            Self::Number => Value::from("number"),
            Self::Boolean => Value::from("boolean"),
            Self::Model(name) => Value::from(name.as_str()),
            Self::Array(item) => Value::Array(vec![item.to_json()]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub property_type: PropertyType,
    pub required: bool,
}

impl PropertyDefinition {
    pub fn new(property_type: PropertyType, required: bool) -> Self {
        Self {
            property_type,
            required,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), self.property_type.to_json());
        if self.required {
            obj.insert("required".into(), Value::Bool(true));
        }
        Value::Object(obj)
    }
}

/// A schema-only model derived from a WSDL message or XSD type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub name: String,
    pub properties: OrderedMap<PropertyDefinition>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: OrderedMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, property: PropertyDefinition) -> Self {
        self.properties.insert(name, property);
        self
    }

    pub fn slug(&self) -> String {
        naming::slugify(&self.name)
    }

    /// `common/models/<slug>.json`
    pub fn file_path(&self) -> RelativePath {
        RelativePath::new(format!("{}/{}.json", paths::COMMON_MODELS, self.slug()))
    }

    /// The model is registered separately, so the document carries no
    /// `public` flag.
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(k, p)| (k.to_string(), p.to_json()))
            .collect();

        json!({
            "name": self.name,
            "base": "Model",
            "idInjection": false,
            "excludeBaseProperties": ["id"],
            "options": { "validateUpsert": true },
            "properties": properties,
            "validations": [],
            "relations": {},
            "acls": [],
            "methods": {}
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_shape() {
        let model = ModelDefinition::new("GetQuote")
            .with_property("symbol", PropertyDefinition::new(PropertyType::String, false))
            .with_property(
                "globals",
                PropertyDefinition::new(PropertyType::Model("Globals".into()), true),
            );

        let doc = model.to_json();
        assert!(doc.get("public").is_none());
        assert_eq!(doc["base"], "Model");
        assert_eq!(doc["excludeBaseProperties"], json!(["id"]));
        assert_eq!(doc["properties"]["symbol"], json!({ "type": "string" }));
        assert_eq!(
            doc["properties"]["globals"],
            json!({ "type": "Globals", "required": true })
        );
        assert_eq!(
            model.file_path().as_str(),
            "common/models/get-quote.json"
        );
    }

    #[test]
    fn arrays_wrap_item_type() {
        assert_eq!(
            PropertyType::array_of(PropertyType::String).to_json(),
            json!(["string"])
        );
    }
}
