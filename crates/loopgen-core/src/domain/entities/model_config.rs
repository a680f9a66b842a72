//! `server/model-config.json` registration entries.

use serde_json::{Map, Value};

use super::common::paths;
use super::ordered_map::OrderedMap;
use crate::domain::error::DomainError;

/// How a model is attached to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistration {
    /// `None` serializes as `null`: the model is not persisted anywhere.
    pub data_source: Option<String>,
    /// Whether the model is exposed over REST.
    pub public: bool,
}

impl ModelRegistration {
    pub fn new(data_source: Option<String>, public: bool) -> Self {
        Self {
            data_source,
            public,
        }
    }

    /// Schema-only model exposed publicly, as SOAP request/response models are.
    pub fn detached_public() -> Self {
        Self::new(None, true)
    }

    fn apply_to(&self, obj: &mut Map<String, Value>) {
        obj.insert(
            "dataSource".into(),
            self.data_source
                .clone()
                .map_or(Value::Null, Value::String),
        );
        obj.insert("public".into(), Value::Bool(self.public));
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        self.apply_to(&mut obj);
        Value::Object(obj)
    }
}

/// Parsed `server/model-config.json`.
///
/// Entries other than the ones being registered, including `_meta`, are
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfigDocument {
    entries: OrderedMap<Value>,
}

impl ModelConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let Value::Object(root) = value else {
            return Err(DomainError::InvalidDocument {
                document: paths::MODEL_CONFIG.into(),
                reason: "top-level value must be an object".into(),
            });
        };
        Ok(Self {
            entries: root.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    /// Registered model names, excluding `_meta`.
    pub fn model_names(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter(|k| !k.starts_with('_'))
            .map(str::to_string)
            .collect()
    }

    pub fn registration(&self, model: &str) -> Option<ModelRegistration> {
        let obj = self.entries.get(model)?.as_object()?;
        Some(ModelRegistration {
            data_source: obj
                .get("dataSource")
                .and_then(Value::as_str)
                .map(str::to_string),
            public: obj.get("public").and_then(Value::as_bool).unwrap_or(true),
        })
    }

    /// Return a new document with `model` registered.
    ///
    /// An existing entry keeps its position and any extra fields; only
    /// `dataSource` and `public` are overwritten.
    pub fn with_registration(&self, model: &str, registration: &ModelRegistration) -> Self {
        let mut next = self.clone();
        match next.entries.get_mut(model) {
            Some(Value::Object(obj)) => registration.apply_to(obj),
            Some(other) => *other = registration.to_json(),
            None => {
                next.entries.insert(model, registration.to_json());
            }
        }
        next
    }
}
