//! `server/datasources.json` editing.

use serde_json::{Map, Value};

use super::common::paths;
use super::ordered_map::OrderedMap;
use crate::domain::error::DomainError;

/// Connector name of the LoopBack SOAP connector.
pub const SOAP_CONNECTOR: &str = "soap";

/// One data source entry: `{"name", "connector", ...options}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceDefinition {
    pub name: String,
    pub connector: String,
    /// Connector-specific settings, kept in declaration order.
    pub options: OrderedMap<Value>,
}

impl DataSourceDefinition {
    pub fn new(name: impl Into<String>, connector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connector: connector.into(),
            options: OrderedMap::new(),
        }
    }

    /// SOAP data source pointing at a service endpoint.
    ///
    /// `wsdl` defaults to the connector's own `url?wsdl` convention when absent.
    pub fn soap(
        name: impl Into<String>,
        url: impl Into<String>,
        wsdl: Option<String>,
        remoting_enabled: bool,
    ) -> Self {
        let mut def = Self::new(name, SOAP_CONNECTOR)
            .with_option("url", Value::String(url.into()));
        if let Some(wsdl) = wsdl {
            def = def.with_option("wsdl", Value::String(wsdl));
        }
        def.with_option("remotingEnabled", Value::Bool(remoting_enabled))
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key, value);
        self
    }

    pub fn is_soap(&self) -> bool {
        self.connector == SOAP_CONNECTOR
    }

    /// Location of the WSDL document for a SOAP data source.
    pub fn wsdl_location(&self) -> Option<String> {
        if let Some(Value::String(wsdl)) = self.options.get("wsdl") {
            return Some(wsdl.clone());
        }
        match self.options.get("url") {
            Some(Value::String(url)) => Some(format!("{url}?wsdl")),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "data source name",
            });
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(invalid(format!(
                "data source name '{}' cannot contain whitespace",
                self.name
            )));
        }
        if self.connector.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "connector" });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".into(), Value::String(self.name.clone()));
        obj.insert("connector".into(), Value::String(self.connector.clone()));
        for (k, v) in self.options.iter() {
            obj.insert(k.to_string(), v.clone());
        }
        Value::Object(obj)
    }

    fn from_entry(key: &str, value: &Value) -> Result<Self, DomainError> {
        let Value::Object(obj) = value else {
            return Err(invalid(format!("data source '{key}' must be an object")));
        };

        let connector = obj
            .get("connector")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let options = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "name" && k.as_str() != "connector")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            name: key.to_string(),
            connector,
            options,
        })
    }
}

/// Parsed `server/datasources.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSourcesDocument {
    sources: OrderedMap<Value>,
}

impl DataSourcesDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let Value::Object(root) = value else {
            return Err(invalid("top-level value must be an object"));
        };
        for (key, entry) in root {
            if !entry.is_object() {
                return Err(invalid(format!("data source '{key}' must be an object")));
            }
        }
        Ok(Self {
            sources: root.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.sources
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    pub fn names(&self) -> Vec<String> {
        self.sources.keys().map(str::to_string).collect()
    }

    pub fn get(&self, name: &str) -> Result<DataSourceDefinition, DomainError> {
        let entry = self.sources.get(name).ok_or_else(|| DomainError::NotFound {
            kind: "data source",
            name: name.to_string(),
            available: self.names(),
        })?;
        DataSourceDefinition::from_entry(name, entry)
    }

    pub fn definitions(&self) -> Result<Vec<DataSourceDefinition>, DomainError> {
        self.sources
            .iter()
            .map(|(k, v)| DataSourceDefinition::from_entry(k, v))
            .collect()
    }

    /// Return a new document with `definition` appended.
    pub fn with_datasource(&self, definition: DataSourceDefinition) -> Result<Self, DomainError> {
        definition.validate()?;
        if self.sources.contains_key(&definition.name) {
            return Err(DomainError::DuplicateDataSource {
                name: definition.name,
            });
        }

        let mut next = self.clone();
        next.sources
            .insert(definition.name.clone(), definition.to_json());
        Ok(next)
    }
}

fn invalid(reason: impl Into<String>) -> DomainError {
    DomainError::InvalidDocument {
        document: paths::DATASOURCES.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DataSourcesDocument {
        DataSourcesDocument::from_json(&json!({
            "db": { "name": "db", "connector": "memory" }
        }))
        .unwrap()
    }

    #[test]
    fn appends_new_datasource_after_existing() {
        let doc = sample()
            .with_datasource(DataSourceDefinition::soap(
                "quotes",
                "http://www.webservicex.net/stockquote.asmx",
                None,
                true,
            ))
            .unwrap();

        assert_eq!(doc.names(), ["db", "quotes"]);
        assert_eq!(
            doc.to_json()["quotes"],
            json!({
                "name": "quotes",
                "connector": "soap",
                "url": "http://www.webservicex.net/stockquote.asmx",
                "remotingEnabled": true
            })
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = sample()
            .with_datasource(DataSourceDefinition::new("db", "mysql"))
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateDataSource { name: "db".into() });
    }

    #[test]
    fn wsdl_location_prefers_explicit_wsdl() {
        let explicit = DataSourceDefinition::soap(
            "a",
            "http://host/svc",
            Some("./calc.wsdl".into()),
            false,
        );
        assert_eq!(explicit.wsdl_location().as_deref(), Some("./calc.wsdl"));

        let derived = DataSourceDefinition::soap("b", "http://host/svc", None, false);
        assert_eq!(
            derived.wsdl_location().as_deref(),
            Some("http://host/svc?wsdl")
        );
    }

    #[test]
    fn get_reports_known_names() {
        let err = sample().get("missing").unwrap_err();
        match err {
            DomainError::NotFound { available, .. } => assert_eq!(available, ["db"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_connector_is_rejected() {
        let err = sample()
            .with_datasource(DataSourceDefinition::new("x", " "))
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingRequiredField { .. }));
    }
}
