//! The REST facade exposing a SOAP binding (`server/models/soap-<binding>.*`).

use serde_json::{Map, Value, json};

use crate::domain::entities::common::{RelativePath, paths};
use crate::domain::naming;

/// One remote method, forwarding to a SOAP operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMethod {
    pub operation: String,
    pub soap_action: Option<String>,
    /// Request model name; `None` for operations without input.
    pub request: Option<String>,
    /// Response model name; `None` for one-way operations.
    pub response: Option<String>,
}

impl RemoteMethod {
    /// `POST /<Operation>` taking the request model as body.
    pub fn to_json(&self) -> Value {
        let accepts: Vec<Value> = self
            .request
            .iter()
            .map(|model| {
                json!({
                    "arg": model,
                    "type": model,
                    "required": true,
                    "http": { "source": "body" }
                })
            })
            .collect();
        let returns: Vec<Value> = self
            .response
            .iter()
            .map(|model| json!({ "arg": "result", "type": model, "root": true }))
            .collect();

        json!({
            "accepts": accepts,
            "returns": returns,
            "http": { "verb": "post", "path": format!("/{}", self.operation) }
        })
    }
}

/// API model generated for one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiModel {
    /// Model name, e.g. `SoapStockQuoteSoap`.
    pub name: String,
    /// File stem, e.g. `soap-stock-quote-soap`.
    pub file_stem: String,
    pub service: String,
    pub binding: String,
    pub methods: Vec<RemoteMethod>,
}

impl ApiModel {
    pub fn for_binding(service: &str, binding: &str, methods: Vec<RemoteMethod>) -> Self {
        Self {
            name: format!("Soap{}", naming::to_pascal_case(binding)),
            file_stem: format!("soap-{}", naming::slugify(binding)),
            service: service.to_string(),
            binding: binding.to_string(),
            methods,
        }
    }

    pub fn json_path(&self) -> RelativePath {
        RelativePath::new(format!("{}/{}.json", paths::SERVER_MODELS, self.file_stem))
    }

    pub fn js_path(&self) -> RelativePath {
        RelativePath::new(format!("{}/{}.js", paths::SERVER_MODELS, self.file_stem))
    }

    pub fn to_json(&self) -> Value {
        let methods: Map<String, Value> = self
            .methods
            .iter()
            .map(|m| (m.operation.clone(), m.to_json()))
            .collect();

        json!({
            "name": self.name,
            "base": "Model",
            "options": { "validateUpsert": true },
            "properties": {},
            "validations": [],
            "relations": {},
            "acls": [],
            "methods": methods
        })
    }

    /// Model script forwarding each remote method to the SOAP connector.
    ///
    /// Names taken from the WSDL or the command line appear only as
    /// JSON-quoted string literals.
    pub fn to_js(&self, data_source: &str) -> String {
        let model = &self.name;
        let data_source_lit = js_string(data_source);
        let service_lit = js_string(&self.service);
        let not_connected = js_string(&format!("SOAP data source {data_source} is not connected"));

        let mut lines = vec![
            "'use strict';".to_string(),
            String::new(),
            format!("module.exports = function({model}) {{"),
            "  var service;".to_string(),
            String::new(),
            format!("  {model}.on('attached', function(app) {{"),
            format!("    var soapDataSource = app.dataSources[{data_source_lit}];"),
            "    soapDataSource.once('connected', function() {".to_string(),
            format!("      service = soapDataSource.createModel({service_lit}, {{}});"),
            "    });".to_string(),
            "  });".to_string(),
            String::new(),
            "  function invoke(operation, request, callback) {".to_string(),
            "    if (!service) {".to_string(),
            format!("      return callback(new Error({not_connected}));"),
            "    }".to_string(),
            "    service[operation](request || {}, callback);".to_string(),
            "  }".to_string(),
        ];

        for method in &self.methods {
            let op = js_string(&method.operation);
            lines.push(String::new());
            if let Some(action) = &method.soap_action {
                lines.push(format!("  // SOAPAction: {}", single_line(action)));
            }
            if method.request.is_some() {
                lines.push(format!("  {model}[{op}] = function(request, callback) {{"));
                lines.push(format!("    invoke({op}, request, callback);"));
            } else {
                lines.push(format!("  {model}[{op}] = function(callback) {{"));
                lines.push(format!("    invoke({op}, null, callback);"));
            }
            lines.push("  };".to_string());
        }

        lines.push("};".to_string());
        let mut js = lines.join("\n");
        js.push('\n');
        js
    }
}

/// A JavaScript string literal for `value`.
fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() || c == '\u{2028}' || c == '\u{2029}' { ' ' } else { c })
        .collect()
}
