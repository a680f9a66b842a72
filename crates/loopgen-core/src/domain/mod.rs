//! Core domain layer for loopgen.
//!
//! Pure document transforms and generators with no I/O. Reading and writing
//! files, fetching WSDL documents and loading templates are handled through
//! ports defined in the application layer.
//!
//! - **No async**: every transform is synchronous
//! - **No I/O**: parse, transform, serialize
//! - **Immutable edits**: `with_*` methods return a new document

pub mod entities;
pub mod error;
pub mod naming;
pub mod soap;
pub mod wsdl;

mod validation;

pub use entities::{
    app::{AppBlueprint, AppName, AppTarget, AppTemplateKind, LoopbackVersion},
    common::{RelativePath, paths},
    datasource::{DataSourceDefinition, DataSourcesDocument, SOAP_CONNECTOR},
    middleware::{
        MiddlewareConfig, MiddlewareDocument, MiddlewareInsertion, PhaseAnchor, SubPhase,
    },
    model_config::{ModelConfigDocument, ModelRegistration},
    ordered_map::OrderedMap,
    project_structure::{
        DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure, pretty_json,
    },
    template::{
        DirectorySpec, FileSpec, RenderContext, TargetMatcher, TargetMatcherBuilder, Template,
        TemplateBuilder, TemplateContent, TemplateId, TemplateMetadata, TemplateNode,
        TemplateSource, TemplateTree,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use soap::{ApiModel, ModelDefinition, PropertyType, SoapApi, SoapMapper};
pub use validation::DomainValidator;
pub use wsdl::{QName, WsdlDefinition};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const MIDDLEWARE_JSON: &str = r#"{
  "initial:before": {
    "loopback#favicon": {}
  },
  "initial": {
    "compression": {},
    "cors": {
      "params": {
        "origin": true,
        "credentials": true,
        "maxAge": 86400
      }
    }
  },
  "session": {},
  "auth": {},
  "parse": {},
  "routes": {
    "loopback#rest": {
      "paths": [
        "${restApiRoot}"
      ]
    }
  },
  "files": {},
  "final": {
    "loopback#urlNotFound": {}
  },
  "final:after": {
    "strong-error-handler": {}
  }
}
"#;

    #[test]
    fn middleware_edit_round_trips_file_text() {
        let value: Value = serde_json::from_str(MIDDLEWARE_JSON).unwrap();
        let doc = MiddlewareDocument::from_json(&value).unwrap();

        assert_eq!(pretty_json(&doc.to_json()), MIDDLEWARE_JSON);

        let params = MiddlewareConfig::parse_params(r#"{"z": 1}"#).unwrap().unwrap();
        let edited = doc
            .with_middleware(
                &MiddlewareInsertion::new("my-phase", "my-middleware-1")
                    .anchor(PhaseAnchor::Before("routes".into()))
                    .config(
                        MiddlewareConfig::new()
                            .with_paths(["/x", "/y"])
                            .with_params(params),
                    ),
            )
            .unwrap();

        let text = pretty_json(&edited.to_json());
        let phase = text.find("\"my-phase\"").unwrap();
        let routes = text.find("\"routes\"").unwrap();
        let parse = text.find("\"parse\"").unwrap();
        assert!(parse < phase && phase < routes);
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn soap_models_register_as_public() {
        let config = ModelConfigDocument::new();
        let registration = ModelRegistration::detached_public();
        let config = ["GetQuote", "Globals", "GetQuoteResponse"]
            .iter()
            .fold(config, |doc, name| doc.with_registration(name, &registration));

        for name in config.model_names() {
            assert!(config.registration(&name).unwrap().public);
        }
    }
}
