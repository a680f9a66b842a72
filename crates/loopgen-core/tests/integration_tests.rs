//! Integration tests for loopgen-core: services driven through fake ports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use loopgen_core::{
    application::{ApplicationError, ports::*},
    domain::wsdl::{
        BindingOperation, BindingStyle, Message, MessagePart, PartReference, PortType,
        PortTypeOperation, QName, WsdlBinding, WsdlPort, WsdlService,
    },
    prelude::*,
};
use serde_json::Value;

#[derive(Clone, Default)]
struct FakeFs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl FakeFs {
    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    fn json(&self, path: &str) -> Value {
        let files = self.files.lock().unwrap();
        serde_json::from_str(&files[Path::new(path)]).unwrap()
    }

    fn keys(&self, path: &str) -> Vec<String> {
        self.json(path).as_object().unwrap().keys().cloned().collect()
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, _path: &Path) -> LoopgenResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> LoopgenResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> LoopgenResult<String> {
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "missing".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn remove_dir_all(&self, _path: &Path) -> LoopgenResult<()> {
        Ok(())
    }
}

struct FixedWsdl(WsdlDefinition);

impl WsdlReader for FixedWsdl {
    fn read(&self, _location: &str) -> LoopgenResult<WsdlDefinition> {
        Ok(self.0.clone())
    }
}

const MIDDLEWARE: &str = r#"{
  "initial:before": { "loopback#favicon": {} },
  "initial": { "compression": {} },
  "session": {},
  "auth": {},
  "parse": {},
  "routes": { "loopback#rest": { "paths": ["${restApiRoot}"] } },
  "files": {},
  "final": { "loopback#urlNotFound": {} },
  "final:after": { "strong-error-handler": {} }
}"#;

/// rpc/literal calculator: `Add(a: int, b: int) -> AddResponse(result: int)`.
fn calculator() -> WsdlDefinition {
    let ns = Some("http://example.com/calc".to_string());
    let q = |local: &str| QName::new(ns.clone(), local);
    let typed = |name: &str| MessagePart {
        name: name.into(),
        reference: PartReference::Type(QName::xsd("int")),
    };

    WsdlDefinition {
        name: Some("Calculator".into()),
        target_namespace: ns.clone(),
        services: vec![WsdlService {
            name: "CalculatorService".into(),
            ports: vec![WsdlPort {
                name: "CalculatorPort".into(),
                binding: q("RPCLiteralTest2.0Binding"),
                address: None,
            }],
        }],
        bindings: vec![WsdlBinding {
            name: "RPCLiteralTest2.0Binding".into(),
            port_type: q("CalculatorPortType"),
            style: BindingStyle::Rpc,
            operations: vec![BindingOperation {
                name: "Add".into(),
                soap_action: None,
                style: None,
            }],
        }],
        port_types: vec![PortType {
            name: "CalculatorPortType".into(),
            operations: vec![PortTypeOperation {
                name: "Add".into(),
                input: Some(q("AddRequest")),
                output: Some(q("AddResponse")),
            }],
        }],
        messages: vec![
            Message {
                name: "AddRequest".into(),
                parts: vec![typed("a"), typed("b")],
            },
            Message {
                name: "AddResponse".into(),
                parts: vec![typed("result")],
            },
        ],
        ..WsdlDefinition::default()
    }
}

#[test]
fn middleware_insertion_preserves_existing_order() {
    let fs = FakeFs::default().with_file("app/server/middleware.json", MIDDLEWARE);
    let service = MiddlewareService::new(Box::new(fs.clone()));
    let before = fs.keys("app/server/middleware.json");

    let insertion = MiddlewareInsertion::new("my-phase", "./middleware/audit")
        .anchor(PhaseAnchor::Before("routes".into()))
        .config(MiddlewareConfig::new().with_paths(["/api"]));
    service.add_middleware(Path::new("app"), &insertion).unwrap();

    let after = fs.keys("app/server/middleware.json");
    let untouched: Vec<&String> = after.iter().filter(|k| *k != "my-phase").collect();
    assert_eq!(untouched, before.iter().collect::<Vec<_>>());

    let routes = after.iter().position(|k| k == "routes").unwrap();
    assert_eq!(after[routes - 1], "my-phase");
}

#[test]
fn appending_to_existing_phase_keeps_its_position() {
    let fs = FakeFs::default().with_file("app/server/middleware.json", MIDDLEWARE);
    let service = MiddlewareService::new(Box::new(fs.clone()));
    let before = fs.keys("app/server/middleware.json");

    service
        .add_middleware(Path::new("app"), &MiddlewareInsertion::new("auth", "loopback#token"))
        .unwrap();

    assert_eq!(fs.keys("app/server/middleware.json"), before);
    let doc = fs.json("app/server/middleware.json");
    assert!(doc["auth"].get("loopback#token").is_some());
}

#[test]
fn soap_generation_marks_every_model_public() {
    let fs = FakeFs::default()
        .with_file("app/server/datasources.json", "{}")
        .with_file("app/server/model-config.json", r#"{ "_meta": {} }"#);

    DataSourceService::new(Box::new(fs.clone()))
        .add(
            Path::new("app"),
            DataSourceDefinition::soap("calc", "http://example.com/calc", None, true),
        )
        .unwrap();

    let service = SoapService::new(Box::new(fs.clone()), Box::new(FixedWsdl(calculator())));
    let report = service
        .generate(
            Path::new("app"),
            &SoapRequest {
                data_source: "calc".into(),
                wsdl: None,
                service: "CalculatorService".into(),
                binding: "RPCLiteralTest2.0Binding".into(),
                operations: vec![],
            },
        )
        .unwrap();

    assert_eq!(report.location, "http://example.com/calc?wsdl");
    assert!(
        report
            .files
            .contains(&"server/models/soap-rpc-literal-test-2-0-binding.json".to_string())
    );

    let request = fs.json("app/common/models/add.json");
    assert_eq!(request["properties"]["a"]["type"], "number");
    assert_eq!(request["properties"]["b"]["type"], "number");

    let config = fs.json("app/server/model-config.json");
    for model in &report.models {
        assert_eq!(config[model]["public"], true, "{model} is not public");
    }
}

#[test]
fn soap_generation_requires_project_files() {
    let service = SoapService::new(
        Box::new(FakeFs::default()),
        Box::new(FixedWsdl(calculator())),
    );
    let err = service
        .generate(
            Path::new("elsewhere"),
            &SoapRequest {
                data_source: "calc".into(),
                wsdl: None,
                service: "CalculatorService".into(),
                binding: "RPCLiteralTest2.0Binding".into(),
                operations: vec![],
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        LoopgenError::Application(ApplicationError::ProjectFileMissing { .. })
    ));
}
