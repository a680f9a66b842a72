//! SOAP Service - generates models and an API facade from a WSDL binding.
//!
//! Workflow:
//! 1. Resolve the WSDL location from the SOAP data source (or an override)
//! 2. Read and parse the WSDL through the [`WsdlReader`] port, once
//! 3. Map the selected operations with [`SoapMapper`]
//! 4. Write model schemas, the API model and `model-config.json` updates
//!
//! Every document is produced in memory before the first write. Models
//! that exist in the project but were not generated for the same binding
//! are never overwritten.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::documents::ProjectDocuments;
use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, WsdlReader},
    },
    domain::{
        DataSourcesDocument, DomainError, ModelConfigDocument, ModelRegistration, SoapApi,
        SoapMapper, WsdlDefinition, paths, pretty_json,
    },
    error::LoopgenResult,
};

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    /// SOAP data source the API model is attached to.
    pub data_source: String,
    /// WSDL location overriding the data source's own.
    pub wsdl: Option<String>,
    pub service: String,
    pub binding: String,
    /// Operations to expose; empty means all of them.
    pub operations: Vec<String>,
}

/// What was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoapReport {
    pub location: String,
    pub models: Vec<String>,
    pub api_model: String,
    pub operations: Vec<String>,
    /// Written files, relative to the project root.
    pub files: Vec<String>,
}

/// Services, bindings and operations of a WSDL document, for prompting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WsdlSummary {
    pub location: String,
    pub services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub name: String,
    pub bindings: Vec<BindingSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub name: String,
    pub style: String,
    pub operations: Vec<String>,
}

impl WsdlSummary {
    /// List what a WSDL document offers.
    pub fn from_definition(location: &str, wsdl: &WsdlDefinition) -> Self {
        let services = wsdl
            .services
            .iter()
            .map(|svc| ServiceSummary {
                name: svc.name.clone(),
                bindings: wsdl
                    .service_bindings(svc)
                    .into_iter()
                    .map(|b| BindingSummary {
                        name: b.name.clone(),
                        style: b.style.to_string(),
                        operations: b.operation_names(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            location: location.to_string(),
            services,
        }
    }

    pub fn service(&self, name: &str) -> Option<&ServiceSummary> {
        self.services.iter().find(|s| s.name == name)
    }
}

impl ServiceSummary {
    pub fn binding(&self, name: &str) -> Option<&BindingSummary> {
        self.bindings.iter().find(|b| b.name == name)
    }
}

pub struct SoapService {
    filesystem: Box<dyn Filesystem>,
    reader: Box<dyn WsdlReader>,
}

impl SoapService {
    pub fn new(filesystem: Box<dyn Filesystem>, reader: Box<dyn WsdlReader>) -> Self {
        Self { filesystem, reader }
    }

    /// WSDL location for `data_source`, unless `override_location` is given.
    ///
    /// A relative file path stored in the data source is relative to the
    /// project. An override is used as given.
    pub fn resolve_location(
        &self,
        project_root: &Path,
        data_source: &str,
        override_location: Option<&str>,
    ) -> LoopgenResult<String> {
        let docs = ProjectDocuments::new(self.filesystem.as_ref(), project_root);
        let sources = DataSourcesDocument::from_json(&docs.read(paths::DATASOURCES)?)?;
        let definition = sources.get(data_source)?;

        if !definition.is_soap() {
            return Err(ApplicationError::NotSoapDataSource {
                name: definition.name,
                connector: definition.connector,
            }
            .into());
        }

        match override_location {
            Some(location) => Ok(location.to_string()),
            None => definition
                .wsdl_location()
                .map(|location| project_relative(project_root, &location))
                .ok_or_else(|| {
                    ApplicationError::MissingWsdlLocation {
                        name: definition.name.clone(),
                    }
                    .into()
                }),
        }
    }

    /// Read and parse the WSDL document at `location`.
    #[instrument(skip(self))]
    pub fn read(&self, location: &str) -> LoopgenResult<WsdlDefinition> {
        self.reader.read(location)
    }

    /// Generate models for the selected operations and register them.
    pub fn generate(&self, project_root: &Path, request: &SoapRequest) -> LoopgenResult<SoapReport> {
        let location =
            self.resolve_location(project_root, &request.data_source, request.wsdl.as_deref())?;
        let wsdl = self.read(&location)?;
        self.generate_from(project_root, request, &location, &wsdl)
    }

    /// Generate from a WSDL document that was already read from `location`.
    #[instrument(
        skip_all,
        fields(
            project = %project_root.display(),
            data_source = %request.data_source,
            binding = %request.binding
        )
    )]
    pub fn generate_from(
        &self,
        project_root: &Path,
        request: &SoapRequest,
        location: &str,
        wsdl: &WsdlDefinition,
    ) -> LoopgenResult<SoapReport> {
        let api = SoapMapper::map(wsdl, &request.service, &request.binding, &request.operations)?;

        let docs = ProjectDocuments::new(self.filesystem.as_ref(), project_root);
        let mut model_config = ModelConfigDocument::from_json(&docs.read_or_empty(paths::MODEL_CONFIG)?)?;

        let mut outputs: Vec<(String, String)> = Vec::new();
        for model in &api.models {
            outputs.push((model.file_path().as_str(), pretty_json(&model.to_json())));
        }
        self.check_conflicts(&docs, &api, &model_config, &outputs)?;

        let detached = ModelRegistration::detached_public();
        for model in &api.models {
            model_config = model_config.with_registration(&model.name, &detached);
        }
        outputs.push((api.api.json_path().as_str(), pretty_json(&api.api_json())));
        outputs.push((api.api.js_path().as_str(), api.api.to_js(&request.data_source)));
        model_config = model_config.with_registration(
            &api.api.name,
            &ModelRegistration::new(Some(request.data_source.clone()), true),
        );
        outputs.push((paths::MODEL_CONFIG.to_string(), pretty_json(&model_config.to_json())));

        for (path, content) in &outputs {
            docs.write_text(path, content)?;
        }

        info!(
            models = api.models.len(),
            files = outputs.len(),
            "SOAP models generated"
        );

        Ok(SoapReport {
            location: location.to_string(),
            models: api.models.iter().map(|m| m.name.clone()).collect(),
            api_model: api.api.name.clone(),
            operations: api.api.methods.iter().map(|m| m.operation.clone()).collect(),
            files: outputs.into_iter().map(|(path, _)| path).collect(),
        })
    }

    /// Refuse to replace models this binding did not generate.
    ///
    /// A model is ours when the existing API model of the same binding lists
    /// it. Anything else may only be rewritten with identical content and a
    /// detached public registration.
    fn check_conflicts(
        &self,
        docs: &ProjectDocuments<'_>,
        api: &SoapApi,
        model_config: &ModelConfigDocument,
        model_files: &[(String, String)],
    ) -> LoopgenResult<()> {
        let mut slugs: HashMap<&str, &str> = HashMap::new();
        for (model, (path, _)) in api.models.iter().zip(model_files) {
            if let Some(other) = slugs.insert(path.as_str(), model.name.as_str()) {
                return Err(DomainError::GeneratedModelConflict {
                    model: model.name.clone(),
                    existing: format!("{path}, also generated for '{other}'"),
                }
                .into());
            }
        }

        let owned = self.owned_models(docs, api)?;
        let detached = ModelRegistration::detached_public();
        for (model, (path, content)) in api.models.iter().zip(model_files) {
            if owned.contains(&model.name) {
                continue;
            }
            if let Some(registration) = model_config.registration(&model.name) {
                if registration != detached {
                    return Err(DomainError::GeneratedModelConflict {
                        model: model.name.clone(),
                        existing: format!("its registration in {}", paths::MODEL_CONFIG),
                    }
                    .into());
                }
            }
            let file = docs.path(path);
            if self.filesystem.exists(&file) && self.filesystem.read_file(&file)? != *content {
                return Err(DomainError::GeneratedModelConflict {
                    model: model.name.clone(),
                    existing: path.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Models listed by an earlier run for the same binding. An API model
    /// file written for anything else is a conflict.
    fn owned_models(&self, docs: &ProjectDocuments<'_>, api: &SoapApi) -> LoopgenResult<HashSet<String>> {
        let path = api.api.json_path().as_str();
        if !self.filesystem.exists(&docs.path(&path)) {
            return Ok(HashSet::new());
        }
        let doc = docs.read(&path)?;
        let soap = &doc["options"]["soap"];
        if soap["binding"].as_str() != Some(api.api.binding.as_str()) {
            return Err(DomainError::GeneratedModelConflict {
                model: api.api.name.clone(),
                existing: path,
            }
            .into());
        }
        let owned = soap["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        debug!(api_model = %api.api.name, ?owned, "Regenerating binding");
        Ok(owned)
    }
}

/// Join a relative local path onto the project root.
fn project_relative(project_root: &Path, location: &str) -> String {
    if location.contains("://") || Path::new(location).is_absolute() {
        return location.to_string();
    }
    project_root.join(location).display().to_string()
}
