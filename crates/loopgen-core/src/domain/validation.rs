use crate::domain::{
    entities::{DataSourceDefinition, ProjectStructure, Template, middleware},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Services call through here rather than reaching into each entity.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }

    pub fn validate_datasource(definition: &DataSourceDefinition) -> Result<(), DomainError> {
        definition.validate()
    }

    pub fn validate_phase_name(name: &str) -> Result<(), DomainError> {
        middleware::validate_phase_name(name)
    }
}
