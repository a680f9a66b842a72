// ============================================================================
// domain/error.rs - DOCUMENT AND GENERATOR ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (documents are rebuilt from scratch on every run)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid LoopBack version: {given}. Available versions are {}.", .available.join(", "))]
    InvalidVersion {
        given: String,
        available: Vec<String>,
    },

    #[error("Invalid template: {given}. Available templates for {version} are {}", .available.join(", "))]
    InvalidAppTemplate {
        given: String,
        version: String,
        available: Vec<String>,
    },

    #[error("Invalid application name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Invalid phase name '{name}': {reason}")]
    InvalidPhaseName { name: String, reason: String },

    #[error("Invalid middleware params: {reason}")]
    InvalidParams { reason: String },

    #[error("Invalid document '{document}': {reason}")]
    InvalidDocument { document: String, reason: String },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Conflicts (409-level equivalent)
    // ========================================================================
    #[error("middleware '{source_key}' is already registered in phase '{phase}'")]
    DuplicateMiddleware { phase: String, source_key: String },

    #[error("data source '{name}' already exists")]
    DuplicateDataSource { name: String },

    #[error("model name '{model}' is produced by both {first} and {second}")]
    ModelNameConflict {
        model: String,
        first: String,
        second: String,
    },

    #[error("generated model '{model}' would overwrite {existing}")]
    GeneratedModelConflict { model: String, existing: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("phase '{anchor}' not found; existing phases: {}", .available.join(", "))]
    AnchorNotFound {
        anchor: String,
        available: Vec<String>,
    },

    #[error("{kind} '{name}' not found in WSDL; available: {}", .available.join(", "))]
    WsdlItemNotFound {
        kind: &'static str,
        name: String,
        available: Vec<String>,
    },

    #[error("{kind} '{name}' not found; available: {}", .available.join(", "))]
    NotFound {
        kind: &'static str,
        name: String,
        available: Vec<String>,
    },

    #[error("No template matches target: {0}")]
    NoMatchingTemplate(String),

    // ========================================================================
    // WSDL constructs the mapper cannot express
    // ========================================================================
    #[error("unsupported WSDL construct in {context}: {construct}")]
    UnsupportedWsdlConstruct { context: String, construct: String },

    #[error("WSDL document is malformed: {reason}")]
    MalformedWsdl { reason: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersion { available, .. } => vec![
                format!("Supported LoopBack versions: {}", available.join(", ")),
                "Example: loopgen app my-app --loopback-version 3.x".into(),
            ],
            Self::InvalidAppTemplate {
                version, available, ..
            } => {
                let mut out = vec![format!("Templates available for {version}:")];
                out.extend(available.iter().map(|t| format!("  • {t}")));
                out.push("List all templates: loopgen list".into());
                out
            }
            Self::InvalidAppName { .. } => vec![
                "Use letters, digits and hyphens".into(),
                "Examples: my-app, notes-api".into(),
            ],
            Self::InvalidPhaseName { .. } => vec![
                "Phase names are plain words such as 'routes' or 'auth'".into(),
                "Use --sub-phase before|after instead of writing 'phase:after'".into(),
            ],
            Self::InvalidParams { .. } => vec![
                "Params must be a JSON object, e.g. --params '{\"limit\": 10}'".into(),
            ],
            Self::AnchorNotFound { available, .. } => vec![
                format!("Existing phases: {}", available.join(", ")),
                "List them with: loopgen phases".into(),
            ],
            Self::DuplicateMiddleware { phase, .. } => vec![
                format!("Edit the existing entry in server/middleware.json under '{phase}'"),
                "Or register the middleware under a different phase".into(),
            ],
            Self::DuplicateDataSource { .. } => vec![
                "Choose a different data source name".into(),
                "Or edit server/datasources.json directly".into(),
            ],
            Self::ModelNameConflict { .. } => vec![
                "Generate the operations that use each type separately with --operation".into(),
                "Or rename one of the schema types in the WSDL".into(),
            ],
            Self::GeneratedModelConflict { .. } => vec![
                "The application already defines a model with this name".into(),
                "Rename the schema type in the WSDL or remove the existing model first".into(),
            ],
            Self::WsdlItemNotFound { kind, available, .. } => {
                if available.is_empty() {
                    vec![format!("The WSDL declares no {kind}s")]
                } else {
                    vec![format!("Available {kind}s: {}", available.join(", "))]
                }
            }
            Self::NotFound { kind, available, .. } => {
                if available.is_empty() {
                    vec![format!("No {kind} is defined yet")]
                } else {
                    vec![format!("Known {kind}s: {}", available.join(", "))]
                }
            }
            Self::UnsupportedWsdlConstruct { .. } | Self::MalformedWsdl { .. } => vec![
                "Check the WSDL document with a validator".into(),
                "Only document/literal and rpc/literal bindings are supported".into(),
            ],
            Self::NoMatchingTemplate(target) => vec![
                "No template found for your selection".into(),
                format!("Target: {}", target),
                "Try: loopgen list".into(),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{}' is corrupted", template_id),
                "Please report this issue or use a different template".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidVersion { .. }
            | Self::InvalidAppTemplate { .. }
            | Self::InvalidAppName { .. }
            | Self::InvalidPhaseName { .. }
            | Self::InvalidParams { .. }
            | Self::InvalidDocument { .. }
            | Self::InvalidTemplate(_)
            | Self::UnsupportedWsdlConstruct { .. }
            | Self::MalformedWsdl { .. } => ErrorCategory::Validation,
            Self::DuplicateMiddleware { .. }
            | Self::DuplicateDataSource { .. }
            | Self::ModelNameConflict { .. }
            | Self::GeneratedModelConflict { .. } => ErrorCategory::Conflict,
            Self::AnchorNotFound { .. }
            | Self::WsdlItemNotFound { .. }
            | Self::NotFound { .. }
            | Self::NoMatchingTemplate(_) => ErrorCategory::NotFound,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_version_message_lists_alternatives() {
        let err = DomainError::InvalidVersion {
            given: "invalid-version".into(),
            available: vec!["2.x".into(), "3.x".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid LoopBack version: invalid-version. Available versions are 2.x, 3.x."
        );
    }

    #[test]
    fn invalid_template_message_lists_alternatives() {
        let err = DomainError::InvalidAppTemplate {
            given: "invalid-template".into(),
            version: "3.x".into(),
            available: vec![
                "api-server".into(),
                "empty-server".into(),
                "hello-world".into(),
                "notes".into(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid template: invalid-template. Available templates for 3.x \
             are api-server, empty-server, hello-world, notes"
        );
        assert!(err.suggestions().iter().any(|s| s.contains("notes")));
    }

    #[test]
    fn wsdl_lookup_failures_are_not_found() {
        let err = DomainError::WsdlItemNotFound {
            kind: "binding",
            name: "Nope".into(),
            available: vec!["StockQuoteSoap".into()],
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("StockQuoteSoap"));
    }

    #[test]
    fn duplicates_are_conflicts() {
        let err = DomainError::DuplicateDataSource { name: "db".into() };
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }
}
