//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Template resolution failed (no match or ambiguous).
    #[error("Template resolution failed: {reason}")]
    TemplateResolution { reason: String },

    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,

    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// A LoopBack project file the command edits is absent.
    #[error("{path} not found; is this a LoopBack project?")]
    ProjectFileMissing { path: PathBuf },

    #[error("{path} is not valid JSON: {reason}")]
    DocumentParse { path: PathBuf, reason: String },

    #[error("Failed to fetch WSDL from {location}: {reason}")]
    WsdlFetch { location: String, reason: String },

    #[error("Failed to parse WSDL from {location}: {reason}")]
    WsdlParse { location: String, reason: String },

    #[error("Data source '{name}' uses connector '{connector}', expected 'soap'")]
    NotSoapDataSource { name: String, connector: String },

    #[error("Data source '{name}' has neither a 'wsdl' nor a 'url' option")]
    MissingWsdlLocation { name: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateResolution { reason } => vec![
                format!("Resolution failed: {}", reason),
                "Try: loopgen list to see available templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreLockError => vec!["The template store is locked".into()],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Choose a different application name or --dir".into(),
            ],
            Self::ProjectFileMissing { .. } => vec![
                "Run the command from the application root".into(),
                "Or pass the application directory with --project".into(),
            ],
            Self::DocumentParse { path, .. } => {
                vec![format!("Fix the JSON syntax in {}", path.display())]
            }
            Self::WsdlFetch { .. } => vec![
                "Check the WSDL URL or file path".into(),
                "Increase network.timeout_secs for slow services".into(),
            ],
            Self::WsdlParse { .. } => vec!["Check the WSDL document with a validator".into()],
            Self::NotSoapDataSource { .. } => vec![
                "Create one with: loopgen datasource <name> --connector soap --url <url>".into(),
            ],
            Self::MissingWsdlLocation { .. } => {
                vec!["Pass the WSDL location explicitly with --wsdl".into()]
            }
            _ => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateResolution { .. } | Self::ProjectFileMissing { .. } => {
                ErrorCategory::NotFound
            }
            Self::WsdlFetch { .. } => ErrorCategory::NotFound,
            Self::ProjectExists { .. } => ErrorCategory::Conflict,
            Self::DocumentParse { .. }
            | Self::WsdlParse { .. }
            | Self::NotSoapDataSource { .. }
            | Self::MissingWsdlLocation { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::StoreLockError
            | Self::RenderingFailed { .. } => ErrorCategory::Internal,
        }
    }
}
