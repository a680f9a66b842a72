//! Unified error handling for loopgen core.
//!
//! Wraps domain and application errors behind one type with
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for loopgen core operations.
#[derive(Debug, Error, Clone)]
pub enum LoopgenError {
    /// Invalid input or a document the transforms cannot handle.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration failures (files, templates, WSDL retrieval).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl LoopgenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check the file printed by: loopgen config path".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in loopgen".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type LoopgenResult<T> = Result<T, LoopgenError>;
