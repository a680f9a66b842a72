//! Application layer for loopgen.
//!
//! This layer contains:
//! - **Services**: use case orchestration (one per CLI command family)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All document rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AppRequest, AppService, BindingSummary, DataSourceService, MiddlewareService,
    ServiceSummary, SoapReport, SoapRequest, SoapService, TemplateInfo, TemplateService,
    WsdlSummary,
};

pub use ports::{Filesystem, TemplateRenderer, TemplateStore, WsdlReader};

pub use error::ApplicationError;
