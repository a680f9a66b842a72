//! loopgen core - document transforms and use cases for LoopBack scaffolding.
//!
//! The domain layer holds the pure transforms: ordered middleware phase
//! insertion, data source and model-config edits, and the WSDL to model
//! mapper. The application layer wires them to the outside world through
//! port traits implemented in `loopgen-adapters`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           loopgen-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (AppService, MiddlewareService, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateStore, WsdlReader) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     loopgen-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use loopgen_core::prelude::*;
//! # fn run(fs: Box<dyn Filesystem>) -> LoopgenResult<()> {
//! let service = MiddlewareService::new(fs);
//! let insertion = MiddlewareInsertion::new("routes", "./middleware/audit")
//!     .sub_phase(SubPhase::Before);
//! service.add_middleware("./my-app".as_ref(), &insertion)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        AppRequest, AppService, DataSourceService, MiddlewareService, SoapReport, SoapRequest,
        SoapService, TemplateInfo, TemplateService, WsdlSummary,
        ports::{Filesystem, TemplateRenderer, TemplateStore, WsdlReader},
    };
    pub use crate::domain::{
        AppBlueprint, AppName, AppTarget, AppTemplateKind, DataSourceDefinition,
        LoopbackVersion, MiddlewareConfig, MiddlewareInsertion, PhaseAnchor, ProjectStructure,
        RenderContext, SubPhase, Template, TemplateId, TemplateMetadata, WsdlDefinition,
    };
    pub use crate::error::{LoopgenError, LoopgenResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
