//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create an app" or "add a middleware".

pub mod app_service;
pub mod datasource_service;
mod documents;
pub mod middleware_service;
pub mod soap_service;
pub mod template_service;

pub use app_service::{AppRequest, AppService};
pub use datasource_service::DataSourceService;
pub use middleware_service::MiddlewareService;
pub use soap_service::{
    BindingSummary, ServiceSummary, SoapReport, SoapRequest, SoapService, WsdlSummary,
};
pub use template_service::{TemplateInfo, TemplateService};
