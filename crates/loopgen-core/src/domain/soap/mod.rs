//! SOAP client generation: WSDL operations to LoopBack models.

pub mod api;
pub mod mapper;
pub mod model;

pub use api::{ApiModel, RemoteMethod};
pub use mapper::{SoapApi, SoapMapper, builtin_type};
pub use model::{ModelDefinition, PropertyDefinition, PropertyType};
