pub mod app;
pub mod common;
pub mod datasource;
pub mod middleware;
pub mod model_config;
pub mod ordered_map;
pub mod project_structure;
pub mod template;

pub use crate::domain::DomainError;
pub use app::{AppBlueprint, AppName, AppTarget, AppTemplateKind, LoopbackVersion};
pub use datasource::{DataSourceDefinition, DataSourcesDocument};
pub use middleware::{MiddlewareConfig, MiddlewareDocument, MiddlewareInsertion, PhaseAnchor, SubPhase};
pub use model_config::{ModelConfigDocument, ModelRegistration};
pub use ordered_map::OrderedMap;
pub use project_structure::ProjectStructure;
pub use template::Template;
