//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world.
//! Adapters in `loopgen-adapters` implement them.
//!
//! - `Filesystem`: reading and writing project files
//! - `TemplateStore`: template storage/retrieval
//! - `TemplateRenderer`: template rendering
//! - `WsdlReader`: fetching and parsing WSDL documents

pub mod output;

pub use output::{Filesystem, TemplateRenderer, TemplateStore, WsdlReader};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateRenderer, MockTemplateStore, MockWsdlReader};
