//! Infrastructure adapters for loopgen.
//!
//! This crate implements the ports defined in `loopgen_core::application::ports`:
//! filesystems, the template store and renderer, and the WSDL reader. It
//! holds every external dependency and all I/O.

pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod template_store;
pub mod wsdl;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use template_store::InMemoryStore;
pub use wsdl::XmlWsdlReader;
