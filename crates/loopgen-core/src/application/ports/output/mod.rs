//! Driven (output) ports - implemented by infrastructure.
//!
//! The `loopgen-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{AppTarget, ProjectStructure, RenderContext, Template, TemplateId, WsdlDefinition};
use crate::error::LoopgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `loopgen_adapters::LocalFilesystem` (production)
/// - `loopgen_adapters::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> LoopgenResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> LoopgenResult<()>;

    fn read_file(&self, path: &Path) -> LoopgenResult<String>;

    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> LoopgenResult<()>;
}

/// Port for template storage and retrieval.
///
/// Implemented by `loopgen_adapters::InMemoryStore`, seeded with the
/// built-in LoopBack templates and any templates loaded from disk.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Find all templates matching a target.
    fn find(&self, target: &AppTarget) -> LoopgenResult<Vec<Template>>;

    fn get(&self, id: &TemplateId) -> LoopgenResult<Template>;

    fn list(&self) -> LoopgenResult<Vec<Template>>;

    /// Insert or replace a template with the same id.
    fn insert(&self, template: Template) -> LoopgenResult<()>;
}

/// Port for template rendering.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render a template into a project structure rooted at `output_root`.
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_root: &Path,
    ) -> LoopgenResult<ProjectStructure>;
}

/// Port for reading WSDL documents.
///
/// `location` is an `http(s)` URL or a local file path.
#[cfg_attr(test, mockall::automock)]
pub trait WsdlReader: Send + Sync {
    fn read(&self, location: &str) -> LoopgenResult<WsdlDefinition>;
}
