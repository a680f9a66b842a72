//! Reading and writing the JSON documents of an existing LoopBack project.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::pretty_json,
    error::LoopgenResult,
};

/// JSON files of one project, addressed by path relative to its root.
pub(crate) struct ProjectDocuments<'a> {
    filesystem: &'a dyn Filesystem,
    root: &'a Path,
}

impl<'a> ProjectDocuments<'a> {
    pub(crate) fn new(filesystem: &'a dyn Filesystem, root: &'a Path) -> Self {
        Self { filesystem, root }
    }

    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a document that must exist.
    pub(crate) fn read(&self, relative: &str) -> LoopgenResult<Value> {
        let path = self.path(relative);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::ProjectFileMissing { path }.into());
        }
        self.parse(path)
    }

    /// Read a document, or an empty object when the file is absent.
    pub(crate) fn read_or_empty(&self, relative: &str) -> LoopgenResult<Value> {
        let path = self.path(relative);
        if !self.filesystem.exists(&path) {
            debug!(path = %path.display(), "Document absent, starting empty");
            return Ok(Value::Object(Default::default()));
        }
        self.parse(path)
    }

    pub(crate) fn write(&self, relative: &str, value: &Value) -> LoopgenResult<()> {
        self.write_text(relative, &pretty_json(value))
    }

    pub(crate) fn write_text(&self, relative: &str, content: &str) -> LoopgenResult<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        debug!(path = %path.display(), bytes = content.len(), "Writing document");
        self.filesystem.write_file(&path, content)
    }

    fn parse(&self, path: PathBuf) -> LoopgenResult<Value> {
        let text = self.filesystem.read_file(&path)?;
        serde_json::from_str(&text).map_err(|e| {
            ApplicationError::DocumentParse {
                path,
                reason: e.to_string(),
            }
            .into()
        })
    }
}
