use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::error::DomainError;

/// Serialize a JSON document the way LoopBack tooling writes them:
/// two-space indentation and a trailing newline.
pub fn pretty_json(value: &Value) -> String {
    format!("{value:#}\n")
}

/// Files and directories ready to be written under `root`.
///
/// Produced by template rendering and by the document generators. It
/// contains no business logic, only data.
#[derive(Debug, Clone)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content,
        }));
    }

    pub fn add_json_file(&mut self, path: impl Into<PathBuf>, value: &Value) {
        self.add_file(path, pretty_json(value));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: String) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    /// Non-empty, relative paths only, each path at most once.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidTemplate("nothing to write".into()));
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries.iter().map(FsEntry::path).try_for_each(|path| {
            let shown = path.display().to_string();
            if path.is_absolute() {
                Err(DomainError::AbsolutePathNotAllowed { path: shown })
            } else if !seen.insert(path) {
                Err(DomainError::DuplicatePath { path: shown })
            } else {
                Ok(())
            }
        })
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileToWrite> {
        let path = path.as_ref();
        self.files().find(|f| f.path == path)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}
