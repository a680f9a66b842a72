//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use loopgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::LoopgenResult,
};

/// In-memory filesystem. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            // Lock poisoning is the only failure mode and leaves nothing to seed.
            let _ = self.create_dir_all(parent);
        }
        let _ = self.write_file(path, content);
        self
    }

    /// Content of a file, if present.
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> LoopgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> LoopgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> LoopgenResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> LoopgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        let err = fs
            .write_file(Path::new("app/server/config.json"), "{}")
            .unwrap_err();
        assert!(err.to_string().contains("Parent directory does not exist"));

        fs.create_dir_all(Path::new("app/server")).unwrap();
        fs.write_file(Path::new("app/server/config.json"), "{}").unwrap();
        assert!(fs.exists(Path::new("app")));
        assert_eq!(fs.content("app/server/config.json").unwrap(), "{}");
    }

    #[test]
    fn clones_share_contents() {
        let fs = MemoryFilesystem::new().with_file("app/package.json", "{}");
        let other = fs.clone();
        other.remove_dir_all(Path::new("app")).unwrap();
        assert!(fs.list_files().is_empty());
        assert!(!fs.exists(Path::new("app")));
    }
}
