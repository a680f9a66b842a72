//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use loopgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{LoopgenError, LoopgenResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> LoopgenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> LoopgenResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> LoopgenResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> LoopgenResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> LoopgenError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let server = dir.path().join("app/server");

        fs.create_dir_all(&server).unwrap();
        fs.write_file(&server.join("config.json"), "{}\n").unwrap();

        assert!(fs.exists(&server.join("config.json")));
        assert_eq!(fs.read_file(&server.join("config.json")).unwrap(), "{}\n");
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_file(&dir.path().join("nope.json"))
            .unwrap_err();
        assert!(err.to_string().contains("nope.json"));
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn remove_dir_all_clears_tree() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let root = dir.path().join("app");
        fs.create_dir_all(&root.join("common/models")).unwrap();
        fs.write_file(&root.join("common/models/note.json"), "{}").unwrap();

        fs.remove_dir_all(&root).unwrap();
        assert!(!fs.exists(&root));
    }
}
