use std::fmt;
use std::path::{Path, PathBuf};

/// A filesystem path guaranteed to be **relative**.
///
/// Templates, generated models and the documents loopgen edits are always
/// addressed relative to the project root. An absolute path here is a bug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the provided path is absolute.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            !path.is_absolute(),
            "RelativePath cannot be absolute: {path:?}"
        );
        Self(path)
    }

    /// Try to create a relative path.
    ///
    /// This is the non-panicking variant.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, PathBuf> {
        let path = path.into();
        if path.is_absolute() {
            Err(path)
        } else {
            Ok(Self(path))
        }
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Path with forward slashes, used for duplicate detection.
    pub fn as_str(&self) -> String {
        self.0.to_string_lossy().replace('\\', "/")
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        RelativePath::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        RelativePath::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Well-known locations inside a LoopBack project.
pub mod paths {
    pub const MIDDLEWARE: &str = "server/middleware.json";
    pub const MODEL_CONFIG: &str = "server/model-config.json";
    pub const DATASOURCES: &str = "server/datasources.json";
    pub const COMPONENT_CONFIG: &str = "server/component-config.json";
    pub const COMMON_MODELS: &str = "common/models";
    pub const SERVER_MODELS: &str = "server/models";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_accepts_relative() {
        let p = RelativePath::new("server/middleware.json");
        assert_eq!(p.as_path(), Path::new("server/middleware.json"));
    }

    #[test]
    #[should_panic]
    fn relative_path_rejects_absolute() {
        RelativePath::new("/etc/passwd");
    }

    #[test]
    fn try_new_rejects_absolute() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
    }

    #[test]
    fn display_round_trips_path() {
        assert_eq!(
            RelativePath::from("common/models/note.json").to_string(),
            "common/models/note.json"
        );
    }
}
