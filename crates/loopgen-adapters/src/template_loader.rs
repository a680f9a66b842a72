//! Filesystem-based template loader.
//!
//! Discovers and parses `template.toml` manifests from a directory tree,
//! converting them into domain [`Template`] objects. Loaded templates are
//! inserted after the built-in ones, so a manifest reusing a built-in id
//! replaces it.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── api-server/
//! │   ├── template.toml        ← manifest (required)
//! │   ├── server/
//! │   │   ├── server.js
//! │   │   └── middleware.json
//! │   └── client/
//! │       └── README.md
//! └── acme-notes/
//!     ├── template.toml
//!     └── common/models/note.json
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "api-server"
//! version = "1.0.0"
//!
//! [matcher]
//! loopback_version = "3.x"      # 2.x | 3.x; omit to match both
//! kind             = "api-server"  # api-server | empty-server | hello-world | notes
//!
//! [metadata]
//! name        = "API server"
//! description = "LoopBack API server with local User auth"   # optional
//! author      = "acme"                                     # optional
//! tags        = ["api"]                                    # optional
//!
//! # Optional: override per-file content type.
//! # If omitted, files containing {{ }} are auto-detected as parameterized.
//! [[files]]
//! path = "server/boot/root.js"
//! type = "literal"               # literal | parameterized
//! ```

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use loopgen_core::domain::{
    AppTemplateKind, DirectorySpec, DomainError, FileSpec, LoopbackVersion, RelativePath,
    TargetMatcher, Template, TemplateBuilder, TemplateContent, TemplateId, TemplateMetadata,
    TemplateNode, TemplateSource, TemplateTree,
};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    #[serde(default)]
    pub matcher: MatcherSection,
    pub metadata: MetadataSection,
    /// Explicit per-file type overrides.
    pub files: Option<Vec<FileEntry>>,
    /// Directories that must exist even if they contain no tracked files.
    pub directories: Option<Vec<DirectoryEntry>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

/// `[matcher]` section. Omitted fields match any value.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MatcherSection {
    pub loopback_version: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    /// Display name shown in `loopgen list`.
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Copied verbatim.
    Literal,
    /// `{{VARIABLE}}` placeholders are substituted.
    Parameterized,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryEntry {
    pub path: String,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`Template`] objects from a directory of `template.toml` manifests.
///
/// Each immediate subdirectory holding a valid `template.toml` is one
/// template. Subdirectories without a manifest, or with an invalid one, are
/// skipped with a `WARN` log.
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load every valid template found under the templates directory.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidTemplate`] if the directory is missing or
    /// cannot be read.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<Template>, DomainError> {
        let root = &self.templates_dir;
        if !root.is_dir() {
            return Err(invalid(format!("templates directory not found: {}", root.display())));
        }

        let mut slots = fs::read_dir(root)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<Vec<_>>>()
            })
            .map_err(|e| invalid(format!("cannot list '{}': {e}", root.display())))?;
        slots.retain(|path| path.is_dir());
        // read_dir order is platform dependent
        slots.sort();

        let templates: Vec<Template> = slots
            .iter()
            .filter_map(|slot| match load_slot(slot) {
                Ok(template) => {
                    debug!(id = %template.id, "loaded template");
                    Some(template)
                }
                Err(e) => {
                    warn!(dir = %slot.display(), error = %e, "skipping template directory");
                    None
                }
            })
            .collect();

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }
}

fn invalid(message: String) -> DomainError {
    DomainError::InvalidTemplate(message)
}

#[instrument(fields(dir = %dir.display()))]
fn load_slot(dir: &Path) -> Result<Template, DomainError> {
    let manifest_path = dir.join("template.toml");
    let raw = match fs::read_to_string(&manifest_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(invalid(format!("no template.toml in '{}'", dir.display())));
        }
        Err(e) => return Err(invalid(format!("cannot read '{}': {e}", manifest_path.display()))),
    };
    let manifest: TemplateManifest = toml::from_str(&raw)
        .map_err(|e| invalid(format!("cannot parse '{}': {e}", manifest_path.display())))?;

    let TemplateSection { id, version } = &manifest.template;
    if id.contains('@') {
        return Err(invalid(format!("template id '{id}' cannot contain '@'")));
    }

    let tree = build_tree_from_dir(dir, &manifest)?;
    let meta = &manifest.metadata;
    let metadata = TemplateMetadata::new(meta.name.clone())
        .description(meta.description.clone().unwrap_or_default())
        .version(version.clone())
        .author(meta.author.clone().unwrap_or_else(|| "loopgen".into()))
        .tags(meta.tags.clone().unwrap_or_default());

    TemplateBuilder::default()
        .id(TemplateId::new(id, version))
        .matcher(parse_matcher(&manifest.matcher)?)
        .metadata(metadata)
        .tree(tree)
        .build()
}

/// Walk `dir` and build a [`TemplateTree`]: manifest directories first, then
/// everything on disk in sorted order.
fn build_tree_from_dir(dir: &Path, manifest: &TemplateManifest) -> Result<TemplateTree, DomainError> {
    let mut tree = TemplateTree::new();
    let mut added_paths: HashSet<String> = HashSet::new();

    if let Some(dirs) = &manifest.directories {
        for entry in dirs {
            let path = normalize_path(&entry.path);
            let relative = RelativePath::try_new(&path).map_err(|p| {
                DomainError::AbsolutePathNotAllowed {
                    path: p.display().to_string(),
                }
            })?;
            if added_paths.insert(path) {
                tree.push(TemplateNode::Directory(DirectorySpec::new(relative)));
            }
        }
    }

    let overrides: HashMap<String, FileType> = manifest
        .files
        .as_ref()
        .map(|files| {
            files
                .iter()
                .map(|f| (normalize_path(&f.path), f.file_type))
                .collect()
        })
        .unwrap_or_default();

    for walk_entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let walk_entry = walk_entry
            .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
        let abs_path = walk_entry.path();
        let rel_raw = abs_path.strip_prefix(dir).map_err(|_| {
            DomainError::InvalidTemplate(format!(
                "failed to relativise '{}' against '{}'",
                abs_path.display(),
                dir.display()
            ))
        })?;

        if rel_raw.as_os_str() == "template.toml" {
            continue;
        }

        let path_str = normalize_path(&rel_raw.to_string_lossy());

        if walk_entry.file_type().is_dir() {
            if added_paths.insert(path_str.clone()) {
                tree.push(TemplateNode::Directory(DirectorySpec::new(
                    RelativePath::new(path_str),
                )));
            }
            continue;
        }

        if !walk_entry.file_type().is_file() {
            continue;
        }

        let content = fs::read_to_string(abs_path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read file '{path_str}': {e}"))
        })?;
        let content = resolve_file_content(content, overrides.get(&path_str).copied());

        if added_paths.insert(path_str.clone()) {
            tree.push(TemplateNode::File(FileSpec::new(
                RelativePath::new(path_str),
                content,
            )));
        }
    }

    Ok(tree)
}

/// Explicit manifest type wins; otherwise `{{` marks a parameterized file.
fn resolve_file_content(content: String, file_type: Option<FileType>) -> TemplateContent {
    let source = TemplateSource::from(content);
    match file_type {
        Some(FileType::Literal) => TemplateContent::Literal(source),
        Some(FileType::Parameterized) => TemplateContent::Parameterized(source),
        None if source.contains_placeholder() => TemplateContent::Parameterized(source),
        None => TemplateContent::Literal(source),
    }
}

// ── Parsing helpers ───────────────────────────────────────────────────────────

fn parse_matcher(section: &MatcherSection) -> Result<TargetMatcher, DomainError> {
    let mut builder = TargetMatcher::builder();

    if let Some(s) = &section.loopback_version {
        builder = builder.version(s.parse::<LoopbackVersion>()?);
    }
    if let Some(s) = &section.kind {
        builder = builder.kind(parse_kind(s)?);
    }

    Ok(builder.build())
}

/// Parse an application template kind (case-insensitive).
pub fn parse_kind(s: &str) -> Result<AppTemplateKind, DomainError> {
    let wanted = s.to_lowercase();
    AppTemplateKind::ALL
        .into_iter()
        .find(|k| k.as_str() == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = AppTemplateKind::ALL.iter().map(|k| k.as_str()).collect();
            DomainError::InvalidTemplate(format!(
                "unknown template kind '{s}'; expected one of: {}",
                known.join(", ")
            ))
        })
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
