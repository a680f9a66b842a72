//! Application template model and rendering context.
//!
//! A template is a tree of files and directories that make up a starter
//! LoopBack application. Templates are selected for an [`AppTarget`]
//! (LoopBack version + template kind) through a [`TargetMatcher`].
//!
//! ```text
//! Template (aggregate root)
//! ├── TemplateId         name@version
//! ├── TargetMatcher      which (version, kind) it serves
//! ├── TemplateMetadata   display info
//! └── TemplateTree
//!      └── Vec<TemplateNode>
//!           ├── FileSpec       (path, content)
//!           └── DirectorySpec  (path)
//! ```
//!
//! ## Literal vs Parameterized
//!
//! Literal content skips substitution entirely. Parameterized content goes
//! through [`RenderContext::render`], replacing `{{VARIABLE}}` placeholders.
//! Files such as `server/server.js` are literal; the notes model and the
//! client README mention the application name and are parameterized.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::app::{AppTarget, AppTemplateKind, LoopbackVersion};
use crate::domain::{entities::common::RelativePath, error::DomainError, naming};

/// Variables available to parameterized template files.
///
/// ## Built-ins
///
/// | Variable | Example |
/// |----------|---------|
/// | `PROJECT_NAME` | `my-app` |
/// | `PROJECT_NAME_SNAKE` | `my_app` |
/// | `PROJECT_NAME_KEBAB` | `my-app` |
/// | `PROJECT_NAME_PASCAL` | `MyApp` |
///
/// Callers add more with [`RenderContext::with_variable`] (`YEAR`,
/// `LOOPBACK_VERSION`, ...).
#[derive(Debug, Clone)]
pub struct RenderContext {
    project_name: String,
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(project_name: impl Into<String>) -> Self {
        let project_name = project_name.into();
        let variables = [
            ("PROJECT_NAME", project_name.clone()),
            ("PROJECT_NAME_SNAKE", naming::to_snake_case(&project_name)),
            ("PROJECT_NAME_KEBAB", naming::slugify(&project_name)),
            ("PROJECT_NAME_PASCAL", naming::to_pascal_case(&project_name)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

        Self {
            project_name,
            variables,
        }
    }

    /// Built-ins can be overridden.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Substitute `{{NAME}}` placeholders in one left-to-right pass, so
    /// substituted values are never rescanned. Unknown names stay verbatim.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                rest = &rest[open..];
                break;
            };
            let name = &after[..close];
            match self.variables.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[open..open + close + 4]),
            }
            rest = &after[close + 2..];
        }
        out.push_str(rest);
        out
    }
}

/// Template identifier, displayed as `name@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    /// Builds an id from trusted parts. Use [`TemplateId::parse`] for
    /// user input.
    ///
    /// # Panics
    ///
    /// If `name` contains `@`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let id = Self {
            name: name.into(),
            version: version.into(),
        };
        assert!(!id.name.contains('@'), "'@' in template name {:?}", id.name);
        id
    }

    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut parts = text.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(version), None) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(DomainError::InvalidTemplate(format!(
                "'{text}' is not a template id of the form name@version"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A reusable application blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `id.name` is non-empty
/// 2. `metadata.name` is non-empty
/// 3. `tree` is non-empty
/// 4. All paths in `tree` are unique
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub matcher: TargetMatcher,
    pub metadata: TemplateMetadata,
    pub tree: TemplateTree,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let unnamed = if self.id.name().is_empty() {
            Some("id")
        } else if self.metadata.name.is_empty() {
            Some("metadata")
        } else {
            None
        };
        if let Some(part) = unnamed {
            return Err(DomainError::InvalidTemplate(format!("{part} has an empty name")));
        }
        if self.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            });
        }

        let mut paths = HashSet::with_capacity(self.tree.nodes.len());
        match self
            .tree
            .nodes
            .iter()
            .map(|node| node.path().as_str())
            .find(|path| !paths.insert(path.clone()))
        {
            Some(path) => Err(DomainError::DuplicatePath { path }),
            None => Ok(()),
        }
    }

    pub fn matches(&self, target: &AppTarget) -> bool {
        self.matcher.matches(target)
    }

    pub fn specificity(&self) -> u8 {
        self.matcher.specificity()
    }
}

/// Builder for [`Template`]; `build()` requires id, matcher, metadata and a
/// non-empty tree.
#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    matcher: Option<TargetMatcher>,
    metadata: Option<TemplateMetadata>,
    tree: TemplateTree,
}

impl TemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn matcher(mut self, matcher: TargetMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Replaces nodes added so far.
    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    pub fn build(self) -> Result<Template, DomainError> {
        let missing = |field| DomainError::MissingRequiredField { field };
        if self.tree.is_empty() {
            return Err(DomainError::InvalidTemplate("a template needs at least one node".into()));
        }
        let id = self.id.ok_or_else(|| missing("id"))?;
        let matcher = self.matcher.ok_or_else(|| missing("matcher"))?;
        let metadata = self.metadata.ok_or_else(|| missing("metadata"))?;
        Ok(Template {
            id,
            matcher,
            metadata,
            tree: self.tree,
        })
    }
}

/// When a template applies. `None` fields are wildcards.
///
/// | Template | Version | Kind | Specificity |
/// |----------|---------|------|-------------|
/// | shared README | * | * | 0 |
/// | api-server (any version) | * | api-server | 1 |
/// | notes for 3.x | 3.x | notes | 2 |
///
/// When several templates match, the most specific one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetMatcher {
    pub version: Option<LoopbackVersion>,
    pub kind: Option<AppTemplateKind>,
}

impl TargetMatcher {
    pub fn builder() -> TargetMatcherBuilder {
        TargetMatcherBuilder::default()
    }

    pub fn matches(&self, target: &AppTarget) -> bool {
        self.version.is_none_or(|v| v == target.version())
            && self.kind.is_none_or(|k| k == target.template())
    }

    /// Count of constrained fields.
    pub fn specificity(&self) -> u8 {
        u8::from(self.version.is_some()) + u8::from(self.kind.is_some())
    }
}

#[derive(Default)]
pub struct TargetMatcherBuilder {
    version: Option<LoopbackVersion>,
    kind: Option<AppTemplateKind>,
}

impl TargetMatcherBuilder {
    pub fn version(mut self, version: LoopbackVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn kind(mut self, kind: AppTemplateKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn build(self) -> TargetMatcher {
        TargetMatcher {
            version: self.version,
            kind: self.kind,
        }
    }
}

/// Display details shown by `loopgen list`.
#[derive(Debug, Clone)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "1.0.0".into(),
            author: "loopgen".into(),
            tags: vec![],
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Ordered filesystem nodes; directories should precede their files.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: RelativePath,
    pub content: TemplateContent,
}

impl FileSpec {
    pub fn new(path: impl Into<RelativePath>, content: TemplateContent) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
}

impl DirectorySpec {
    pub fn new(path: impl Into<RelativePath>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone)]
pub enum TemplateContent {
    /// Written byte-for-byte.
    Literal(TemplateSource),
    /// Passed through [`RenderContext::render`] first.
    Parameterized(TemplateSource),
}

/// Embedded text for built-ins, owned text for templates read from disk.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Static(&'static str),
    Owned(String),
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Used by loaders to pick `Parameterized` when a manifest is silent.
    pub fn contains_placeholder(&self) -> bool {
        self.as_str()
            .split_once("{{")
            .is_some_and(|(_, tail)| tail.contains("}}"))
    }
}
