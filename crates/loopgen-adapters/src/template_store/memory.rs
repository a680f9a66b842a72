//! In-memory template store with built-in templates.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};

use loopgen_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{AppTarget, DomainValidator as validator, Template, TemplateId},
    error::LoopgenResult,
};
use tracing::debug;

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Thread-safe in-memory template store keyed by template id.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<TemplateId, Template>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the built-in LoopBack templates loaded.
    pub fn with_builtin() -> LoopgenResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    pub fn load_builtin(&self) -> LoopgenResult<()> {
        for template in builtin_templates::all_templates()? {
            self.insert(template)?;
        }
        Ok(())
    }

    /// Load `template.toml` templates from `dir`, replacing same-id entries.
    pub fn load_dir(&self, dir: &Path) -> LoopgenResult<usize> {
        let templates = FilesystemTemplateLoader::new(dir).load_all()?;
        let count = templates.len();
        for template in templates {
            self.insert(template)?;
        }
        debug!(count, dir = %dir.display(), "Loaded local templates");
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn find(&self, target: &AppTarget) -> LoopgenResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .values()
            .filter(|t| t.matches(target))
            .cloned()
            .collect())
    }

    fn get(&self, id: &TemplateId) -> LoopgenResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateResolution {
                reason: format!("Template not found: {}", id),
            }
            .into()
        })
    }

    fn list(&self) -> LoopgenResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, template: Template) -> LoopgenResult<()> {
        validator::validate_template(&template)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.insert(template.id.clone(), template).is_some() {
            debug!("Replaced template with the same id");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopgen_core::domain::{
        AppTemplateKind, FileSpec, LoopbackVersion, TargetMatcher, TemplateContent,
        TemplateMetadata, TemplateNode, TemplateSource,
    };

    #[test]
    fn builtin_templates_cover_every_target() {
        let store = InMemoryStore::with_builtin().unwrap();
        for version in LoopbackVersion::ALL {
            for kind in version.templates() {
                let target = AppTarget::new(version, kind.as_str()).unwrap();
                assert!(
                    !store.find(&target).unwrap().is_empty(),
                    "no template for {target}"
                );
            }
        }
    }

    #[test]
    fn insert_replaces_same_id() {
        let store = InMemoryStore::new();
        let make = |body: &'static str| {
            Template::builder()
                .id(TemplateId::new("custom", "1.0.0"))
                .matcher(
                    TargetMatcher::builder()
                        .kind(AppTemplateKind::EmptyServer)
                        .build(),
                )
                .metadata(TemplateMetadata::new("custom"))
                .add_node(TemplateNode::File(FileSpec::new(
                    "README.md",
                    TemplateContent::Literal(TemplateSource::Static(body)),
                )))
                .build()
                .unwrap()
        };

        store.insert(make("one")).unwrap();
        store.insert(make("two")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_unknown_id_fails() {
        let store = InMemoryStore::new();
        assert!(store.get(&TemplateId::new("nope", "1.0.0")).is_err());
    }
}
