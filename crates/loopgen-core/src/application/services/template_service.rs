//! Template Service - template queries for listing and selection.

use serde::Serialize;

use crate::{
    application::ports::TemplateStore,
    domain::{AppTarget, LoopbackVersion, Template, TemplateId},
    error::LoopgenResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub kind: String,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.metadata.name.clone(),
            description: t.metadata.description.clone(),
            version: t
                .matcher
                .version
                .map_or_else(|| "any".to_string(), |v| v.to_string()),
            kind: t
                .matcher
                .kind
                .map_or_else(|| "any".to_string(), |k| k.to_string()),
        }
    }
}

pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, id: &TemplateId) -> LoopgenResult<Template> {
        self.store.get(id)
    }

    /// Add or replace a template.
    pub fn save(&self, template: Template) -> LoopgenResult<()> {
        self.store.insert(template)
    }

    pub fn find(&self, target: &AppTarget) -> LoopgenResult<Vec<Template>> {
        self.store.find(target)
    }

    /// All templates, sorted by id.
    pub fn list(&self) -> LoopgenResult<Vec<TemplateInfo>> {
        let mut infos: Vec<TemplateInfo> =
            self.store.list()?.iter().map(TemplateInfo::from).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }

    /// Templates applicable to one LoopBack version.
    pub fn list_for_version(&self, version: LoopbackVersion) -> LoopgenResult<Vec<TemplateInfo>> {
        let version_name = version.to_string();
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.version == "any" || t.version == version_name)
            .collect())
    }
}
