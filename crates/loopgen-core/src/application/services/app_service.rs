//! App Service - creates a new LoopBack application.
//!
//! This service coordinates the scaffolding workflow:
//! 1. Resolve the template for the (version, template) target
//! 2. Render template files with the application name
//! 3. Add the generated project documents (`package.json`, `.yo-rc.json`, ...)
//! 4. Write to the filesystem, removing a freshly created directory on failure

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{
        AppBlueprint, AppName, AppTarget, DomainValidator as validator, FsEntry, ProjectStructure,
        RenderContext, Template, paths,
    },
    error::{LoopgenError, LoopgenResult},
};

/// Everything needed to create one application.
#[derive(Debug, Clone)]
pub struct AppRequest {
    pub name: AppName,
    pub target: AppTarget,
    /// Directory the application is written into.
    pub directory: PathBuf,
    /// Mount the API explorer component.
    pub explorer: bool,
    /// Write into an existing directory.
    pub force: bool,
    /// Extra template variables, e.g. `YEAR`.
    pub variables: Vec<(String, String)>,
}

impl AppRequest {
    pub fn new(name: AppName, target: AppTarget, directory: impl Into<PathBuf>) -> Self {
        Self {
            name,
            target,
            directory: directory.into(),
            explorer: true,
            force: false,
            variables: Vec::new(),
        }
    }

    pub fn explorer(mut self, enabled: bool) -> Self {
        self.explorer = enabled;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push((key.into(), value.into()));
        self
    }
}

pub struct AppService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl AppService {
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Build the file set of a new application without touching the disk.
    #[instrument(
        skip_all,
        fields(
            target = %request.target,
            app = %request.name,
            directory = %request.directory.display()
        )
    )]
    pub fn plan(&self, request: &AppRequest) -> LoopgenResult<ProjectStructure> {
        let template = self.resolve_template(&request.target)?;
        info!(template = %template.id, "Template resolved");

        let context = request.variables.iter().fold(
            RenderContext::new(request.name.as_str())
                .with_variable("LOOPBACK_VERSION", request.target.version().as_str())
                .with_variable("APP_TEMPLATE", request.target.template().as_str()),
            |ctx, (key, value)| ctx.with_variable(key.as_str(), value.as_str()),
        );

        let mut structure = self
            .renderer
            .render(&template, &context, &request.directory)?;

        let blueprint = AppBlueprint::new(request.name.clone(), request.target, request.explorer);
        structure.add_json_file("package.json", &blueprint.package_json());
        structure.add_json_file(".yo-rc.json", &blueprint.yo_rc());
        structure.add_json_file(paths::COMPONENT_CONFIG, &blueprint.component_config());

        validator::validate_project_structure(&structure)?;
        debug!(entries = structure.entry_count(), "Application planned");
        Ok(structure)
    }

    /// Plan and write a new application.
    pub fn create(&self, request: &AppRequest) -> LoopgenResult<ProjectStructure> {
        let structure = self.plan(request)?;
        self.write_structure(&structure, request.force)?;
        info!("Application created");
        Ok(structure)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Resolve the most specific template for a target.
    fn resolve_template(&self, target: &AppTarget) -> LoopgenResult<Template> {
        let matches = self.store.find(target)?;

        let Some(max_specificity) = matches.iter().map(|t| t.specificity()).max() else {
            return Err(ApplicationError::TemplateResolution {
                reason: format!("No template matches target: {}", target),
            }
            .into());
        };

        let mut best: Vec<Template> = matches
            .into_iter()
            .filter(|t| t.specificity() == max_specificity)
            .collect();

        if best.len() > 1 {
            return Err(ApplicationError::TemplateResolution {
                reason: format!(
                    "Ambiguous: {} templates match {} with equal specificity",
                    best.len(),
                    target
                ),
            }
            .into());
        }

        let template = best.pop().ok_or_else(|| LoopgenError::Internal {
            message: "template selection emptied".into(),
        })?;
        validator::validate_template(&template)?;
        Ok(template)
    }

    /// Write with rollback of a directory this run created.
    fn write_structure(&self, structure: &ProjectStructure, force: bool) -> LoopgenResult<()> {
        let root = structure.root();
        let existed = self.filesystem.exists(root);
        if existed && !force {
            return Err(ApplicationError::ProjectExists {
                path: root.to_path_buf(),
            }
            .into());
        }

        match self.write_all(structure) {
            Ok(()) => {
                info!(entries = structure.entry_count(), "Wrote all files");
                Ok(())
            }
            Err(e) if !existed => {
                warn!("Write failed, attempting rollback");
                self.rollback(root);
                Err(e)
            }
            Err(e) => {
                warn!("Write failed inside an existing directory; leaving it in place");
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> LoopgenResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for entry in structure.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(error = %e, path = %root.display(), "Rollback failed");
        } else {
            info!("Rollback successful");
        }
    }
}
