//! Data Source Service - edits `server/datasources.json`.

use std::path::Path;

use tracing::{info, instrument};

use super::documents::ProjectDocuments;
use crate::{
    application::ports::Filesystem,
    domain::{DataSourceDefinition, DataSourcesDocument, DomainValidator as validator, paths},
    error::LoopgenResult,
};

pub struct DataSourceService {
    filesystem: Box<dyn Filesystem>,
}

impl DataSourceService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Append a data source definition; existing names are rejected.
    #[instrument(
        skip_all,
        fields(
            project = %project_root.display(),
            name = %definition.name,
            connector = %definition.connector
        )
    )]
    pub fn add(&self, project_root: &Path, definition: DataSourceDefinition) -> LoopgenResult<()> {
        validator::validate_datasource(&definition)?;
        let docs = ProjectDocuments::new(self.filesystem.as_ref(), project_root);
        let document = DataSourcesDocument::from_json(&docs.read(paths::DATASOURCES)?)?;

        let updated = document.with_datasource(definition)?;
        docs.write(paths::DATASOURCES, &updated.to_json())?;

        info!("Data source added");
        Ok(())
    }

    pub fn list(&self, project_root: &Path) -> LoopgenResult<Vec<DataSourceDefinition>> {
        Ok(self.load(project_root)?.definitions()?)
    }

    pub fn get(&self, project_root: &Path, name: &str) -> LoopgenResult<DataSourceDefinition> {
        Ok(self.load(project_root)?.get(name)?)
    }

    fn load(&self, project_root: &Path) -> LoopgenResult<DataSourcesDocument> {
        let docs = ProjectDocuments::new(self.filesystem.as_ref(), project_root);
        Ok(DataSourcesDocument::from_json(
            &docs.read(paths::DATASOURCES)?,
        )?)
    }
}
