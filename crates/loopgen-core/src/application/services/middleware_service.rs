//! Middleware Service - edits `server/middleware.json`.

use std::path::Path;

use tracing::{info, instrument};

use super::documents::ProjectDocuments;
use crate::{
    application::ports::Filesystem,
    domain::{DomainValidator as validator, MiddlewareDocument, MiddlewareInsertion, paths},
    error::LoopgenResult,
};

pub struct MiddlewareService {
    filesystem: Box<dyn Filesystem>,
}

impl MiddlewareService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Register a middleware and write the phase list back.
    ///
    /// Returns the phase key the entry landed under.
    #[instrument(
        skip_all,
        fields(
            project = %project_root.display(),
            phase = %insertion.phase,
            source = %insertion.source
        )
    )]
    pub fn add_middleware(
        &self,
        project_root: &Path,
        insertion: &MiddlewareInsertion,
    ) -> LoopgenResult<String> {
        validator::validate_phase_name(&insertion.phase)?;
        let docs = ProjectDocuments::new(self.filesystem.as_ref(), project_root);
        let document = MiddlewareDocument::from_json(&docs.read(paths::MIDDLEWARE)?)?;

        let updated = document.with_middleware(insertion)?;
        docs.write(paths::MIDDLEWARE, &updated.to_json())?;

        let key = insertion.phase_key();
        info!(phase_key = %key, "Middleware registered");
        Ok(key)
    }

    /// Phase groups in pipeline order.
    pub fn list_phases(&self, project_root: &Path) -> LoopgenResult<Vec<String>> {
        let docs = ProjectDocuments::new(self.filesystem.as_ref(), project_root);
        let document = MiddlewareDocument::from_json(&docs.read(paths::MIDDLEWARE)?)?;
        Ok(document.phase_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{DomainError, PhaseAnchor, SubPhase};
    use crate::error::LoopgenError;
    use std::sync::{Arc, Mutex};

    const PHASES: &str = r#"{
  "initial": { "compression": {} },
  "routes": { "loopback#rest": { "paths": ["${restApiRoot}"] } },
  "final": {}
}"#;

    fn project_fs(written: Arc<Mutex<Option<String>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|path| path == Path::new("app/server/middleware.json"))
            .returning(|_| true);
        fs.expect_read_file()
            .returning(|_| Ok(PHASES.to_string()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(move |_, content| {
            *written.lock().unwrap() = Some(content.to_string());
            Ok(())
        });
        fs
    }

    #[test]
    fn inserts_new_phase_before_anchor() {
        let written = Arc::new(Mutex::new(None));
        let service = MiddlewareService::new(Box::new(project_fs(written.clone())));

        let insertion = MiddlewareInsertion::new("audit", "./middleware/audit")
            .anchor(PhaseAnchor::Before("routes".into()));
        let key = service.add_middleware(Path::new("app"), &insertion).unwrap();
        assert_eq!(key, "audit");

        let text = written.lock().unwrap().clone().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["initial", "audit", "routes", "final"]);
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn sub_phase_key_is_reported() {
        let written = Arc::new(Mutex::new(None));
        let service = MiddlewareService::new(Box::new(project_fs(written)));

        let insertion = MiddlewareInsertion::new("routes", "morgan").sub_phase(SubPhase::After);
        let key = service.add_middleware(Path::new("app"), &insertion).unwrap();
        assert_eq!(key, "routes:after");
    }

    #[test]
    fn unknown_anchor_writes_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_file().returning(|_| Ok(PHASES.to_string()));
        fs.expect_write_file().never();
        let service = MiddlewareService::new(Box::new(fs));

        let insertion =
            MiddlewareInsertion::new("audit", "audit").anchor(PhaseAnchor::After("nope".into()));
        let err = service.add_middleware(Path::new("app"), &insertion).unwrap_err();
        assert!(matches!(
            err,
            LoopgenError::Domain(DomainError::AnchorNotFound { .. })
        ));
    }

    #[test]
    fn phase_with_colon_is_rejected_before_reading_the_project() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().never();
        fs.expect_write_file().never();
        let service = MiddlewareService::new(Box::new(fs));

        let insertion = MiddlewareInsertion::new("routes:before", "audit");
        let err = service.add_middleware(Path::new("app"), &insertion).unwrap_err();
        assert!(matches!(
            err,
            LoopgenError::Domain(DomainError::InvalidPhaseName { .. })
        ));
    }

    #[test]
    fn missing_middleware_file_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        let service = MiddlewareService::new(Box::new(fs));

        let err = service.list_phases(Path::new("nowhere")).unwrap_err();
        assert!(err.to_string().contains("middleware.json not found"));
    }

    #[test]
    fn lists_phase_groups() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_file().returning(|_| Ok(PHASES.to_string()));
        let service = MiddlewareService::new(Box::new(fs));

        assert_eq!(
            service.list_phases(Path::new("app")).unwrap(),
            ["initial", "routes", "final"]
        );
    }
}
