//! Simple variable substitution renderer.

use std::path::Path;

use loopgen_core::{
    application::ports::TemplateRenderer,
    domain::{
        DomainValidator as validator, ProjectStructure, RenderContext, Template, TemplateContent,
        TemplateNode,
    },
    error::LoopgenResult,
};
use tracing::{debug, instrument};

/// Renderer replacing `{{VARIABLE}}` placeholders in parameterized files.
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.id))]
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_root: &Path,
    ) -> LoopgenResult<ProjectStructure> {
        validator::validate_template(template)?;

        let mut structure = ProjectStructure::new(output_root);

        for node in &template.tree.nodes {
            match node {
                TemplateNode::File(spec) => {
                    structure.add_file(spec.path.as_path(), render_content(&spec.content, context));
                }
                TemplateNode::Directory(spec) => {
                    structure.add_directory(spec.path.as_path());
                }
            }
        }

        validator::validate_project_structure(&structure)?;
        debug!(entries = structure.entry_count(), "Template rendered");

        Ok(structure)
    }
}

fn render_content(content: &TemplateContent, ctx: &RenderContext) -> String {
    match content {
        TemplateContent::Literal(source) => source.as_str().to_string(),
        TemplateContent::Parameterized(source) => ctx.render(source.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopgen_core::domain::{
        DirectorySpec, FileSpec, TargetMatcher, TemplateId, TemplateMetadata, TemplateSource,
    };

    #[test]
    fn substitutes_only_parameterized_files() {
        let template = Template::builder()
            .id(TemplateId::new("t", "1.0.0"))
            .matcher(TargetMatcher::default())
            .metadata(TemplateMetadata::new("t"))
            .add_node(TemplateNode::Directory(DirectorySpec::new("client")))
            .add_node(TemplateNode::File(FileSpec::new(
                "client/README.md",
                TemplateContent::Parameterized(TemplateSource::Static("# {{PROJECT_NAME}}")),
            )))
            .add_node(TemplateNode::File(FileSpec::new(
                "server/boot/root.js",
                TemplateContent::Literal(TemplateSource::Static("// {{PROJECT_NAME}}")),
            )))
            .build()
            .unwrap();

        let structure = SimpleRenderer::new()
            .render(&template, &RenderContext::new("notes-app"), Path::new("out"))
            .unwrap();

        assert_eq!(structure.root(), Path::new("out"));
        assert_eq!(
            structure.file("client/README.md").unwrap().content,
            "# notes-app"
        );
        assert_eq!(
            structure.file("server/boot/root.js").unwrap().content,
            "// {{PROJECT_NAME}}"
        );
        assert_eq!(structure.directories().count(), 1);
    }
}
