use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use super::base::{Operation, OutputDelta};
use crate::core::Context;
use crate::error::OperationError;
use crate::template::TemplateRenderer;

/// Operation to add a rendered file to a project.
///
/// `template_path` resolves against the run's source directory,
/// `target_path` against the target directory. Parent directories are
/// created as needed. Skipped under dry-run.
pub struct AddFile;

#[derive(Debug, Deserialize)]
struct Input {
    target_path: PathBuf,
    template_path: PathBuf,
}

impl Operation for AddFile {
    fn name(&self) -> &'static str {
        "add_file"
    }

    fn summary(&self) -> &'static str {
        "Render a template file and write it into the target directory."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let renderer = TemplateRenderer::from_context(context);
        let rendered = renderer.render_file(&input.template_path)?;

        let target = context.settings().resolve_target(&input.target_path);
        if context.settings().dry_run {
            info!("Dry run: skipping write to {}", target.display());
            return Ok(OutputDelta::new());
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, rendered)?;
        info!("Wrote file to {}", target.display());
        Ok(OutputDelta::new())
    }
}
