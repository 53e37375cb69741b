use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use super::base::{Operation, OutputDelta};
use super::registry::OperationRegistry;
use crate::core::Context;
use crate::error::OperationError;
use crate::repository::{LocalSource, SpecSource};
use crate::spec::compile_task;

/// Operation for running a nested task defined by another spec file.
///
/// The child runs with derived settings (its source directory is the
/// subtask file's directory) and a fresh context. The child's final
/// variables merge upward; its settings never do, so the parent's
/// directories stay untouched.
pub struct Subtask;

#[derive(Debug, Deserialize)]
struct Input {
    file_path: PathBuf,
}

impl Operation for Subtask {
    fn name(&self) -> &'static str {
        "subtask"
    }

    fn summary(&self) -> &'static str {
        "Run a nested task defined by another spec file."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let path = context.settings().resolve_source(&input.file_path);
        if !path.is_file() {
            return Err(OperationError::Failed(format!(
                "subtask spec does not exist: {}",
                path.display()
            )));
        }

        let resolved = LocalSource::new(&path)
            .resolve()
            .map_err(|e| OperationError::Failed(e.to_string()))?;
        debug!("running subtask from {}", path.display());

        let settings = context.settings().derive(resolved.base_dir);
        let child_context = Context::new(settings);
        let registry = OperationRegistry::with_builtins();
        let task = compile_task(&resolved.content, resolved.format, &registry, child_context)
            .map_err(|e| OperationError::Failed(e.to_string()))?;
        let final_context = task
            .execute()
            .map_err(|e| OperationError::Failed(e.to_string()))?;

        Ok(final_context.vars().clone())
    }
}
