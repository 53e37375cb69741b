use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use super::base::{Operation, OutputDelta};
use super::edit_json::merge_values;
use crate::core::Context;
use crate::error::OperationError;

/// Operation to edit a YAML file by merging data into its existing contents.
/// The document is round-tripped through a JSON value, so comments and
/// formatting are not preserved. Skipped under dry-run.
pub struct EditYaml;

#[derive(Debug, Deserialize)]
struct Input {
    file_path: PathBuf,
    merge_data: Value,
}

impl Operation for EditYaml {
    fn name(&self) -> &'static str {
        "edit_yaml"
    }

    fn summary(&self) -> &'static str {
        "Merge data into an existing YAML file."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let file_path = context.settings().resolve_target(&input.file_path);

        let raw = std::fs::read_to_string(&file_path)?;
        let mut data: Value = serde_yml::from_str(&raw).map_err(|e| {
            OperationError::Failed(format!("invalid YAML in {}: {e}", file_path.display()))
        })?;
        merge_values(&mut data, input.merge_data);

        if context.settings().dry_run {
            info!("Dry run: skipping edit of {}", file_path.display());
            return Ok(OutputDelta::new());
        }
        let rendered = serde_yml::to_string(&data)
            .map_err(|e| OperationError::Failed(format!("cannot serialize YAML: {e}")))?;
        std::fs::write(&file_path, rendered)?;
        Ok(OutputDelta::new())
    }
}
