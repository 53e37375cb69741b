use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use super::base::{Operation, OutputDelta};
use crate::core::Context;
use crate::error::OperationError;

/// Operation to edit a JSON file by merging data into its existing contents.
/// Nested mappings merge recursively; everything else is overwritten.
/// Skipped under dry-run.
pub struct EditJson;

fn default_indent() -> usize {
    4
}

#[derive(Debug, Deserialize)]
struct Input {
    file_path: PathBuf,
    merge_data: Value,
    #[serde(default = "default_indent")]
    indent: usize,
}

impl Operation for EditJson {
    fn name(&self) -> &'static str {
        "edit_json"
    }

    fn summary(&self) -> &'static str {
        "Merge data into an existing JSON file."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let file_path = context.settings().resolve_target(&input.file_path);

        let raw = std::fs::read_to_string(&file_path)?;
        let mut data: Value = serde_json::from_str(&raw)
            .map_err(|e| OperationError::Failed(format!("invalid JSON in {}: {e}", file_path.display())))?;
        merge_values(&mut data, input.merge_data);

        if context.settings().dry_run {
            info!("Dry run: skipping edit of {}", file_path.display());
            return Ok(OutputDelta::new());
        }
        std::fs::write(&file_path, to_indented_json(&data, input.indent)?)?;
        Ok(OutputDelta::new())
    }
}

/// Merge `overlay` into `base`. Object values merge recursively, preserving
/// keys of `base` that `overlay` does not mention.
pub(crate) fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn to_indented_json(data: &Value, indent: usize) -> Result<String, OperationError> {
    let indent_bytes = b" ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(data, &mut serializer)
        .map_err(|e| OperationError::Failed(format!("cannot serialize JSON: {e}")))?;
    String::from_utf8(out).map_err(|e| OperationError::Failed(e.to_string()))
}
