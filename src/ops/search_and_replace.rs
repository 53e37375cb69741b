use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use super::base::{Operation, OutputDelta};
use crate::core::Context;
use crate::error::OperationError;

/// Operation for replacing text in a file, literally or by regex.
/// Skipped under dry-run.
pub struct SearchAndReplace;

#[derive(Debug, Deserialize)]
struct Input {
    file_path: PathBuf,
    search: String,
    replace: String,
    #[serde(default)]
    use_regex: bool,
}

impl Operation for SearchAndReplace {
    fn name(&self) -> &'static str {
        "search_and_replace"
    }

    fn summary(&self) -> &'static str {
        "Replace text in a file, literally or via regex."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let file_path = context.settings().resolve_target(&input.file_path);

        let content = std::fs::read_to_string(&file_path)?;
        let replaced = if input.use_regex {
            let regex = Regex::new(&input.search)?;
            regex.replace_all(&content, input.replace.as_str()).into_owned()
        } else {
            content.replace(&input.search, &input.replace)
        };

        if context.settings().dry_run {
            info!(
                "Dry run: skipping search_and_replace on {}",
                file_path.display()
            );
            return Ok(OutputDelta::new());
        }
        std::fs::write(&file_path, replaced)?;
        Ok(OutputDelta::new())
    }
}
