use glob_match::glob_match;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

use super::base::{Operation, OutputDelta};
use crate::core::{Context, ContextValue};
use crate::error::OperationError;

/// Operation for finding files, optionally filtered by a path glob and by a
/// content regex, publishing the matching paths as a list.
pub struct FindFiles;

fn default_output_name() -> String {
    "matching_files".to_string()
}

#[derive(Debug, Deserialize)]
struct Input {
    #[serde(default)]
    regex: Option<String>,
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default = "default_output_name")]
    output_name: String,
    /// Glob applied to each path before any content search, e.g. `"**/*.json"`.
    #[serde(default)]
    path_filter: Option<String>,
    /// Regex flags: any of `IGNORECASE`, `MULTILINE`, `DOTALL`.
    #[serde(default)]
    regex_flags: Vec<String>,
}

impl Operation for FindFiles {
    fn name(&self) -> &'static str {
        "find_files"
    }

    fn summary(&self) -> &'static str {
        "Collect file paths matching a glob and/or content regex."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let root = match &input.directory {
            Some(dir) => context.settings().resolve_target(dir),
            None => context.settings().target_dir.clone(),
        };
        let regex = input
            .regex
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| build_regex(r, &input.regex_flags))
            .transpose()?;

        let mut matching_files = Vec::new();
        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if let Some(filter) = &input.path_filter {
                if !glob_match(filter, &path.to_string_lossy()) {
                    continue;
                }
            }
            if let Some(regex) = &regex {
                let contents = match std::fs::read_to_string(path) {
                    Ok(contents) => contents,
                    Err(e) => {
                        debug!("failed to read file {}: {e}", path.display());
                        continue;
                    }
                };
                if !regex.is_match(&contents) {
                    continue;
                }
            }
            matching_files.push(ContextValue::Path(path.to_path_buf()));
        }

        let mut delta = OutputDelta::new();
        delta.insert(input.output_name, ContextValue::List(matching_files));
        Ok(delta)
    }
}

fn build_regex(pattern: &str, flags: &[String]) -> Result<Regex, OperationError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags {
        match flag.as_str() {
            "IGNORECASE" => {
                builder.case_insensitive(true);
            }
            "MULTILINE" => {
                builder.multi_line(true);
            }
            "DOTALL" => {
                builder.dot_matches_new_line(true);
            }
            other => debug!("ignoring unsupported regex flag '{other}'"),
        }
    }
    Ok(builder.build()?)
}
