//! Spec parser: converts raw YAML/JSON/TOML text into an ordered pipeline of
//! [`CompiledStep`]s.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use super::schema::{StepSchema, TaskDocument};
use crate::core::{Context, ContextValue, Task};
use crate::error::SpecError;
use crate::ops::{CompiledStep, OperationConfig, OperationRegistry};

/// Supported spec input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    /// YAML format (`.yaml` / `.yml`).
    Yaml,
    /// JSON format (`.json`).
    Json,
    /// TOML format (`.toml`).
    Toml,
}

impl SpecFormat {
    /// Derive the format from a file extension.
    pub fn from_path(path: &Path) -> Option<SpecFormat> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(SpecFormat::Yaml),
            Some("json") => Some(SpecFormat::Json),
            Some("toml") => Some(SpecFormat::Toml),
            _ => None,
        }
    }
}

/// Step fields that older specs placed at the top level of a step body.
/// They now live under `opconfig`; seeing one flat is an obsolete-usage
/// error rather than a silent literal override.
const LEGACY_OPCONFIG_FIELDS: &[&str] = &[
    "input_mapping",
    "output_mapping",
    "input_namespace",
    "output_namespace",
    "display_description",
];

/// Parse spec content into a task document.
pub fn parse_document(content: &str, format: SpecFormat) -> Result<TaskDocument, SpecError> {
    match format {
        SpecFormat::Yaml => {
            serde_yml::from_str(content).map_err(|e| SpecError::Parse(e.to_string()))
        }
        SpecFormat::Json => {
            serde_json::from_str(content).map_err(|e| SpecError::Parse(e.to_string()))
        }
        SpecFormat::Toml => {
            // Parse TOML → toml::Value, then convert to serde_json::Value,
            // and finally deserialize into TaskDocument. The two-step
            // conversion keeps step bodies typed as serde_json::Value.
            let toml_val: toml::Value =
                toml::from_str(content).map_err(|e| SpecError::Parse(e.to_string()))?;
            let json_val = toml_value_to_json(toml_val);
            serde_json::from_value(json_val).map_err(|e| SpecError::Parse(e.to_string()))
        }
    }
}

/// Compile a task document into its ordered operation pipeline.
///
/// The output preserves the `steps` mapping's iteration order, which is
/// execution order.
pub fn compile_steps(
    document: &TaskDocument,
    registry: &OperationRegistry,
) -> Result<Vec<CompiledStep>, SpecError> {
    if document.operations.is_some() {
        return Err(SpecError::Obsolete {
            found: "top-level `operations` list".into(),
            hint: "Define a `steps` mapping of step descriptions to operation bodies instead"
                .into(),
        });
    }
    let steps = document.steps.as_ref().ok_or(SpecError::MissingSteps)?;
    steps
        .iter()
        .map(|(step_key, body)| compile_step(step_key, body, registry))
        .collect()
}

/// Convenience wrapper: parse, compile, and pair with an initial context.
pub fn compile_task(
    content: &str,
    format: SpecFormat,
    registry: &OperationRegistry,
    context: Context,
) -> Result<Task, SpecError> {
    let document = parse_document(content, format)?;
    let steps = compile_steps(&document, registry)?;
    Ok(Task::new(context, steps))
}

fn compile_step(
    step_key: &str,
    body: &Value,
    registry: &OperationRegistry,
) -> Result<CompiledStep, SpecError> {
    let schema: StepSchema =
        serde_json::from_value(body.clone()).map_err(|e| SpecError::MalformedStep {
            step: step_key.to_string(),
            detail: e.to_string(),
            body: compact(body),
        })?;

    for legacy in LEGACY_OPCONFIG_FIELDS {
        if schema.extra.contains_key(*legacy) {
            return Err(SpecError::Obsolete {
                found: format!("top-level `{legacy}` in step '{step_key}'"),
                hint: format!("Nest `{legacy}` under the step's `opconfig` mapping"),
            });
        }
    }

    let name = schema.name.as_deref().ok_or_else(|| SpecError::MissingOperationName {
        step: step_key.to_string(),
        body: compact(body),
    })?;
    let op = registry.lookup(name)?;

    let config = OperationConfig::resolve(
        &op.default_config(),
        &schema.opconfig.clone().unwrap_or_default(),
    );
    let local_context = build_local_context(&schema);
    let description = schema
        .description
        .clone()
        .unwrap_or_else(|| step_key.to_string());

    Ok(CompiledStep::new(op, description, local_context, config))
}

/// Free-form sibling keys and the nested `local_context` mapping both become
/// literal context overrides; the flat sibling form wins on collision.
fn build_local_context(schema: &StepSchema) -> IndexMap<String, ContextValue> {
    let mut local: IndexMap<String, ContextValue> = schema
        .local_context
        .iter()
        .map(|(k, v)| (k.clone(), ContextValue::from_value(v)))
        .collect();
    for (key, value) in &schema.extra {
        local.insert(key.clone(), ContextValue::from_value(value));
    }
    local
}

fn compact(body: &Value) -> String {
    serde_json::to_string(body).unwrap_or_else(|_| body.to_string())
}

/// Convert a [`toml::Value`] into a [`serde_json::Value`].
///
/// TOML has no null type, so `Datetime` values are stringified.
fn toml_value_to_json(val: toml::Value) -> Value {
    match val {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            Value::Array(arr.into_iter().map(toml_value_to_json).collect())
        }
        toml::Value::Table(tbl) => {
            let map: serde_json::Map<String, Value> = tbl
                .into_iter()
                .map(|(k, v)| (k, toml_value_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}
