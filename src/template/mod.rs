//! Template rendering for operations.
//!
//! A fresh minijinja environment is built per render with strict undefined
//! behavior: referencing a variable that was never defined is a template
//! error, not an empty string. Template variables are exposed nested under a
//! prefix (so a spec's templates read `{{ quickstrap.project_name }}`), and a
//! `_meta_` entry carries the resolved run directories.

use indexmap::IndexMap;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::core::{Context, ContextValue};
use crate::error::OperationError;

/// Context key holding the variables exposed to templates.
pub const TEMPLATE_VARIABLES_KEY: &str = "template_variables";
/// Context key overriding the namespace templates see variables under.
pub const TEMPLATE_VARIABLE_PREFIX_KEY: &str = "template_variable_prefix";
/// Default template variable namespace.
pub const DEFAULT_TEMPLATE_VARIABLE_PREFIX: &str = "quickstrap";
/// Variable carrying run metadata (source/target dirs) into templates.
pub const TEMPLATE_VARIABLE_META_PREFIX: &str = "_meta_";

/// Renders template strings and template files against a run's variables.
pub struct TemplateRenderer {
    source_dir: PathBuf,
    prefix: String,
    variables: IndexMap<String, Value>,
}

impl TemplateRenderer {
    /// Build a renderer from an operation's input view: variables from the
    /// `template_variables` key, prefix from `template_variable_prefix`,
    /// file lookup rooted at the run's source directory.
    pub fn from_context(context: &Context) -> Self {
        let settings = context.settings();
        let mut variables = IndexMap::new();
        variables.insert(
            TEMPLATE_VARIABLE_META_PREFIX.to_string(),
            json!({
                "source_dir": settings.source_dir,
                "target_dir": settings.target_dir,
            }),
        );
        if let Some(ContextValue::Object(map)) = context.get(TEMPLATE_VARIABLES_KEY) {
            for (key, value) in map {
                variables.insert(key.clone(), value.to_value());
            }
        }
        let prefix = context
            .get(TEMPLATE_VARIABLE_PREFIX_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_TEMPLATE_VARIABLE_PREFIX)
            .to_string();
        TemplateRenderer {
            source_dir: settings.source_dir.clone(),
            prefix,
            variables,
        }
    }

    /// Make a variable available to subsequent renders.
    pub fn add_variable(&mut self, key: impl Into<String>, value: Value) {
        self.variables.insert(key.into(), value);
    }

    pub fn variables(&self) -> &IndexMap<String, Value> {
        &self.variables
    }

    /// Render an inline template string.
    pub fn render_str(&self, template: &str) -> Result<String, OperationError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        let vars: serde_json::Map<String, Value> = self
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut root = serde_json::Map::new();
        root.insert(self.prefix.clone(), Value::Object(vars));
        let ctx = minijinja::Value::from_serialize(Value::Object(root));
        Ok(env.render_str(template, ctx)?)
    }

    /// Render a template file, resolved against the source directory unless
    /// absolute.
    pub fn render_file(&self, template_path: impl AsRef<Path>) -> Result<String, OperationError> {
        let template_path = template_path.as_ref();
        let path = if template_path.is_absolute() {
            template_path.to_path_buf()
        } else {
            self.source_dir.join(template_path)
        };
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            OperationError::Template(format!("cannot read template {}: {e}", path.display()))
        })?;
        self.render_str(&raw)
    }
}
