use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::ops::OperationConfig;

/// Top-level task document.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDocument {
    /// Ordered mapping of step description → step body. Iteration order is
    /// execution order.
    #[serde(default)]
    pub steps: Option<IndexMap<String, Value>>,
    /// Legacy flat operation list. Kept in the schema so the parser can
    /// reject it with a migration hint instead of a generic parse error.
    #[serde(default)]
    pub operations: Option<Value>,
    /// Unrecognized top-level fields, ignored.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One step body: the reserved framework fields, with all remaining fields
/// captured as literal context overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct StepSchema {
    /// Operation name. The only required field; its absence is a parse
    /// error, never a silent skip.
    #[serde(default)]
    pub name: Option<String>,
    /// Overrides the step's mapping key as the logged description.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub opconfig: Option<OperationConfig>,
    #[serde(default)]
    pub local_context: IndexMap<String, Value>,
    /// Free-form sibling keys; merged into `local_context` with the flat
    /// form winning on collision.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}
