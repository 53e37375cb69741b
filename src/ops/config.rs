use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-step behavior knobs, declared under a step's `opconfig` mapping.
///
/// Every field is tri-state: unset fields inherit the operation class
/// default, and fields unset in both layers fall back to the framework
/// defaults (empty mappings, no namespaces, display on). Unknown keys inside
/// `opconfig` are rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mapping: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mapping: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_description: Option<bool>,
}

impl OperationConfig {
    /// Layered resolution: `overrides` wins for every field it specifies,
    /// `defaults` fills the rest. Neither input is mutated.
    pub fn resolve(defaults: &OperationConfig, overrides: &OperationConfig) -> OperationConfig {
        OperationConfig {
            input_mapping: overrides
                .input_mapping
                .clone()
                .or_else(|| defaults.input_mapping.clone()),
            output_mapping: overrides
                .output_mapping
                .clone()
                .or_else(|| defaults.output_mapping.clone()),
            input_namespace: overrides
                .input_namespace
                .clone()
                .or_else(|| defaults.input_namespace.clone()),
            output_namespace: overrides
                .output_namespace
                .clone()
                .or_else(|| defaults.output_namespace.clone()),
            display_description: overrides
                .display_description
                .or(defaults.display_description),
        }
    }

    /// Whether the step's description should be echoed on success.
    pub fn displays_description(&self) -> bool {
        self.display_description.unwrap_or(true)
    }
}
