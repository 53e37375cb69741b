use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::settings::ExecutionSettings;
use super::value::ContextValue;
use crate::error::OperationError;

/// Name under which spec documents and templates refer to the run settings.
///
/// The settings themselves are carried structurally on [`Context`], not as an
/// ordinary variable: they cannot be shadowed by a step output, dropped by
/// namespacing, or leaked upward from a sub-task.
pub const SETTINGS_KEY: &str = "execution_settings";

/// The ordered key-value mapping threaded through a task run.
///
/// Owned by exactly one `Task::execute` invocation at a time. Operations see
/// derived contexts (remapped, projected, merged with step literals) and
/// publish output deltas that the framework merges back in.
#[derive(Debug, Clone)]
pub struct Context {
    settings: Arc<ExecutionSettings>,
    vars: IndexMap<String, ContextValue>,
}

impl Context {
    pub fn new(settings: ExecutionSettings) -> Self {
        Context {
            settings: Arc::new(settings),
            vars: IndexMap::new(),
        }
    }

    pub fn with_settings(settings: Arc<ExecutionSettings>) -> Self {
        Context {
            settings,
            vars: IndexMap::new(),
        }
    }

    pub fn with_vars(mut self, vars: IndexMap<String, ContextValue>) -> Self {
        self.vars = vars;
        self
    }

    /// A context sharing this run's settings but holding different variables.
    /// Used for per-step input views and sub-task seeds.
    pub fn derive(&self, vars: IndexMap<String, ContextValue>) -> Context {
        Context {
            settings: self.settings.clone(),
            vars,
        }
    }

    pub fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    pub fn settings_arc(&self) -> Arc<ExecutionSettings> {
        self.settings.clone()
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.vars.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ContextValue) {
        self.vars.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(|k| k.as_str())
    }

    pub fn vars(&self) -> &IndexMap<String, ContextValue> {
        &self.vars
    }

    /// Merge a delta into the context. Delta keys overwrite existing keys,
    /// except that mapping values merge into existing mappings, preserving
    /// their keys: two steps publishing under the same output namespace
    /// accumulate instead of clobbering each other.
    pub fn merge(&mut self, delta: IndexMap<String, ContextValue>) {
        merge_nested(&mut self.vars, delta);
    }

    /// The variables as a JSON object, in insertion order.
    pub fn to_value(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        Value::Object(map)
    }

    /// Bind the variables into an operation's declared input shape.
    ///
    /// A missing required key or a mistyped value is a binding error naming
    /// the offending field; no operation side effect has happened yet.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, OperationError> {
        serde_json::from_value(self.to_value()).map_err(|e| OperationError::Binding(e.to_string()))
    }

    /// Check that the variables bind into `T`, discarding the result.
    pub fn check<T: DeserializeOwned>(&self) -> Result<(), OperationError> {
        self.bind::<T>().map(|_| ())
    }
}

fn merge_nested(target: &mut IndexMap<String, ContextValue>, delta: IndexMap<String, ContextValue>) {
    for (key, value) in delta {
        match (target.get_mut(&key), value) {
            (Some(ContextValue::Object(existing)), ContextValue::Object(incoming)) => {
                merge_nested(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
