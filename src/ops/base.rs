//! Operation contract and step execution lifecycle.
//!
//! [`Operation`] is the pluggable unit of work: a registered implementation
//! declares its name, optional aliases, and class-level config defaults, and
//! binds its declared input shape out of the context it is handed.
//! [`CompiledStep`] is one parsed step of a task: an operation bound to step
//! literals, a resolved [`OperationConfig`], and a description. The lifecycle
//! (input remapping/namespacing, literal merge, bind check, run, output
//! remapping/namespacing) lives here and is identical for every operation.

use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::config::OperationConfig;
use crate::core::{Context, ContextValue};
use crate::error::{OperationError, TaskError};

/// The variables an operation publishes back into the context.
/// An empty delta means the operation produced no output.
pub type OutputDelta = IndexMap<String, ContextValue>;

/// Trait for operation execution. Each operation type implements this.
pub trait Operation: Send + Sync {
    /// Primary name used in spec `name` fields.
    fn name(&self) -> &'static str;

    /// Alternate names resolving to this operation.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line description for generated help text.
    fn summary(&self) -> &'static str {
        ""
    }

    /// Config fields applied when a step's `opconfig` leaves them unset.
    fn default_config(&self) -> OperationConfig {
        OperationConfig::default()
    }

    /// Check that the context binds into the declared input shape.
    ///
    /// Called before [`run`](Operation::run); a failure here means `run` is
    /// never invoked and the step has had no side effect.
    fn check_input(&self, context: &Context) -> Result<(), OperationError>;

    /// Execute the operation against its bound input view.
    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError>;
}

impl std::fmt::Debug for dyn Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation").field("name", &self.name()).finish()
    }
}

/// One parsed step: an operation bound to its step literals, resolved config,
/// and description. Immutable once built; executing a step consumes and
/// returns a context, never the step itself.
#[derive(Clone)]
pub struct CompiledStep {
    op: Arc<dyn Operation>,
    description: String,
    local_context: IndexMap<String, ContextValue>,
    config: OperationConfig,
}

impl CompiledStep {
    pub fn new(
        op: Arc<dyn Operation>,
        description: impl Into<String>,
        local_context: IndexMap<String, ContextValue>,
        config: OperationConfig,
    ) -> Self {
        CompiledStep {
            op,
            description: description.into(),
            local_context,
            config,
        }
    }

    pub fn operation_name(&self) -> &'static str {
        self.op.name()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn config(&self) -> &OperationConfig {
        &self.config
    }

    pub fn local_context(&self) -> &IndexMap<String, ContextValue> {
        &self.local_context
    }

    /// Run the full lifecycle against `context`, returning the threaded
    /// context for the next step.
    pub fn execute(&self, context: Context) -> Result<Context, TaskError> {
        let scoped = match self.scoped_input(&context) {
            Ok(scoped) => scoped,
            Err(err) => return Err(self.fail(err)),
        };
        if let Err(err) = self.op.check_input(&scoped) {
            return Err(self.fail(err));
        }
        match self.op.run(&scoped) {
            Ok(delta) => {
                if !self.description.is_empty() && self.config.displays_description() {
                    info!("✓ {}", self.description);
                }
                Ok(self.merge_output(context, delta))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// pre_run: input remapping, namespace projection, literal merge.
    fn scoped_input(&self, context: &Context) -> Result<Context, OperationError> {
        let mut vars = context.vars().clone();
        if let Some(mapping) = &self.config.input_mapping {
            vars = remap_keys(vars, mapping);
        }
        if let Some(namespace) = &self.config.input_namespace {
            vars = match vars.get(namespace) {
                Some(ContextValue::Object(map)) => map.clone(),
                None => IndexMap::new(),
                Some(other) => {
                    return Err(OperationError::Binding(format!(
                        "input namespace '{namespace}' does not hold a mapping: {other}"
                    )))
                }
            };
        }
        for (key, value) in &self.local_context {
            vars.insert(key.clone(), value.clone());
        }
        Ok(context.derive(vars))
    }

    /// post_run: namespace wrapping, output remapping, merge into the
    /// pre-step context. An empty delta leaves the context untouched.
    fn merge_output(&self, mut context: Context, delta: OutputDelta) -> Context {
        if delta.is_empty() {
            return context;
        }
        let mut delta = delta;
        if let Some(namespace) = &self.config.output_namespace {
            let mut wrapped = IndexMap::new();
            wrapped.insert(namespace.clone(), ContextValue::Object(delta));
            delta = wrapped;
        }
        if let Some(mapping) = &self.config.output_mapping {
            delta = remap_keys(delta, mapping);
        }
        context.merge(delta);
        context
    }

    fn fail(&self, err: OperationError) -> TaskError {
        if !self.description.is_empty() {
            error!("✗ {}", self.description);
        }
        TaskError::Operation {
            step: self.description.clone(),
            source: err,
        }
    }
}

impl PartialEq for CompiledStep {
    /// Structural equality: two steps are interchangeable iff they run the
    /// same operation with the same literals, config, and description.
    fn eq(&self, other: &Self) -> bool {
        self.op.name() == other.op.name()
            && self.description == other.description
            && self.local_context == other.local_context
            && self.config == other.config
    }
}

impl std::fmt::Debug for CompiledStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledStep")
            .field("operation", &self.op.name())
            .field("description", &self.description)
            .field("local_context", &self.local_context)
            .field("config", &self.config)
            .finish()
    }
}

/// Rename keys per `mapping`, preserving order. A flat rename: entries whose
/// source key is absent are skipped (remapping never invents keys).
pub(crate) fn remap_keys(
    vars: IndexMap<String, ContextValue>,
    mapping: &IndexMap<String, String>,
) -> IndexMap<String, ContextValue> {
    for source in mapping.keys() {
        if !vars.contains_key(source) {
            debug!("remap entry '{source}' skipped: source key absent");
        }
    }
    vars.into_iter()
        .map(|(key, value)| match mapping.get(&key) {
            Some(renamed) => (renamed.clone(), value),
            None => (key, value),
        })
        .collect()
}
