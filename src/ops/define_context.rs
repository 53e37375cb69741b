use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::base::{Operation, OutputDelta};
use crate::core::{Context, ContextValue};
use crate::error::OperationError;
use crate::template::TemplateRenderer;

/// Operation to add variables to the task context.
///
/// String definitions are rendered as templates, in declaration order, and
/// each rendered value is immediately available to the definitions after it.
pub struct DefineContext;

#[derive(Debug, Deserialize)]
struct Input {
    context_defs: IndexMap<String, Value>,
}

impl Operation for DefineContext {
    fn name(&self) -> &'static str {
        "define_context"
    }

    fn summary(&self) -> &'static str {
        "Publish literal or templated variable definitions into the context."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let mut renderer = TemplateRenderer::from_context(context);

        // Non-string definitions are usable by templates right away.
        for (key, value) in &input.context_defs {
            if !value.is_string() {
                renderer.add_variable(key.clone(), value.clone());
            }
        }

        let mut delta = OutputDelta::new();
        for (key, value) in input.context_defs {
            let resolved = match value {
                Value::String(template) => {
                    let rendered = renderer.render_str(&template)?;
                    renderer.add_variable(key.clone(), Value::String(rendered.clone()));
                    Value::String(rendered)
                }
                other => other,
            };
            delta.insert(key, ContextValue::from_value(&resolved));
        }
        Ok(delta)
    }
}
