use dialoguer::{Confirm, Input as TextInput, Select};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::base::{Operation, OutputDelta};
use super::config::OperationConfig;
use crate::core::{Context, ContextValue};
use crate::error::OperationError;
use crate::template::TemplateRenderer;

const DEFAULT_INTRO: &str = "Please enter the following information:";

/// Operation to prompt the user for input values.
///
/// Responses publish under the `template_variables` namespace by default,
/// so later steps can render them; each response is also visible to the
/// templated defaults of the prompts after it.
pub struct Prompt;

#[derive(Debug, Clone, Deserialize)]
struct InputDef {
    name: String,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    choices: Option<Vec<Value>>,
    /// Name of a template variable holding the choice list.
    #[serde(default)]
    choices_from: Option<String>,
}

fn default_introduction() -> String {
    DEFAULT_INTRO.to_string()
}

#[derive(Debug, Deserialize)]
struct Input {
    inputs: Vec<InputDef>,
    #[serde(default = "default_introduction")]
    introduction: String,
}

impl Operation for Prompt {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["prompt_user"]
    }

    fn summary(&self) -> &'static str {
        "Interactively collect named values into the template variables."
    }

    fn default_config(&self) -> OperationConfig {
        OperationConfig {
            display_description: Some(false),
            output_namespace: Some("template_variables".to_string()),
            ..Default::default()
        }
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        if context.contains_key("output_dict_name") {
            return Err(OperationError::Binding(
                "prompt operation no longer supports `output_dict_name`. \
                 Use `opconfig.output_namespace` instead."
                    .into(),
            ));
        }
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        info!("{}", input.introduction);

        let mut renderer = TemplateRenderer::from_context(context);
        let mut responses = OutputDelta::new();
        for def in &input.inputs {
            let choices = resolve_choices(def, &renderer)?;
            let default = resolve_default(def, &renderer)?;
            let response = read_user_value(&def.name, default, choices)?;
            // Later defaults can reference this response.
            renderer.add_variable(def.name.clone(), response.clone());
            responses.insert(def.name.clone(), ContextValue::from_value(&response));
        }
        Ok(responses)
    }
}

/// Resolve the choice list, following `choices_from` into the template
/// variables. An unresolvable or empty reference is an error: prompting
/// against an empty list cannot mean anything.
fn resolve_choices(
    def: &InputDef,
    renderer: &TemplateRenderer,
) -> Result<Option<Vec<Value>>, OperationError> {
    if let Some(variable_name) = &def.choices_from {
        let choices = renderer
            .variables()
            .get(variable_name)
            .and_then(|v| v.as_array())
            .filter(|arr| !arr.is_empty())
            .cloned()
            .ok_or_else(|| {
                OperationError::Prompt(format!(
                    "input '{}' defined with `choices_from='{variable_name}'` not found in \
                     template variables",
                    def.name
                ))
            })?;
        return Ok(Some(choices));
    }
    Ok(def.choices.clone())
}

/// String defaults are templates; everything else passes through.
fn resolve_default(
    def: &InputDef,
    renderer: &TemplateRenderer,
) -> Result<Option<Value>, OperationError> {
    match &def.default {
        Some(Value::String(template)) => Ok(Some(Value::String(renderer.render_str(template)?))),
        other => Ok(other.clone()),
    }
}

fn read_user_value(
    name: &str,
    default: Option<Value>,
    choices: Option<Vec<Value>>,
) -> Result<Value, OperationError> {
    if let Some(choices) = choices {
        let items: Vec<String> = choices
            .iter()
            .map(|c| ContextValue::from_value(c).to_display_string())
            .collect();
        let initial = default
            .as_ref()
            .and_then(|d| choices.iter().position(|c| c == d))
            .unwrap_or(0);
        let index = Select::new()
            .with_prompt(name)
            .items(&items)
            .default(initial)
            .interact()
            .map_err(|e| OperationError::Prompt(e.to_string()))?;
        return Ok(choices[index].clone());
    }
    if let Some(Value::Bool(default)) = default {
        let answer = Confirm::new()
            .with_prompt(name)
            .default(default)
            .interact()
            .map_err(|e| OperationError::Prompt(e.to_string()))?;
        return Ok(Value::Bool(answer));
    }
    let mut prompt = TextInput::<String>::new().with_prompt(name);
    if let Some(default) = default {
        prompt = prompt.default(ContextValue::from_value(&default).to_display_string());
    }
    let answer = prompt
        .interact_text()
        .map_err(|e| OperationError::Prompt(e.to_string()))?;
    Ok(Value::String(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExecutionSettings;
    use serde_json::json;

    fn renderer_with(vars: Value) -> TemplateRenderer {
        let mut ctx = Context::new(ExecutionSettings::new("src", "dst"));
        ctx.insert("template_variables", ContextValue::from_value(&vars));
        TemplateRenderer::from_context(&ctx)
    }

    fn def(raw: Value) -> InputDef {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_default_config_hides_description_and_namespaces_output() {
        let config = Prompt.default_config();
        assert_eq!(config.display_description, Some(false));
        assert_eq!(config.output_namespace.as_deref(), Some("template_variables"));
    }

    #[test]
    fn test_choices_from_resolves_template_variable() {
        let renderer = renderer_with(json!({"licenses": ["MIT", "BSD"]}));
        let choices = resolve_choices(
            &def(json!({"name": "license", "choices_from": "licenses"})),
            &renderer,
        )
        .unwrap();
        assert_eq!(choices, Some(vec![json!("MIT"), json!("BSD")]));
    }

    #[test]
    fn test_choices_from_missing_variable_fails() {
        let renderer = renderer_with(json!({}));
        let err = resolve_choices(
            &def(json!({"name": "license", "choices_from": "licenses"})),
            &renderer,
        )
        .unwrap_err();
        assert!(err.to_string().contains("licenses"));
    }

    #[test]
    fn test_string_default_renders_template() {
        let renderer = renderer_with(json!({"name": "demo"}));
        let default = resolve_default(
            &def(json!({"name": "greeting", "default": "Hello {{ quickstrap.name }}!"})),
            &renderer,
        )
        .unwrap();
        assert_eq!(default, Some(json!("Hello demo!")));
    }

    #[test]
    fn test_removed_output_dict_name_rejected_at_bind() {
        let mut ctx = Context::new(ExecutionSettings::new("src", "dst"));
        ctx.insert("inputs", ContextValue::List(vec![]));
        ctx.insert("output_dict_name", "vars".into());
        let err = Prompt.check_input(&ctx).unwrap_err();
        assert!(err.is_binding());
        assert!(err.to_string().contains("output_namespace"));
    }
}
