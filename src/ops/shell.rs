use serde::Deserialize;
use std::process::Command;
use tracing::{info, warn};

use super::base::{Operation, OutputDelta};
use crate::core::{Context, ContextValue};
use crate::error::OperationError;
use crate::template::TemplateRenderer;

/// Operation to run an arbitrary shell command.
///
/// A string command runs through `sh -c`; a list runs directly as argv.
/// Dry-run only warns: the framework cannot know whether the command
/// modifies the filesystem, so it runs regardless.
pub struct Shell;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandSpec {
    Line(String),
    Argv(Vec<String>),
}

fn default_echo_output() -> bool {
    true
}

fn default_output_processor() -> String {
    "strip".to_string()
}

#[derive(Debug, Deserialize)]
struct Input {
    cmd: CommandSpec,
    #[serde(default = "default_echo_output")]
    echo_output: bool,
    #[serde(default)]
    ignore_error_code: bool,
    /// `strip` trims surrounding whitespace from captured output; `noop`
    /// keeps it verbatim.
    #[serde(default = "default_output_processor")]
    output_processor: String,
    #[serde(default)]
    output_var: Option<String>,
}

impl Operation for Shell {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn summary(&self) -> &'static str {
        "Run a shell command, optionally capturing its output."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        let input: Input = context.bind()?;
        match input.output_processor.as_str() {
            "strip" | "noop" => Ok(()),
            other => Err(OperationError::Binding(format!(
                "unknown output_processor '{other}', expected 'strip' or 'noop'"
            ))),
        }
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let renderer = TemplateRenderer::from_context(context);

        let (mut command, display_cmd) = match &input.cmd {
            CommandSpec::Line(line) => {
                let line = renderer.render_str(line)?;
                let mut command = Command::new("sh");
                command.arg("-c").arg(&line);
                (command, line)
            }
            CommandSpec::Argv(args) => {
                let args: Vec<String> = args
                    .iter()
                    .map(|arg| renderer.render_str(arg))
                    .collect::<Result<_, _>>()?;
                let (program, rest) = args.split_first().ok_or_else(|| {
                    OperationError::Failed("shell command list is empty".into())
                })?;
                let mut command = Command::new(program);
                command.args(rest);
                (command, args.join(" "))
            }
        };
        command.current_dir(&context.settings().target_dir);

        info!("Running command: {}", display_cmd);
        if context.settings().dry_run {
            warn!(
                "Running with dry-run enabled, but shell operation will run regardless of \
                 whether the command modifies the filesystem."
            );
        }

        let output = command.output()?;
        if !input.ignore_error_code && !output.status.success() {
            return Err(OperationError::Subprocess {
                command: display_cmd,
                code: output.status.code().unwrap_or(-1),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let processed = match input.output_processor.as_str() {
            "noop" => stdout.to_string(),
            _ => stdout.trim().to_string(),
        };
        if input.echo_output && !processed.is_empty() {
            info!("{processed}");
        }

        let mut delta = OutputDelta::new();
        if let Some(output_var) = input.output_var {
            delta.insert(output_var, ContextValue::String(processed));
        }
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExecutionSettings;
    use serde_json::json;

    fn context_with(vars: serde_json::Value) -> Context {
        let mut ctx = Context::new(ExecutionSettings::new(".", "."));
        if let serde_json::Value::Object(map) = vars {
            for (k, v) in map {
                ctx.insert(k, ContextValue::from_value(&v));
            }
        }
        ctx
    }

    #[test]
    fn test_string_command_captures_output() {
        let ctx = context_with(json!({
            "cmd": "printf 'scaffolded\\n'",
            "output_var": "result"
        }));
        let delta = Shell.run(&ctx).unwrap();
        assert_eq!(delta.get("result").unwrap().to_display_string(), "scaffolded");
    }

    #[test]
    fn test_argv_command() {
        let ctx = context_with(json!({
            "cmd": ["printf", "a b"],
            "output_var": "result"
        }));
        let delta = Shell.run(&ctx).unwrap();
        assert_eq!(delta.get("result").unwrap().to_display_string(), "a b");
    }

    #[test]
    fn test_noop_processor_keeps_whitespace() {
        let ctx = context_with(json!({
            "cmd": "printf 'padded\\n'",
            "output_processor": "noop",
            "output_var": "result"
        }));
        let delta = Shell.run(&ctx).unwrap();
        assert_eq!(delta.get("result").unwrap().to_display_string(), "padded\n");
    }

    #[test]
    fn test_nonzero_exit_fails() {
        let ctx = context_with(json!({"cmd": "exit 3"}));
        let err = Shell.run(&ctx).unwrap_err();
        assert!(matches!(
            err,
            OperationError::Subprocess { code: 3, .. }
        ));
    }

    #[test]
    fn test_ignore_error_code() {
        let ctx = context_with(json!({"cmd": "exit 3", "ignore_error_code": true}));
        assert!(Shell.run(&ctx).is_ok());
    }

    #[test]
    fn test_no_output_var_means_empty_delta() {
        let ctx = context_with(json!({"cmd": "true"}));
        assert!(Shell.run(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_output_processor_rejected_at_bind() {
        let ctx = context_with(json!({"cmd": "true", "output_processor": "upper"}));
        let err = Shell.check_input(&ctx).unwrap_err();
        assert!(err.is_binding());
    }

    #[test]
    fn test_command_renders_template_variables() {
        let ctx = context_with(json!({
            "cmd": "printf '%s' '{{ quickstrap.word }}'",
            "output_var": "result",
            "template_variables": {"word": "rendered"}
        }));
        let delta = Shell.run(&ctx).unwrap();
        assert_eq!(delta.get("result").unwrap().to_display_string(), "rendered");
    }
}
