//! End-to-end pipeline tests: spec text in, final context out.

use quickstrap::{
    compile_steps, compile_task, parse_document, Context, ExecutionSettings, OperationRegistry,
    SpecFormat, Task,
};
use serde_json::json;

fn registry() -> OperationRegistry {
    OperationRegistry::with_builtins()
}

fn context() -> Context {
    Context::new(ExecutionSettings::new("spec_dir", "."))
}

#[test]
fn execution_order_matches_declaration_order() {
    let yaml = r#"
steps:
  "First":
    name: define_context
    context_defs:
      a: 1
  "Second":
    name: define_context
    context_defs:
      b: 2
  "Third":
    name: define_context
    context_defs:
      c: 3
"#;
    let document = parse_document(yaml, SpecFormat::Yaml).unwrap();
    let steps = compile_steps(&document, &registry()).unwrap();
    let descriptions: Vec<&str> = steps.iter().map(|s| s.description()).collect();
    assert_eq!(descriptions, vec!["First", "Second", "Third"]);
}

#[test]
fn each_step_adds_its_output_key() {
    let yaml = r#"
steps:
  "Define a":
    name: define_context
    context_defs:
      a: 1
  "Define b":
    name: define_context
    context_defs:
      b: 2
  "Define c":
    name: define_context
    context_defs:
      c: 3
"#;
    let mut initial = context();
    initial.insert("seed", quickstrap::ContextValue::Integer(0));
    let task = compile_task(yaml, SpecFormat::Yaml, &registry(), initial).unwrap();
    let final_context = task.execute().unwrap();
    assert_eq!(
        final_context.to_value(),
        json!({"seed": 0, "a": 1, "b": 2, "c": 3})
    );
}

#[test]
fn echo_pipeline_leaves_no_parse_residue() {
    let spec = r#"{"steps": {"Step A": {"name": "echo", "message": "hi"}}}"#;
    let initial = context();
    let settings_before = initial.settings().clone();

    let task = compile_task(spec, SpecFormat::Json, &registry(), initial).unwrap();
    let final_context = task.execute().unwrap();

    assert_eq!(final_context.settings(), &settings_before);
    assert!(final_context.is_empty());
    assert!(!final_context.contains_key("name"));
    assert!(!final_context.contains_key("message"));
}

#[test]
fn parsing_twice_yields_equal_pipelines() {
    let yaml = r#"
steps:
  "Say hi":
    name: echo
    message: "hi there"
    opconfig:
      display_description: false
"#;
    let parse = || {
        compile_steps(
            &parse_document(yaml, SpecFormat::Yaml).unwrap(),
            &registry(),
        )
        .unwrap()
    };
    assert_eq!(parse(), parse());
}

#[test]
fn failing_step_aborts_without_later_steps_running() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = r#"
steps:
  "Fail":
    name: shell
    cmd: "exit 9"
  "Never runs":
    name: add_file
    template_path: "missing.j2"
    target_path: "never.txt"
"#;
    let settings = ExecutionSettings::new(dir.path(), dir.path());
    let task = compile_task(yaml, SpecFormat::Yaml, &registry(), Context::new(settings)).unwrap();
    let err = task.execute().unwrap_err();
    assert!(err.to_string().contains("Fail"));
    assert!(!dir.path().join("never.txt").exists());
}

#[test]
fn task_is_reusable_after_execute() {
    let yaml = r#"
steps:
  "Define":
    name: define_context
    context_defs:
      value: 1
"#;
    let task: Task = compile_task(yaml, SpecFormat::Yaml, &registry(), context()).unwrap();
    let first = task.execute().unwrap();
    let second = task.execute().unwrap();
    assert_eq!(first.to_value(), second.to_value());
    // The task's own initial context is untouched by execution.
    assert!(task.context().is_empty());
}

#[test]
fn add_file_end_to_end() {
    let spec_dir = tempfile::tempdir().unwrap();
    let target_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        spec_dir.path().join("config.yml.j2"),
        "project: {{ quickstrap.project_name }}\n",
    )
    .unwrap();

    let yaml = r#"
steps:
  "Name the project":
    name: define_context
    context_defs:
      project_name: "starter"
    opconfig:
      output_namespace: template_variables
  "Write config file":
    name: add_file
    target_path: "config.yml"
    template_path: "config.yml.j2"
"#;
    let settings = ExecutionSettings::new(spec_dir.path(), target_dir.path());
    let task = compile_task(yaml, SpecFormat::Yaml, &registry(), Context::new(settings)).unwrap();
    task.execute().unwrap();

    assert_eq!(
        std::fs::read_to_string(target_dir.path().join("config.yml")).unwrap(),
        "project: starter\n"
    );
}
