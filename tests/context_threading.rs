//! Context plumbing tests: what operations see, and what they leave behind.
//!
//! Uses probe operations registered alongside the built-ins, mirroring how
//! embedders extend the registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use quickstrap::{
    compile_steps, compile_task, parse_document, Context, ContextValue, ExecutionSettings,
    Operation, OperationError, OperationRegistry, OutputDelta, SpecFormat,
};
use serde_json::{json, Value};

/// Records every input view it is shown and publishes a fixed delta.
struct Probe {
    name: &'static str,
    calls: AtomicUsize,
    seen: Mutex<Vec<Value>>,
    output: Vec<(&'static str, i64)>,
}

impl Probe {
    fn new(name: &'static str, output: Vec<(&'static str, i64)>) -> Arc<Self> {
        Arc::new(Probe {
            name,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            output,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_seen(&self) -> Value {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl Operation for Probe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check_input(&self, _context: &Context) -> Result<(), OperationError> {
        Ok(())
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(context.to_value());
        Ok(self
            .output
            .iter()
            .map(|(k, v)| (k.to_string(), ContextValue::Integer(*v)))
            .collect())
    }
}

fn registry_with(probes: &[Arc<Probe>]) -> OperationRegistry {
    let mut registry = OperationRegistry::with_builtins();
    for probe in probes {
        registry.register(probe.clone());
    }
    registry
}

fn initial_context() -> Context {
    Context::new(ExecutionSettings::new("spec_dir", "."))
}

#[test]
fn input_mapping_renames_the_run_view() {
    let probe = Probe::new("probe", vec![]);
    let spec = json!({
        "steps": {
            "Observe": {
                "name": "probe",
                "opconfig": {"input_mapping": {"a": "b"}}
            }
        }
    })
    .to_string();
    let mut context = initial_context();
    context.insert("a", ContextValue::Integer(1));

    compile_task(&spec, SpecFormat::Json, &registry_with(&[probe.clone()]), context)
        .unwrap()
        .execute()
        .unwrap();

    assert_eq!(probe.last_seen(), json!({"b": 1}));
}

#[test]
fn output_mapping_renames_published_keys() {
    let probe = Probe::new("probe", vec![("b", 1)]);
    let spec = json!({
        "steps": {
            "Publish": {
                "name": "probe",
                "opconfig": {"output_mapping": {"b": "a"}}
            }
        }
    })
    .to_string();

    let final_context = compile_task(
        &spec,
        SpecFormat::Json,
        &registry_with(&[probe]),
        initial_context(),
    )
    .unwrap()
    .execute()
    .unwrap();

    assert_eq!(final_context.to_value(), json!({"a": 1}));
}

#[test]
fn namespace_roundtrip_between_steps() {
    let writer = Probe::new("writer", vec![("x", 1)]);
    let reader = Probe::new("reader", vec![]);
    let spec = json!({
        "steps": {
            "Write": {
                "name": "writer",
                "opconfig": {"output_namespace": "ns"}
            },
            "Read": {
                "name": "reader",
                "opconfig": {"input_namespace": "ns"}
            }
        }
    })
    .to_string();

    let final_context = compile_task(
        &spec,
        SpecFormat::Json,
        &registry_with(&[writer, reader.clone()]),
        initial_context(),
    )
    .unwrap()
    .execute()
    .unwrap();

    // The writer's delta landed wrapped in the threaded context...
    assert_eq!(final_context.to_value(), json!({"ns": {"x": 1}}));
    // ...and the reader recovered the sub-mapping as its whole view.
    assert_eq!(reader.last_seen(), json!({"x": 1}));
}

#[test]
fn missing_name_fails_before_any_operation_runs() {
    let probe = Probe::new("probe", vec![]);
    let spec = json!({
        "steps": {
            "Fine": {"name": "probe"},
            "Broken": {"message": "no name here"}
        }
    })
    .to_string();

    let document = parse_document(&spec, SpecFormat::Json).unwrap();
    let err = compile_steps(&document, &registry_with(&[probe.clone()])).unwrap_err();

    assert!(err.to_string().contains("Broken"));
    assert_eq!(probe.calls(), 0);
}

#[test]
fn unknown_operation_error_names_the_operation() {
    let spec = json!({"steps": {"Nope": {"name": "does-not-exist"}}}).to_string();
    let document = parse_document(&spec, SpecFormat::Json).unwrap();
    let err = compile_steps(&document, &OperationRegistry::with_builtins()).unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn local_context_overrides_threaded_keys_for_one_step() {
    let first = Probe::new("first", vec![]);
    let second = Probe::new("second", vec![]);
    let spec = json!({
        "steps": {
            "Override": {"name": "first", "flavor": "local"},
            "Plain": {"name": "second"}
        }
    })
    .to_string();
    let mut context = initial_context();
    context.insert("flavor", "threaded".into());

    compile_task(
        &spec,
        SpecFormat::Json,
        &registry_with(&[first.clone(), second.clone()]),
        context,
    )
    .unwrap()
    .execute()
    .unwrap();

    // The literal override is scoped to its own step's view.
    assert_eq!(first.last_seen(), json!({"flavor": "local"}));
    assert_eq!(second.last_seen(), json!({"flavor": "threaded"}));
}

#[test]
fn binding_failure_reports_step_and_field() {
    let yaml = r#"
steps:
  "Greet":
    name: echo
"#;
    let err = compile_task(
        yaml,
        SpecFormat::Yaml,
        &OperationRegistry::with_builtins(),
        initial_context(),
    )
    .unwrap()
    .execute()
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Greet"));
    assert!(msg.contains("message"));
}
