//! # Quickstrap — A Declarative Scaffolding Task Runner
//!
//! `quickstrap` executes project-scaffolding tasks described by a declarative
//! spec: an ordered `steps` mapping in which each step invokes a registered
//! operation with configuration. The runner compiles the spec into a
//! pipeline and threads a shared key-value context through it, with support
//! for:
//!
//! - **Built-in operations**: echo, define_context, add_file, find_files,
//!   search_and_replace, edit_json, edit_yaml, shell, subtask, and prompt.
//! - **Context plumbing**: per-step input/output key remapping and
//!   namespacing, literal overrides, and typed input binding checked before
//!   any side effect.
//! - **Layered step config**: framework defaults ← operation-class defaults
//!   ← per-step `opconfig`, resolved field by field.
//! - **Templating**: minijinja rendering with strict undefined behavior for
//!   message strings, file templates, and prompt defaults.
//! - **Sub-tasks**: an operation can compile and execute a nested task with
//!   derived settings, merging the child's variables upward.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quickstrap::{compile_task, Context, ExecutionSettings, OperationRegistry, SpecFormat};
//!
//! let yaml = std::fs::read_to_string("quickstrap.yml").unwrap();
//! let registry = OperationRegistry::with_builtins();
//! let context = Context::new(ExecutionSettings::new("spec_dir", "."));
//! let task = compile_task(&yaml, SpecFormat::Yaml, &registry, context).unwrap();
//! let final_context = task.execute().unwrap();
//! println!("{}", final_context.to_value());
//! ```
//!
//! Execution is single-threaded and fully synchronous: each step completes
//! before the next begins, and a failing step aborts the run with no
//! rollback.

pub mod core;
pub mod error;
pub mod ops;
pub mod repository;
pub mod spec;
pub mod template;

pub use crate::core::{Context, ContextValue, ExecutionSettings, Task, SETTINGS_KEY};
pub use crate::error::{OpResult, OperationError, SpecError, SpecResult, TaskError, TaskResult};
pub use crate::ops::{CompiledStep, Operation, OperationConfig, OperationRegistry, OutputDelta};
pub use crate::repository::{LocalSource, ResolvedSpec, SpecSource};
pub use crate::spec::{compile_steps, compile_task, parse_document, SpecFormat, TaskDocument};
pub use crate::template::{TemplateRenderer, DEFAULT_TEMPLATE_VARIABLE_PREFIX};
