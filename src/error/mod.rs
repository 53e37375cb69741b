//! Error types for the task runner.
//!
//! - [`SpecError`] — Errors raised while parsing a task specification.
//! - [`OperationError`] — Errors raised while binding or running a single operation.
//! - [`TaskError`] — Top-level errors for task execution.

pub mod operation_error;
pub mod spec_error;
pub mod task_error;

pub use operation_error::OperationError;
pub use spec_error::SpecError;
pub use task_error::TaskError;

/// Convenience alias for task-level results.
pub type TaskResult<T> = Result<T, TaskError>;
/// Convenience alias for operation-level results.
pub type OpResult<T> = Result<T, OperationError>;
/// Convenience alias for parse-time results.
pub type SpecResult<T> = Result<T, SpecError>;
