//! Top-level task errors.

use super::{OperationError, SpecError};
use thiserror::Error;

/// Task-level errors
///
/// The closed surface an embedding tool matches on: every failure the
/// framework raises arrives here either as a parse-time [`SpecError`] or as
/// an [`OperationError`] tagged with the failing step's description.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("Step '{step}' failed: {source}")]
    Operation {
        step: String,
        #[source]
        source: OperationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_wraps_step_description() {
        let err = TaskError::Operation {
            step: "Write config file".into(),
            source: OperationError::Failed("disk full".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Write config file"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_task_error_from_spec_error() {
        let err: TaskError = SpecError::MissingSteps.into();
        assert!(matches!(err, TaskError::Spec(_)));
        assert_eq!(err.to_string(), "Spec has no `steps` mapping");
    }
}
