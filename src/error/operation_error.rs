use thiserror::Error;

/// Operation-level errors
#[derive(Debug, Error)]
pub enum OperationError {
    /// The merged input view could not be bound into the operation's declared
    /// input shape. Raised before `run`, so the step has had no side effect.
    #[error("Context binding error: {0}")]
    Binding(String),
    #[error("Operation failed: {0}")]
    Failed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Subprocess exited with code {code}: {command}")]
    Subprocess { command: String, code: i32 },
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl OperationError {
    /// True for bind-phase failures, false for runtime failures.
    pub fn is_binding(&self) -> bool {
        matches!(self, OperationError::Binding(_))
    }
}

impl From<minijinja::Error> for OperationError {
    fn from(e: minijinja::Error) -> Self {
        OperationError::Template(e.to_string())
    }
}

impl From<regex::Error> for OperationError {
    fn from(e: regex::Error) -> Self {
        OperationError::Failed(format!("invalid regex: {e}"))
    }
}
