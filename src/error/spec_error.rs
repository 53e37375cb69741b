use thiserror::Error;

/// Parse-time errors
///
/// Everything in this enum is raised before any operation executes.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Spec parse error: {0}")]
    Parse(String),
    #[error("Spec has no `steps` mapping")]
    MissingSteps,
    #[error("Step '{step}' is missing an operation name: {body}")]
    MissingOperationName { step: String, body: String },
    #[error("Could not find operation named '{name}'")]
    UnknownOperation { name: String },
    #[error("Malformed step '{step}': {detail}: {body}")]
    MalformedStep {
        step: String,
        detail: String,
        body: String,
    },
    #[error("Obsolete spec usage: {found}. {hint}")]
    Obsolete { found: String, hint: String },
}

impl From<serde_json::Error> for SpecError {
    fn from(e: serde_json::Error) -> Self {
        SpecError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_display() {
        assert_eq!(
            SpecError::Parse("x".into()).to_string(),
            "Spec parse error: x"
        );
        assert_eq!(
            SpecError::MissingSteps.to_string(),
            "Spec has no `steps` mapping"
        );
        assert_eq!(
            SpecError::UnknownOperation {
                name: "does-not-exist".into()
            }
            .to_string(),
            "Could not find operation named 'does-not-exist'"
        );
    }

    #[test]
    fn test_missing_operation_name_echoes_body() {
        let err = SpecError::MissingOperationName {
            step: "Add greeting".into(),
            body: r#"{"message": "hi"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Add greeting"));
        assert!(msg.contains("message"));
    }

    #[test]
    fn test_obsolete_carries_hint() {
        let err = SpecError::Obsolete {
            found: "top-level `operations` list".into(),
            hint: "Use a `steps` mapping instead".into(),
        };
        assert!(err.to_string().contains("Use a `steps` mapping instead"));
    }
}
