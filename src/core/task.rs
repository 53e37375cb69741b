use tracing::debug;

use super::context::Context;
use crate::error::TaskError;
use crate::ops::CompiledStep;

/// One fully parsed pipeline: an initial context plus its ordered steps.
///
/// `execute` folds the context through the steps strictly left to right and
/// returns the context after the last one. There is no rollback: when a step
/// fails, the contexts produced so far are discarded and the error
/// propagates to the caller.
#[derive(Debug)]
pub struct Task {
    context: Context,
    steps: Vec<CompiledStep>,
}

impl Task {
    pub fn new(context: Context, steps: Vec<CompiledStep>) -> Self {
        Task { context, steps }
    }

    pub fn steps(&self) -> &[CompiledStep] {
        &self.steps
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn execute(&self) -> Result<Context, TaskError> {
        let mut context = self.context.clone();
        for (index, step) in self.steps.iter().enumerate() {
            debug!(
                step = index + 1,
                total = self.steps.len(),
                operation = step.operation_name(),
                "running step"
            );
            context = step.execute(context)?;
        }
        Ok(context)
    }
}
