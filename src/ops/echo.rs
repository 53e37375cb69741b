use serde::Deserialize;

use super::base::{Operation, OutputDelta};
use crate::core::Context;
use crate::error::OperationError;
use crate::template::TemplateRenderer;

/// Operation to echo a message to the console.
pub struct Echo;

#[derive(Debug, Deserialize)]
struct Input {
    message: String,
}

impl Operation for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn summary(&self) -> &'static str {
        "Render a message template and print it to the console."
    }

    fn check_input(&self, context: &Context) -> Result<(), OperationError> {
        context.check::<Input>()
    }

    fn run(&self, context: &Context) -> Result<OutputDelta, OperationError> {
        let input: Input = context.bind()?;
        let renderer = TemplateRenderer::from_context(context);
        println!("{}", renderer.render_str(&input.message)?);
        Ok(OutputDelta::new())
    }
}
