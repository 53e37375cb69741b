pub mod parser;
pub mod schema;

pub use parser::{compile_steps, compile_task, parse_document, SpecFormat};
pub use schema::{StepSchema, TaskDocument};
