pub mod base;
pub mod config;
pub mod registry;

pub mod add_file;
pub mod define_context;
pub mod echo;
pub mod edit_json;
pub mod edit_yaml;
pub mod find_files;
pub mod prompt;
pub mod search_and_replace;
pub mod shell;
pub mod subtask;

pub use base::{CompiledStep, Operation, OutputDelta};
pub use config::OperationConfig;
pub use registry::OperationRegistry;
