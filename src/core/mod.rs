pub mod context;
pub mod settings;
pub mod task;
pub mod value;

pub use context::{Context, SETTINGS_KEY};
pub use settings::ExecutionSettings;
pub use task::Task;
pub use value::ContextValue;
