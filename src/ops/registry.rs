use std::collections::HashMap;
use std::sync::Arc;

use super::base::Operation;
use crate::error::SpecError;

/// Registry of operations by name, queried by the spec parser.
///
/// Lookup resolves the primary name first, then aliases. Registration is
/// first-wins on alias collision. The registry is read-only after
/// construction and safe to share across lookups.
pub struct OperationRegistry {
    primary: HashMap<String, Arc<dyn Operation>>,
    aliases: HashMap<String, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// A registry with every built-in operation registered.
    pub fn with_builtins() -> Self {
        let mut registry = OperationRegistry::empty();
        registry.register(Arc::new(super::echo::Echo));
        registry.register(Arc::new(super::define_context::DefineContext));
        registry.register(Arc::new(super::add_file::AddFile));
        registry.register(Arc::new(super::find_files::FindFiles));
        registry.register(Arc::new(super::search_and_replace::SearchAndReplace));
        registry.register(Arc::new(super::edit_json::EditJson));
        registry.register(Arc::new(super::edit_yaml::EditYaml));
        registry.register(Arc::new(super::shell::Shell));
        registry.register(Arc::new(super::subtask::Subtask));
        registry.register(Arc::new(super::prompt::Prompt));
        registry
    }

    pub fn empty() -> Self {
        OperationRegistry {
            primary: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register an operation under its primary name and aliases.
    pub fn register(&mut self, op: Arc<dyn Operation>) {
        for alias in op.aliases() {
            self.aliases
                .entry(alias.to_string())
                .or_insert_with(|| op.clone());
        }
        self.primary.insert(op.name().to_string(), op);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operation>> {
        self.primary.get(name).or_else(|| self.aliases.get(name))
    }

    /// Resolve a spec `name` field, failing with the offending name.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Operation>, SpecError> {
        self.get(name).cloned().ok_or_else(|| SpecError::UnknownOperation {
            name: name.to_string(),
        })
    }

    /// Registered primary names, sorted. Used for generated help text.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.primary.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// (name, summary) pairs for generated help text, sorted by name.
    pub fn summaries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .primary
            .iter()
            .map(|(name, op)| (name.as_str(), op.summary()))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
