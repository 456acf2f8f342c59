use crate::{
    cli::{Command, CommandResult, types::CommandMetadata},
    shared::{self, SharedStore},
};

/// Prints the path of the backing document.
pub struct PathCommand {
    store: SharedStore,
}

impl PathCommand {
    /// Creates a new PathCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for PathCommand {
    fn execute(&self, _args: &[String]) -> CommandResult {
        Ok(shared::read(&self.store).fullpath().display().to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "path".to_string(),
            description: "Print the preferences file path".to_string(),
            category: "prefs".to_string(),
            args: vec![],
            examples: vec!["prefstore prefs path".to_string()],
        }
    }
}
