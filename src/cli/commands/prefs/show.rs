use crate::{
    cli::{
        Command, CommandResult,
        formatting::{format_dynamic, format_key},
        types::CommandMetadata,
    },
    codec::render_literal,
    shared::{self, SharedStore},
};

/// Lists every stored entry. Dynamic entries show their expression and modules.
pub struct ShowCommand {
    store: SharedStore,
}

impl ShowCommand {
    /// Creates a new ShowCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for ShowCommand {
    fn execute(&self, _args: &[String]) -> CommandResult {
        let store = shared::read(&self.store);
        let preferences = store.preferences();
        if preferences.is_empty() {
            return Ok(format!("No preferences stored in {}", store.fullpath().display()));
        }

        let dynamic = store.dynamic();
        let lines: Vec<String> = preferences
            .iter()
            .map(|(key, value)| {
                let line = format!("{} = {}", format_key(key), render_literal(value));
                match dynamic.get(key) {
                    Some(Some(modules)) if !modules.is_empty() => {
                        format!("{line} {}", format_dynamic(&format!("[dynamic: {}]", modules.join(", "))))
                    }
                    _ => line,
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "show".to_string(),
            description: "List all stored preferences".to_string(),
            category: "prefs".to_string(),
            args: vec![],
            examples: vec!["prefstore prefs show".to_string()],
        }
    }
}
