use crate::{
    cli::{
        Command, CommandResult,
        formatting::{format_command, format_description},
        types::CommandMetadata,
    },
    eval::{BUILTINS, STRING_METHODS},
    shared::{self, SharedStore},
};

/// Lists the modules dynamic expressions can import, plus the builtins.
pub struct ModulesCommand {
    store: SharedStore,
}

impl ModulesCommand {
    /// Creates a new ModulesCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for ModulesCommand {
    fn execute(&self, _args: &[String]) -> CommandResult {
        let store = shared::read(&self.store);
        let mut lines: Vec<String> = store
            .modules()
            .iter()
            .map(|module| {
                format!(
                    "{} {}",
                    format_command(module.name()),
                    format_description(&module.members().join(", "))
                )
            })
            .collect();

        lines.push(format!(
            "{} {}",
            format_command("builtins"),
            format_description(&BUILTINS.join(", "))
        ));
        lines.push(format!(
            "{} {}",
            format_command("str methods"),
            format_description(&STRING_METHODS.join(", "))
        ));

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "modules".to_string(),
            description: "List modules available to dynamic expressions".to_string(),
            category: "prefs".to_string(),
            args: vec![],
            examples: vec!["prefstore prefs modules".to_string()],
        }
    }
}
