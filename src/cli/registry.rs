use std::collections::HashMap;

use crate::shared::SharedStore;

use super::{
    CliError, Command,
    commands::prefs,
    formatting::{format_category, format_command, format_description, format_header, format_usage},
    types::CommandMetadata,
};

/// Registry for CLI commands organized by category.
///
/// ```text
/// registry
/// └── prefs
///     ├── get
///     ├── set
///     ├── default
///     ├── dynamic
///     ├── unset
///     ├── show
///     ├── path
///     └── modules
/// ```
pub struct CommandRegistry {
    /// Nested HashMap structure: category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    store: SharedStore,
}

impl CommandRegistry {
    /// Creates a new empty command registry over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self {
            categories: HashMap::new(),
            store,
        }
    }

    /// Registers a command in the specified category.
    ///
    /// The command's name (from its metadata) is the key within that
    /// category. A command with the same name is replaced.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or command does
    /// not exist, `CliError::InvalidArguments` if the argument count is
    /// wrong, and otherwise whatever the command returns.
    pub fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find command '{command_name}'"))
        })?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args)
    }

    /// Lists all registered commands organized by category, sorted
    /// alphabetically.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Metadata of one registered command.
    pub fn metadata(&self, category: &str, command_name: &str) -> Option<CommandMetadata> {
        self.categories
            .get(category)
            .and_then(|commands| commands.get(command_name))
            .map(|command| command.metadata())
    }

    /// Styled listing of every command with its usage line.
    pub fn help_text(&self) -> String {
        let mut lines = vec![
            format_header("prefstore - persistent preferences"),
            String::new(),
            format_usage("Usage: prefstore [OPTIONS] <category> <command> [args..]"),
        ];

        for (category, commands) in self.list_commands() {
            lines.push(String::new());
            lines.push(format_category(&category));
            for name in commands {
                let Some(metadata) = self.metadata(&category, &name) else {
                    continue;
                };
                lines.push(format!(
                    "  {} {}",
                    format_command(&usage(&metadata)),
                    format_description(&metadata.description)
                ));
            }
        }

        lines.join("\n")
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();
        let variadic = metadata.args.last().is_some_and(|arg| arg.variadic);

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if !variadic && args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers all available CLI commands in their respective categories.
    pub fn register_all_commands(&mut self) {
        let store = self.store.clone();
        prefs::register_commands(self, store);
    }
}

fn usage(metadata: &CommandMetadata) -> String {
    let mut parts = vec![metadata.name.clone()];
    for arg in &metadata.args {
        let dots = if arg.variadic { ".." } else { "" };
        if arg.required {
            parts.push(format!("<{}{dots}>", arg.name));
        } else {
            parts.push(format!("[{}{dots}]", arg.name));
        }
    }
    parts.join(" ")
}
