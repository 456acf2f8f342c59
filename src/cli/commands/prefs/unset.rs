use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_key,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    shared::{self, SharedStore},
};

use super::utils::{parse_key, required_arg};

/// Removes a preference together with its dynamic declaration.
pub struct UnsetCommand {
    store: SharedStore,
}

impl UnsetCommand {
    /// Creates a new UnsetCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for UnsetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let key = parse_key(required_arg(args, 0, "key", "unset")?)?;

        let mut store = shared::write(&self.store);
        let mut preferences = store.preferences();
        if preferences.remove(&key).is_none() {
            return Err(CliError::InvalidArguments(format!(
                "No preference {}",
                format_key(&key)
            )));
        }

        store.set_preferences(preferences, None)?;
        Ok(format!("Removed {}", format_key(&key)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "unset".to_string(),
            description: "Remove a preference".to_string(),
            category: "prefs".to_string(),
            args: vec![CommandArg {
                name: "key".to_string(),
                description: "Preference key".to_string(),
                required: true,
                variadic: false,
                value_type: ArgType::Key,
            }],
            examples: vec!["prefstore prefs unset theme".to_string()],
        }
    }
}
