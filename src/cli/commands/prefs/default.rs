use crate::{
    cli::{
        Command, CommandResult,
        formatting::{format_key, format_value},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    shared::{self, SharedStore},
    value::Preferences,
};

use super::utils::{parse_key, parse_value, required_arg};

/// Stores a value only if the key does not exist yet.
pub struct DefaultCommand {
    store: SharedStore,
}

impl DefaultCommand {
    /// Creates a new DefaultCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for DefaultCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let key = parse_key(required_arg(args, 0, "key", "default")?)?;
        let value = parse_value(required_arg(args, 1, "value", "default")?);

        let mut store = shared::write(&self.store);
        if store.contains_key(&key) {
            return Ok(format!("{} already set, left unchanged", format_key(&key)));
        }

        let output = format!("Set {} = {}", format_key(&key), format_value(&value));
        store.set_default(Preferences::from([(key, value)]), None)?;
        Ok(output)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "default".to_string(),
            description: "Store a value unless the key already exists".to_string(),
            category: "prefs".to_string(),
            args: vec![
                CommandArg {
                    name: "key".to_string(),
                    description: "Preference key".to_string(),
                    required: true,
                    variadic: false,
                    value_type: ArgType::Key,
                },
                CommandArg {
                    name: "value".to_string(),
                    description: "Value used when the key is missing".to_string(),
                    required: true,
                    variadic: false,
                    value_type: ArgType::Literal,
                },
            ],
            examples: vec!["prefstore prefs default theme light".to_string()],
        }
    }
}
