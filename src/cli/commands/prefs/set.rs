use crate::{
    cli::{
        Command, CommandResult,
        formatting::{format_key, format_value},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    shared::{self, SharedStore},
    value::{DynamicSpec, Preferences},
};

use super::utils::{parse_key, parse_value, required_arg};

/// Stores a static value, overwriting any existing entry.
///
/// A key that was dynamic becomes static again.
pub struct SetCommand {
    store: SharedStore,
}

impl SetCommand {
    /// Creates a new SetCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for SetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let key = parse_key(required_arg(args, 0, "key", "set")?)?;
        let value = parse_value(required_arg(args, 1, "value", "set")?);

        let mut store = shared::write(&self.store);
        let dynamic = store
            .dynamic()
            .contains_key(&key)
            .then(|| DynamicSpec::from([(key.clone(), None)]));

        let output = format!("Set {} = {}", format_key(&key), format_value(&value));
        store.update_preferences(Preferences::from([(key, value)]), dynamic)?;
        Ok(output)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            description: "Store a static preference value".to_string(),
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
                    description: "New value (literal, or plain text)".to_string(),
                    required: true,
                    variadic: false,
                    value_type: ArgType::Literal,
                },
            ],
            examples: vec![
                "prefstore prefs set theme dark".to_string(),
                "prefstore prefs set retries 3".to_string(),
                "prefstore prefs set recent \"['a.txt', 'b.txt']\"".to_string(),
            ],
        }
    }
}
