use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_value,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    shared::{self, SharedStore},
    value::Value,
};

use super::utils::{parse_key, parse_value, required_arg};

/// Prints a preference, evaluating it when it is dynamic.
///
/// # Example Usage
///
/// ```bash
/// prefstore prefs get theme
/// prefstore prefs get 12345
/// prefstore prefs get missing fallback
/// ```
pub struct GetCommand {
    store: SharedStore,
}

impl GetCommand {
    /// Creates a new GetCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for GetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let key = parse_key(required_arg(args, 0, "key", "get")?)?;
        let default = args.get(1).map_or(Value::None, |text| parse_value(text));

        let value = shared::read(&self.store).get(&key, default)?;
        Ok(format_value(&value))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Print a preference value".to_string(),
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
                    name: "default".to_string(),
                    description: "Printed when the key does not exist".to_string(),
                    required: false,
                    variadic: false,
                    value_type: ArgType::Literal,
                },
            ],
            examples: vec![
                "prefstore prefs get theme".to_string(),
                "prefstore prefs get 12345".to_string(),
                "prefstore prefs get missing fallback".to_string(),
            ],
        }
    }
}
