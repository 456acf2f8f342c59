use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_key,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    shared::{self, SharedStore},
    value::{DynamicSpec, Preferences, Value},
};

use super::utils::{parse_key, required_arg};

/// Stores an expression that is evaluated every time the key is read.
pub struct DynamicCommand {
    store: SharedStore,
}

impl DynamicCommand {
    /// Creates a new DynamicCommand over the shared store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Command for DynamicCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let key = parse_key(required_arg(args, 0, "key", "dynamic")?)?;
        let expression = required_arg(args, 1, "expression", "dynamic")?.to_string();
        let modules: Vec<String> = args.iter().skip(2).cloned().collect();

        let output = if modules.is_empty() {
            format!("Stored {} = {expression} (static, no modules)", format_key(&key))
        } else {
            format!(
                "Stored dynamic {} = {expression} using {}",
                format_key(&key),
                modules.join(", ")
            )
        };

        shared::write(&self.store).update_preferences(
            Preferences::from([(key.clone(), Value::Str(expression))]),
            Some(DynamicSpec::from([(key, Some(modules))])),
        )?;
        Ok(output)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "dynamic".to_string(),
            description: "Store an expression evaluated on every read".to_string(),
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
                    name: "expression".to_string(),
                    description: "Expression to evaluate".to_string(),
                    required: true,
                    variadic: false,
                    value_type: ArgType::Expression,
                },
                CommandArg {
                    name: "module".to_string(),
                    description: "Modules the expression uses".to_string(),
                    required: false,
                    variadic: true,
                    value_type: ArgType::Module,
                },
            ],
            examples: vec![
                "prefstore prefs dynamic session_id 'str(uuid.uuid4())' uuid".to_string(),
                "prefstore prefs dynamic cwd 'os.getcwd()' os".to_string(),
            ],
        }
    }
}
