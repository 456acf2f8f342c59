//! Preference commands.
mod default;
mod dynamic;
mod get;
mod modules;
mod path;
mod set;
mod show;
mod unset;
mod utils;

pub use default::DefaultCommand;
pub use dynamic::DynamicCommand;
pub use get::GetCommand;
pub use modules::ModulesCommand;
pub use path::PathCommand;
pub use set::SetCommand;
pub use show::ShowCommand;
pub use unset::UnsetCommand;
pub use utils::{parse_key, parse_value};

use crate::{cli::CommandRegistry, shared::SharedStore};

/// Category all preference commands are registered under.
pub const CATEGORY_NAME: &str = "prefs";

/// Registers all preference commands with the command registry.
pub fn register_commands(registry: &mut CommandRegistry, store: SharedStore) {
    registry.register_command(CATEGORY_NAME, Box::new(GetCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(SetCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(DefaultCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(DynamicCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(UnsetCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ShowCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(PathCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ModulesCommand::new(store)));
}
