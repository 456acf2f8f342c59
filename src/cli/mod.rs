//! Command-line interface over a shared preference store.
//!
//! Commands are organized by category and generate their help text from
//! metadata. Every command holds a handle to the same process-wide store.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;


pub use commands::prefs::{parse_key, parse_value};
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};
