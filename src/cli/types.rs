use thiserror::Error;

use crate::PrefError;

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid arguments were provided to a command.
    ///
    /// Returned when argument validation fails, such as missing required
    /// arguments, too many arguments, or a key that does not exist.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The preference store rejected or failed the operation.
    #[error("Preferences error: {0}")]
    Preferences(#[from] PrefError),
}

/// Type alias for command execution results.
///
/// All CLI commands return either their output as a String or a CliError
/// describing what went wrong.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "key", "value").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// Whether this argument may be repeated. Only the last argument can be.
    pub variadic: bool,

    /// The expected type of this argument for help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    /// A preference key: an integer literal, a quoted string, or plain text.
    Key,

    /// A value: any literal, or plain text taken as a string.
    Literal,

    /// An expression evaluated on every read.
    Expression,

    /// A module name an expression may use.
    Module,
}

impl ArgType {
    /// Short hint shown in usage lines.
    pub fn hint(&self) -> &'static str {
        match self {
            ArgType::Key => "key",
            ArgType::Literal => "literal",
            ArgType::Expression => "expression",
            ArgType::Module => "module",
        }
    }
}

/// Complete metadata for a CLI command.
///
/// The CLI system uses this metadata for help generation, argument
/// validation, and command discovery.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "set").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "prefs").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against
    /// [`Command::metadata`].
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values or store failures.
    fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
