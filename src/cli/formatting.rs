//! Formatting utilities for CLI output.
//!
//! Consistent formatting for preference values and styled help text.

use crate::{
    codec,
    value::{Key, Value},
};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Blue color
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::GREEN, text, Colors::RESET)
}

/// Formats category names with styling
pub fn format_category(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::BLUE, text, Colors::RESET)
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats usage examples with styling
pub fn format_usage(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats the dynamic marker shown next to evaluated entries
pub fn format_dynamic(text: &str) -> String {
    format!("{}{}{}", Colors::YELLOW, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a value for plain CLI output.
///
/// Strings print without quotes so the output can be used in scripts;
/// everything else prints as a literal.
///
/// ```
/// use prefstore::{Value, cli::formatting::format_value};
///
/// assert_eq!(format_value(&Value::from("hello")), "hello");
/// assert_eq!(format_value(&Value::from(42)), "42");
/// assert_eq!(format_value(&Value::List(vec![Value::from("a")])), "['a']");
/// ```
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => codec::render_literal(other),
    }
}

/// Formats a key as it appears in documents.
pub fn format_key(key: &Key) -> String {
    codec::render_key(key)
}
