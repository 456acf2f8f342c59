use crate::{
    cli::CliError,
    syntax::parse_literal,
    value::{Key, Value},
};

/// Parses a command-line key.
///
/// Number literals become numeric keys and quoted strings become string
/// keys, so `12345` and `'12345'` name different entries. Bare words such as
/// `None` or `inf`, and anything that is not a literal, are taken as plain
/// text.
///
/// # Errors
///
/// Returns `CliError::InvalidArguments` for literals that cannot be keys,
/// such as lists.
pub fn parse_key(text: &str) -> Result<Key, CliError> {
    if is_bare_word(text) {
        return Ok(Key::Str(text.to_string()));
    }
    let Ok(value) = parse_literal(text) else {
        return Ok(Key::Str(text.to_string()));
    };

    Key::from_value(value).map_err(CliError::InvalidArguments)
}

fn is_bare_word(text: &str) -> bool {
    text.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Parses a command-line value.
///
/// Literals (`42`, `3.5`, `True`, `['a', 1]`, `'quoted'`) keep their type;
/// `true`/`false` are accepted as booleans; anything else is plain text.
pub fn parse_value(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    parse_literal(text).unwrap_or_else(|_| Value::Str(text.to_string()))
}

/// Returns the argument at `index` or an error naming it.
pub fn required_arg<'a>(args: &'a [String], index: usize, name: &str, command: &str) -> Result<&'a str, CliError> {
    args.get(index).map(String::as_str).ok_or_else(|| {
        CliError::InvalidArguments(format!("Expected <{name}> argument for '{command}' command"))
    })
}
