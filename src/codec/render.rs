use crate::value::{DynamicMap, Key, ModuleList, Preferences, Value};

use super::{DOCUMENT_VERSION, DYNAMIC_NAME, HEADER, PREFERENCES_NAME, VERSION_NAME};

/// Renders both mappings into a re-loadable document.
///
/// The output is deterministic: entries follow the mappings' sorted order and
/// every assignment occupies exactly one line.
pub fn render(preferences: &Preferences, dynamic: &DynamicMap) -> String {
    let mut lines = String::new();

    lines.push_str(HEADER);
    lines.push_str("\n\n");
    lines.push_str(&format!(
        "{VERSION_NAME} = {}\n\n",
        quote_string(DOCUMENT_VERSION)
    ));

    lines.push_str(&format!("{PREFERENCES_NAME} = {{}}\n"));
    for (key, value) in preferences {
        lines.push_str(&format!(
            "{PREFERENCES_NAME}[{}] = {}\n",
            render_key(key),
            render_literal(value)
        ));
    }

    lines.push_str(&format!("\n{DYNAMIC_NAME} = {{}}\n"));
    for (key, modules) in dynamic {
        lines.push_str(&format!(
            "{DYNAMIC_NAME}[{}] = {}\n",
            render_key(key),
            render_modules(modules)
        ));
    }

    lines
}

/// Renders a key as a literal.
pub fn render_key(key: &Key) -> String {
    match key {
        Key::Int(i) => i.to_string(),
        Key::Float(f) => render_float(*f),
        Key::Str(s) => quote_string(s),
    }
}

/// Renders a value as a canonical literal that parses back to the same value.
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::None => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Str(s) => quote_string(s),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(render_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Map(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_key(k), render_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Renders a float literal: `inf`, `-inf`, `nan`, or the shortest
/// representation that parses back to the same bits.
pub fn render_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else {
        // Debug formatting is the shortest representation that round-trips
        // and always carries a '.' or an exponent.
        format!("{f:?}")
    }
}

fn render_modules(modules: &ModuleList) -> String {
    let names: Vec<String> = modules.names().iter().map(|n| quote_string(n)).collect();
    match names.len() {
        0 => "()".to_string(),
        1 => format!("({},)", names[0]),
        _ => format!("({})", names.join(", ")),
    }
}

/// Quotes a string with whichever delimiter it does not contain, preferring
/// single quotes. Backslashes, control characters and any occurrence of the
/// chosen delimiter are escaped.
pub fn quote_string(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push(quote);
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == quote => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_ascii_control() => quoted.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push(quote);
    quoted
}
