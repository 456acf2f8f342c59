use std::{collections::BTreeMap, fs, io::ErrorKind, path::Path};

use tracing::{debug, warn};

use crate::{
    PrefError, Result,
    syntax::{Target, parse_document},
    value::{DynamicMap, DynamicSpec, Key, Preferences, Value, normalize_dynamic},
};

use super::{DOCUMENT_VERSION, DYNAMIC_NAME, PREFERENCES_NAME, VERSION_NAME};

/// The two mappings and version marker read back from a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedDocument {
    /// Static preferences
    pub preferences: Preferences,
    /// Normalized dynamic declarations
    pub dynamic: DynamicMap,
    /// Version marker, `None` for legacy documents
    pub version: Option<String>,
}

/// Reads and parses the document at `path`.
///
/// # Errors
/// * `PrefError::Io` - If the file cannot be read
/// * `PrefError::Format` - If the file is not valid UTF-8 or not a valid document
pub fn load(path: &Path) -> Result<LoadedDocument> {
    debug!(path = %path.display(), "Loading preferences document");
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => PrefError::format(e, Some(path)),
        _ => PrefError::Io(e),
    })?;

    parse(&text, Some(path))
}

/// Parses document text. `path` is only used for error and log context.
///
/// Statements run in order against a table of literal names. The document
/// must bind both the static and dynamic mappings; other names are ignored.
///
/// # Errors
/// Returns `PrefError::Format` if the text does not parse, either mapping is
/// missing or not a mapping, the version marker is not a string, or a dynamic
/// module list is malformed.
pub fn parse(text: &str, path: Option<&Path>) -> Result<LoadedDocument> {
    let statements = parse_document(text).map_err(|e| PrefError::format(e, path))?;
    let mut names: BTreeMap<String, Value> = BTreeMap::new();

    for statement in statements {
        let line = statement.line;
        let value = statement
            .value
            .to_literal()
            .map_err(|e| PrefError::format(format!("line {line}: {e}"), path))?;

        match statement.target {
            Target::Name(name) => {
                names.insert(name, value);
            }
            Target::Subscript { name, key } => {
                let key = key
                    .to_literal()
                    .and_then(Key::from_value)
                    .map_err(|e| PrefError::format(format!("line {line}: {e}"), path))?;

                match names.get_mut(&name) {
                    Some(Value::Map(map)) => {
                        map.insert(key, value);
                    }
                    Some(other) => {
                        return Err(PrefError::format(
                            format!("line {line}: '{name}' is a {}, not a mapping", other.type_name()),
                            path,
                        ));
                    }
                    None => {
                        return Err(PrefError::format(
                            format!("line {line}: '{name}' is not defined"),
                            path,
                        ));
                    }
                }
            }
        }
    }

    let version = match names.remove(VERSION_NAME) {
        Some(Value::Str(version)) => {
            if version != DOCUMENT_VERSION {
                debug!(%version, current = DOCUMENT_VERSION, "Document written by another version");
            }
            Some(version)
        }
        Some(other) => {
            return Err(PrefError::format(
                format!("'{VERSION_NAME}' must be a string, got {}", other.type_name()),
                path,
            ));
        }
        None => {
            warn!(
                location = %display_location(path),
                "Preferences document has no version marker, reading it as a legacy document"
            );
            None
        }
    };

    let preferences = take_mapping(&mut names, PREFERENCES_NAME, path)?;
    let raw_dynamic = take_mapping(&mut names, DYNAMIC_NAME, path)?;

    for name in names.keys() {
        debug!(%name, "Ignoring unknown name in preferences document");
    }

    let spec = dynamic_spec(raw_dynamic).map_err(|e| PrefError::format(e, path))?;
    let (dynamic, discarded) =
        normalize_dynamic(spec, &preferences).map_err(|e| PrefError::format(e, path))?;

    for key in discarded {
        warn!(%key, "Discarding dynamic entry without a backing preference");
    }

    Ok(LoadedDocument {
        preferences,
        dynamic,
        version,
    })
}

fn take_mapping(
    names: &mut BTreeMap<String, Value>,
    name: &str,
    path: Option<&Path>,
) -> Result<BTreeMap<Key, Value>> {
    match names.remove(name) {
        Some(Value::Map(map)) => Ok(map),
        Some(other) => Err(PrefError::format(
            format!("'{name}' must be a mapping, got {}", other.type_name()),
            path,
        )),
        None => Err(PrefError::format(format!("'{name}' is not defined"), path)),
    }
}

fn dynamic_spec(raw: BTreeMap<Key, Value>) -> std::result::Result<DynamicSpec, String> {
    raw.into_iter()
        .map(|(key, value)| {
            let modules = match value {
                Value::None => None,
                Value::List(items) => Some(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::Str(name) => Ok(name),
                            other => Err(format!(
                                "dynamic entry {key}: module names must be strings, got {}",
                                other.type_name()
                            )),
                        })
                        .collect::<std::result::Result<Vec<_>, _>>()?,
                ),
                other => {
                    return Err(format!(
                        "dynamic entry {key}: expected a sequence of module names, got {}",
                        other.type_name()
                    ));
                }
            };
            Ok((key, modules))
        })
        .collect()
}

fn display_location(path: Option<&Path>) -> String {
    path.map_or_else(|| "string".to_string(), |p| p.display().to_string())
}
