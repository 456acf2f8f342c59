//! Keys, literal values and the two mappings a store holds.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::OnceLock,
};

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{PrefError, Result, codec};

#[cfg(test)]
mod tests;

static MODULE_NAME: OnceLock<Option<Regex>> = OnceLock::new();

/// Identifier of a single preference.
///
/// Integer keys sort first, then float keys, then string keys, which gives
/// documents a stable layout. Float keys compare by IEEE total order, so `nan`
/// is a usable key and `0.0` and `-0.0` are distinct.
#[derive(Debug, Clone)]
pub enum Key {
    /// Numeric key, e.g. `12345`
    Int(i64),
    /// Numeric key, e.g. `1.5`
    Float(f64),
    /// Text key, e.g. `'preference 1'`
    Str(String),
}

/// A literal-representable preference value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value
    None,
    /// `True` / `False`
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit float, including `inf` and `nan`
    Float(f64),
    /// Unicode text
    Str(String),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// Nested mapping
    Map(BTreeMap<Key, Value>),
}

/// The static mapping: key to value (or to the expression string of a dynamic entry).
pub type Preferences = BTreeMap<Key, Value>;

/// Caller-supplied dynamic declarations. `None` means "no modules".
pub type DynamicSpec = BTreeMap<Key, Option<Vec<String>>>;

/// Normalized dynamic mapping held by a store.
pub type DynamicMap = BTreeMap<Key, ModuleList>;

/// Ordered, duplicate-free list of supporting module names.
///
/// Once built the list cannot be modified. An empty list marks its key as static.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ModuleList(Vec<String>);

impl ModuleList {
    /// Builds a module list, rejecting duplicates and malformed names.
    ///
    /// # Errors
    /// Returns a description of the first offending name.
    pub fn new(names: Vec<String>) -> std::result::Result<Self, String> {
        for (i, name) in names.iter().enumerate() {
            if !is_module_name(name) {
                return Err(format!("'{name}' is not a valid module name"));
            }
            if names[..i].contains(name) {
                return Err(format!("module '{name}' is declared more than once"));
            }
        }
        Ok(Self(names))
    }

    /// Module names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Whether no modules are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared modules.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn is_module_name(name: &str) -> bool {
    MODULE_NAME
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

impl Key {
    /// Converts a value into a key. Only strings and numbers qualify.
    ///
    /// # Errors
    /// Returns a description of the unhashable value.
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Int(i) => Ok(Key::Int(i)),
            Value::Float(f) => Ok(Key::Float(f)),
            Value::Str(s) => Ok(Key::Str(s)),
            other => Err(format!(
                "{} cannot be used as a preference key",
                other.type_name()
            )),
        }
    }

    /// The key as a plain value.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(i) => Value::Int(*i),
            Key::Float(f) => Value::Float(*f),
            Key::Str(s) => Value::Str(s.clone()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Int(_) => 0,
            Key::Float(_) => 1,
            Key::Str(_) => 2,
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Int(a), Key::Int(b)) => a.cmp(b),
            (Key::Float(a), Key::Float(b)) => a.total_cmp(b),
            (Key::Str(a), Key::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Key::Int(i) => i.hash(state),
            Key::Float(f) => f.to_bits().hash(state),
            Key::Str(s) => s.hash(state),
        }
    }
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "dict",
        }
    }

    /// Borrows the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness: empty containers, zero, `None` and `False` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    /// Structural identity, with floats compared bit for bit.
    ///
    /// Unlike `==`, a `nan` is identical to itself, so a stored value can be
    /// recognised as unchanged.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            (Value::Map(a), Value::Map(b)) => same_entries(a, b),
            _ => self == other,
        }
    }
}

/// Whether two mappings hold the same keys and [`Value::identical`] values.
pub fn same_entries(a: &BTreeMap<Key, Value>, b: &BTreeMap<Key, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|((ka, va), (kb, vb))| ka == kb && va.identical(vb))
}

/// Turns an untyped value into the static mapping.
///
/// # Errors
/// Returns `PrefError::Validation` if the value is not a mapping.
pub fn preferences_from_value(value: Value) -> Result<Preferences> {
    match value {
        Value::Map(map) => Ok(map),
        other => Err(PrefError::validation(format!(
            "preferences must be a mapping, got {}",
            other.type_name()
        ))),
    }
}

/// Validates caller-supplied dynamic declarations and splits off orphans.
///
/// Returns the normalized mapping plus the keys that were discarded because
/// they have no backing entry in `preferences`.
///
/// # Errors
/// Returns the first malformed module list as a message naming its key.
pub fn normalize_dynamic(
    dynamic: DynamicSpec,
    preferences: &Preferences,
) -> std::result::Result<(DynamicMap, Vec<Key>), String> {
    let mut normalized = DynamicMap::new();
    let mut discarded = Vec::new();

    for (key, modules) in dynamic {
        let modules = ModuleList::new(modules.unwrap_or_default())
            .map_err(|reason| format!("dynamic entry {key}: {reason}"))?;

        if preferences.contains_key(&key) {
            normalized.insert(key, modules);
        } else {
            discarded.push(key);
        }
    }

    Ok((normalized, discarded))
}

/// Converts a normalized mapping back into caller form.
pub fn dynamic_to_spec(dynamic: &DynamicMap) -> DynamicSpec {
    dynamic
        .iter()
        .map(|(key, modules)| (key.clone(), Some(modules.names().to_vec())))
        .collect()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::render_key(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::render_literal(self))
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::Float(f) => serializer.serialize_str(&codec::render_float(*f)),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Preferences> for Value {
    fn from(value: Preferences) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
