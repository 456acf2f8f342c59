use std::{
    collections::BTreeMap,
    env,
    fmt::{self, Write as _},
    path::{MAIN_SEPARATOR_STR, PathBuf, is_separator},
    process,
    sync::Arc,
};

use chrono::{Local, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::value::Value;

/// A named capability that dynamic expressions may import.
///
/// `path` is the dotted member path below the module, e.g. `"path.join"` for
/// `os.path.join`.
pub trait Module: Send + Sync {
    /// Name the module is imported under.
    fn name(&self) -> &str;

    /// Reads a non-callable member, or `None` if there is no such value.
    fn attribute(&self, path: &str) -> Option<Value>;

    /// Calls a function member.
    ///
    /// # Errors
    /// Returns a message when the member does not exist or rejects its arguments.
    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String>;

    /// Member names, for listings.
    fn members(&self) -> Vec<String> {
        Vec::new()
    }
}

/// The set of modules a store can import.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Creates an empty registry. Nothing can be imported from it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the stock `uuid`, `time`, `os`, `math` and
    /// `platform` modules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(UuidModule));
        registry.register(Arc::new(TimeModule));
        registry.register(Arc::new(OsModule));
        registry.register(Arc::new(MathModule));
        registry.register(Arc::new(PlatformModule));
        registry
    }

    /// Adds a module, replacing any module registered under the same name.
    pub fn register(&mut self, module: Arc<dyn Module>) -> &mut Self {
        let name = module.name().to_string();
        if self.modules.insert(name.clone(), module).is_some() {
            debug!(module = %name, "Replaced registered module");
        }
        self
    }

    /// Looks a module up by its registered name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.modules.get(name).cloned()
    }

    /// Whether a module is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Registered modules, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Module>> {
        self.modules.values()
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.modules.keys()).finish()
    }
}

pub(crate) fn no_member(module: &str, path: &str) -> String {
    format!("module '{module}' has no function '{path}'")
}

pub(crate) fn arity(args: &[Value], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(format!(
            "takes {expected} argument(s) but {} were given",
            args.len()
        ));
    }
    Ok(())
}

pub(crate) fn str_arg(args: &[Value], index: usize) -> Result<&str, String> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(format!(
            "argument {} must be str, not {}",
            index + 1,
            other.type_name()
        )),
        None => Err(format!("missing argument {}", index + 1)),
    }
}

pub(crate) fn float_arg(args: &[Value], index: usize) -> Result<f64, String> {
    match args.get(index) {
        Some(Value::Int(i)) => Ok(*i as f64),
        Some(Value::Float(f)) => Ok(*f),
        Some(Value::Bool(b)) => Ok(f64::from(u8::from(*b))),
        Some(other) => Err(format!(
            "argument {} must be a number, not {}",
            index + 1,
            other.type_name()
        )),
        None => Err(format!("missing argument {}", index + 1)),
    }
}

pub(crate) fn float_to_int(f: f64) -> Result<i64, String> {
    if !f.is_finite() {
        return Err(format!("cannot convert {f} to integer"));
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(format!("{f} is out of integer range"));
    }
    Ok(truncated as i64)
}

/// `uuid.uuid1()` and `uuid.uuid4()`, returned as hyphenated strings.
struct UuidModule;

impl Module for UuidModule {
    fn name(&self) -> &str {
        "uuid"
    }

    fn attribute(&self, _path: &str) -> Option<Value> {
        None
    }

    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String> {
        arity(args, 0, 0)?;
        let id = match path {
            "uuid1" => {
                // Random node id with the multicast bit set, as RFC 4122 asks
                // for hosts without a usable MAC address.
                let random = Uuid::new_v4();
                let bytes = random.as_bytes();
                let node = [bytes[0] | 0x01, bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]];
                Uuid::now_v1(&node)
            }
            "uuid4" => Uuid::new_v4(),
            _ => return Err(no_member(self.name(), path)),
        };
        Ok(Value::Str(id.hyphenated().to_string()))
    }

    fn members(&self) -> Vec<String> {
        vec!["uuid1()".to_string(), "uuid4()".to_string()]
    }
}

/// Wall-clock access: `time()`, `strftime(format)`, `isoformat()`.
struct TimeModule;

impl Module for TimeModule {
    fn name(&self) -> &str {
        "time"
    }

    fn attribute(&self, _path: &str) -> Option<Value> {
        None
    }

    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String> {
        match path {
            "time" => {
                arity(args, 0, 0)?;
                let micros = Utc::now().timestamp_micros();
                Ok(Value::Float(micros as f64 / 1_000_000.0))
            }
            "strftime" => {
                arity(args, 1, 1)?;
                let format = str_arg(args, 0)?;
                let mut out = String::new();
                write!(out, "{}", Local::now().format(format))
                    .map_err(|_| format!("invalid format string '{format}'"))?;
                Ok(Value::Str(out))
            }
            "isoformat" => {
                arity(args, 0, 0)?;
                let now = Local::now().naive_local();
                Ok(Value::Str(now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()))
            }
            _ => Err(no_member(self.name(), path)),
        }
    }

    fn members(&self) -> Vec<String> {
        vec![
            "time()".to_string(),
            "strftime(format)".to_string(),
            "isoformat()".to_string(),
        ]
    }
}

/// Process environment and path helpers.
struct OsModule;

impl Module for OsModule {
    fn name(&self) -> &str {
        "os"
    }

    fn attribute(&self, path: &str) -> Option<Value> {
        match path {
            "sep" => Some(Value::from(MAIN_SEPARATOR_STR)),
            "name" => Some(Value::from(if cfg!(windows) { "nt" } else { "posix" })),
            _ => None,
        }
    }

    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String> {
        match path {
            "getcwd" => {
                arity(args, 0, 0)?;
                let cwd = env::current_dir().map_err(|e| e.to_string())?;
                Ok(Value::Str(cwd.to_string_lossy().into_owned()))
            }
            "getenv" => {
                arity(args, 1, 2)?;
                let name = str_arg(args, 0)?;
                Ok(env::var(name)
                    .map(Value::Str)
                    .unwrap_or_else(|_| args.get(1).cloned().unwrap_or(Value::None)))
            }
            "getpid" => {
                arity(args, 0, 0)?;
                Ok(Value::Int(i64::from(process::id())))
            }
            "path.join" => {
                arity(args, 1, usize::MAX)?;
                let mut joined = PathBuf::new();
                for index in 0..args.len() {
                    joined.push(str_arg(args, index)?);
                }
                Ok(Value::Str(joined.to_string_lossy().into_owned()))
            }
            "path.expanduser" => {
                arity(args, 1, 1)?;
                Ok(Value::Str(expand_user(str_arg(args, 0)?)))
            }
            "path.basename" => {
                arity(args, 1, 1)?;
                let p = str_arg(args, 0)?;
                Ok(Value::from(p.rsplit(is_separator).next().unwrap_or("")))
            }
            "path.dirname" => {
                arity(args, 1, 1)?;
                Ok(Value::from(dirname(str_arg(args, 0)?)))
            }
            _ => Err(no_member(self.name(), path)),
        }
    }

    fn members(&self) -> Vec<String> {
        [
            "sep",
            "name",
            "getcwd()",
            "getenv(name, default)",
            "getpid()",
            "path.join(parts..)",
            "path.expanduser(path)",
            "path.basename(path)",
            "path.dirname(path)",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }
}

fn expand_user(path: &str) -> String {
    let Ok(home) = env::var("HOME") else {
        return path.to_string();
    };
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(is_separator) => format!("{home}{rest}"),
        _ => path.to_string(),
    }
}

fn dirname(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(index) => {
            let head = path[..index].trim_end_matches(is_separator);
            if head.is_empty() {
                &path[..=index]
            } else {
                head
            }
        }
        None => "",
    }
}

/// `pi`, `e` and a few numeric functions.
struct MathModule;

impl Module for MathModule {
    fn name(&self) -> &str {
        "math"
    }

    fn attribute(&self, path: &str) -> Option<Value> {
        match path {
            "pi" => Some(Value::Float(std::f64::consts::PI)),
            "e" => Some(Value::Float(std::f64::consts::E)),
            "inf" => Some(Value::Float(f64::INFINITY)),
            _ => None,
        }
    }

    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String> {
        match path {
            "sqrt" => {
                arity(args, 1, 1)?;
                let x = float_arg(args, 0)?;
                if x < 0.0 {
                    return Err("math domain error".to_string());
                }
                Ok(Value::Float(x.sqrt()))
            }
            "floor" => {
                arity(args, 1, 1)?;
                match &args[0] {
                    Value::Int(i) => Ok(Value::Int(*i)),
                    _ => float_to_int(float_arg(args, 0)?.floor()).map(Value::Int),
                }
            }
            "ceil" => {
                arity(args, 1, 1)?;
                match &args[0] {
                    Value::Int(i) => Ok(Value::Int(*i)),
                    _ => float_to_int(float_arg(args, 0)?.ceil()).map(Value::Int),
                }
            }
            "pow" => {
                arity(args, 2, 2)?;
                Ok(Value::Float(float_arg(args, 0)?.powf(float_arg(args, 1)?)))
            }
            _ => Err(no_member(self.name(), path)),
        }
    }

    fn members(&self) -> Vec<String> {
        ["pi", "e", "inf", "sqrt(x)", "floor(x)", "ceil(x)", "pow(x, y)"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// Host operating system and architecture.
struct PlatformModule;

impl Module for PlatformModule {
    fn name(&self) -> &str {
        "platform"
    }

    fn attribute(&self, _path: &str) -> Option<Value> {
        None
    }

    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String> {
        arity(args, 0, 0)?;
        match path {
            "system" => Ok(Value::Str(system_name(env::consts::OS))),
            "machine" => Ok(Value::from(env::consts::ARCH)),
            _ => Err(no_member(self.name(), path)),
        }
    }

    fn members(&self) -> Vec<String> {
        vec!["system()".to_string(), "machine()".to_string()]
    }
}

fn system_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        other => {
            let mut chars = other.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        }
    }
}
