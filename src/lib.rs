//! prefstore - persistent application preferences with dynamic entries.
//!
//! A [`PreferenceStore`] keeps a mapping of keys to literal values in a small,
//! human-readable document and reloads it on the next run. Entries can also be
//! declared *dynamic*: their stored value is an expression, re-evaluated with
//! a declared set of modules every time it is read.
//!
//! Every mutation is written to a disposable scratch file first and only then
//! to the real document, so an unwritable target is detected before the
//! existing file is touched.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use prefstore::{DynamicSpec, Key, Location, PreferenceStore, Preferences, Value};
//!
//! let location = Location::in_home("myapp")?;
//! let mut store = PreferenceStore::open(location)?;
//!
//! store.update_preferences(
//!     Preferences::from([
//!         (Key::from("theme"), Value::from("dark")),
//!         (Key::from("session"), Value::from("str(uuid.uuid4())")),
//!     ]),
//!     Some(DynamicSpec::from([(Key::from("session"), Some(vec!["uuid".to_string()]))])),
//! )?;
//!
//! let theme = store.get(&Key::from("theme"), Value::None)?;
//! let session = store.get(&Key::from("session"), Value::None)?;
//! # Ok::<(), prefstore::PrefError>(())
//! ```

/// Document rendering and loading.
pub mod codec;

/// Command-line configuration.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Dynamic expression evaluation.
pub mod eval;

/// Backing directory and filename validation.
pub mod location;

/// Process-wide single store instance.
pub mod shared;

/// The preference store.
pub mod store;

/// Literal and expression parsing.
pub mod syntax;

/// Keys, values and the store's mappings.
pub mod value;

/// Command-line interface over a shared store.
pub mod cli;

/// Logging setup for the binary.
pub mod tracing_config;

pub use core::{PrefError, Result};
pub use eval::{EvalError, Evaluator, Module, ModuleRegistry};
pub use location::{DEFAULT_FILENAME, EXTENSION, Location};
pub use shared::SharedStore;
pub use store::{AcceptAll, PreferenceCheck, PreferenceStore, StoreOptions};
pub use value::{DynamicMap, DynamicSpec, Key, ModuleList, Preferences, Value};
