//! Preference document codec.
//!
//! A document is a short, human-readable text file that binds exactly two
//! mappings, one line per entry:
//!
//! ```text
//! # This file is an automatically generated prefstore preferences file.
//!
//! __prefstore_version__ = '0.1.0'
//!
//! preferences = {}
//! preferences['answer'] = 42
//! preferences['id'] = 'uuid.uuid1()'
//!
//! dynamic = {}
//! dynamic['id'] = ('uuid',)
//! ```
//!
//! Loading only accepts assignments of literal values, so reading a document
//! never runs anything.

mod load;
mod render;

#[cfg(test)]
mod tests;

pub use load::{LoadedDocument, load, parse};
pub use render::{quote_string, render, render_float, render_key, render_literal};

/// First line of every rendered document.
pub const HEADER: &str = "# This file is an automatically generated prefstore preferences file.";

/// Name bound to the version marker.
pub const VERSION_NAME: &str = "__prefstore_version__";

/// Name bound to the static mapping.
pub const PREFERENCES_NAME: &str = "preferences";

/// Name bound to the dynamic mapping.
pub const DYNAMIC_NAME: &str = "dynamic";

/// Version marker written into new documents.
pub const DOCUMENT_VERSION: &str = env!("CARGO_PKG_VERSION");
