//! The preference store and its persist-then-commit protocol.
//!
//! A [`PreferenceStore`] owns the static and dynamic mappings of one backing
//! file. Mutators validate their input, write the rendered document to a
//! disposable scratch file and then to the real file, and only then swap the
//! new mappings in.

mod check;
mod merge;
mod options;
mod persist;
mod preference_store;


pub use check::{AcceptAll, PreferenceCheck};
pub use options::StoreOptions;
pub use persist::write_document;
pub use preference_store::PreferenceStore;
