//! Built-in command categories.

pub mod prefs;
