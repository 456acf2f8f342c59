//! Command-line configuration.
//!
//! Read from `config.toml` in the prefstore configuration directory. Every
//! field has a default, so a missing or partial file is fine.

mod general;
mod loading;
mod paths;
mod store;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};

/// Main configuration structure for the `prefstore` binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Where the preferences document lives.
    #[serde(default)]
    pub store: StoreConfig,
}
