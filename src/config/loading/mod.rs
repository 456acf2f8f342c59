mod file_creation;

use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, info};

use super::Config;
use crate::{PrefError, Result};
use file_creation::create_default_config_file;

impl Config {
    /// Loads the configuration file at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns `PrefError::ConfigFile` if the file cannot be read or is not
    /// valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Config> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(PrefError::config_file(e, path)),
        };

        Self::parse(&content, path)
    }

    /// Loads the configuration file at `path`, writing a commented default
    /// file first when none exists.
    ///
    /// # Errors
    /// Returns `PrefError::ConfigFile` if the default file cannot be created
    /// or the existing file is invalid.
    pub fn load_or_create(path: &Path) -> Result<Config> {
        if !path.exists() {
            create_default_config_file(path)?;
            info!(path = %path.display(), "Created default configuration file");
        }
        Self::load(path)
    }

    fn parse(content: &str, path: &Path) -> Result<Config> {
        toml::from_str(content).map_err(|e| PrefError::config_file(e, path))
    }
}
