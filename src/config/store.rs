use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    location::{DEFAULT_FILENAME, Location},
    store::StoreOptions,
};

/// Backing location and pre-flight settings of the store the CLI opens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the preferences document; the home directory when unset.
    pub directory: Option<PathBuf>,

    /// Document filename.
    pub filename: String,

    /// Directory for the disposable pre-flight file; the system temp
    /// directory when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename: DEFAULT_FILENAME.to_string(),
            scratch_dir: None,
        }
    }
}

impl StoreConfig {
    /// Validates the configured directory and filename.
    ///
    /// # Errors
    /// Returns `PrefError::Validation` if the location is unusable.
    pub fn location(&self) -> Result<Location> {
        match &self.directory {
            Some(directory) => Location::new(directory.clone(), &self.filename),
            None => Location::in_home(&self.filename),
        }
    }

    /// Store options with the configured scratch directory and stock modules.
    pub fn options(&self) -> StoreOptions {
        let options = StoreOptions::default();
        match &self.scratch_dir {
            Some(dir) => options.with_scratch_dir(dir.clone()),
            None => options,
        }
    }
}
