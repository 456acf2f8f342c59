use std::{
    env, fmt,
    path::{Path, PathBuf, is_separator},
};

use tracing::warn;

use crate::{PrefError, Result};

/// Extension every preferences document carries.
pub const EXTENSION: &str = "pref";

/// Filename used when the caller does not choose one.
pub const DEFAULT_FILENAME: &str = "preferences.pref";

/// A validated backing location: a writable directory plus a plain filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    directory: PathBuf,
    filename: String,
    fullpath: PathBuf,
}

impl Location {
    /// Validates `directory` and `filename`.
    ///
    /// The directory must exist and accept new files, which is probed by
    /// creating an anonymous temporary file in it. The filename must not
    /// contain path separators. A filename without the `.pref` extension gets
    /// it appended, with a warning.
    ///
    /// # Errors
    /// Returns `PrefError::Validation` describing the rejected directory or filename.
    pub fn new(directory: impl Into<PathBuf>, filename: &str) -> Result<Self> {
        let directory = directory.into();
        let filename = Self::validate_filename(filename)?;
        Self::validate_directory(&directory)?;

        Ok(Self {
            fullpath: directory.join(&filename),
            directory,
            filename,
        })
    }

    /// A location in the user's home directory.
    ///
    /// # Errors
    /// Returns `PrefError::Validation` if `HOME` is unset, or any error of [`Location::new`].
    pub fn in_home(filename: &str) -> Result<Self> {
        let home = env::var("HOME")
            .map_err(|_| PrefError::validation("HOME environment variable is not set"))?;
        Self::new(home, filename)
    }

    /// Directory holding the document.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Document filename, always ending in `.pref`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Directory joined with filename.
    pub fn fullpath(&self) -> &Path {
        &self.fullpath
    }

    fn validate_filename(filename: &str) -> Result<String> {
        if filename.is_empty() {
            return Err(PrefError::validation("filename must not be empty"));
        }
        if filename.contains(is_separator) || filename == "." || filename == ".." {
            return Err(PrefError::validation(format!(
                "filename '{filename}' must be a plain file name without path separators"
            )));
        }

        if Path::new(filename).extension().is_some_and(|ext| ext == EXTENSION) {
            return Ok(filename.to_string());
        }

        let appended = format!("{filename}.{EXTENSION}");
        warn!(filename, appended = %appended, "Appended '.{EXTENSION}' to preferences filename");
        Ok(appended)
    }

    fn validate_directory(directory: &Path) -> Result<()> {
        if !directory.is_dir() {
            return Err(PrefError::validation(format!(
                "'{}' is not an existing directory",
                directory.display()
            )));
        }

        tempfile::tempfile_in(directory).map_err(|e| {
            PrefError::validation(format!(
                "'{}' is not a writable directory: {e}",
                directory.display()
            ))
        })?;

        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullpath.display())
    }
}
