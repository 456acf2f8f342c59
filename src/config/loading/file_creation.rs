use std::{fs, path::Path};

use crate::{PrefError, Result};

const DEFAULT_CONFIG: &str = r#"# prefstore configuration file

[general]
# error, warn, info, debug or trace. RUST_LOG overrides this.
log_level = "warn"
log_to_file = false

[store]
# directory = "/path/to/dir"      # defaults to $HOME
filename = "preferences.pref"
# scratch_dir = "/path/to/tmp"    # defaults to the system temp directory
"#;

/// Writes a commented default configuration file, creating parent directories.
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PrefError::config_file(
                format!("failed to create config directory {}: {e}", parent.display()),
                path,
            )
        })?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| PrefError::config_file(format!("failed to create config file: {e}"), path))
}
