use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{PrefError, Result};

/// Two-phase write of a rendered document.
///
/// The text first goes to a disposable file in `scratch_dir` (the system temp
/// directory when `None`), which is deleted again on drop. Only if that
/// succeeds is the real file at `path` overwritten.
///
/// # Errors
/// Returns `PrefError::Persist` naming the scratch directory if the pre-flight
/// write fails, in which case `path` is untouched, or naming `path` if the
/// final write fails, in which case `path` may be truncated.
pub fn write_document(scratch_dir: Option<&Path>, path: &Path, text: &str) -> Result<()> {
    let scratch: PathBuf = scratch_dir.map_or_else(env::temp_dir, Path::to_path_buf);

    preflight(&scratch, text).map_err(|e| {
        PrefError::persist(format!("pre-flight write failed: {e}"), &scratch)
    })?;
    debug!(scratch = %scratch.display(), "Pre-flight write succeeded");

    fs::write(path, text).map_err(|e| {
        PrefError::persist(
            format!("{e}; the file may be incomplete, in-memory preferences are unchanged"),
            path,
        )
    })?;
    debug!(path = %path.display(), bytes = text.len(), "Wrote preferences document");

    Ok(())
}

fn preflight(scratch: &Path, text: &str) -> std::io::Result<()> {
    let mut file = NamedTempFile::new_in(scratch)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}
