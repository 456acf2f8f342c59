use std::{fmt, path::PathBuf};

use crate::eval::ModuleRegistry;

use super::{AcceptAll, PreferenceCheck};

/// Construction-time collaborators of a [`super::PreferenceStore`].
pub struct StoreOptions {
    /// Validation hook for static mappings
    pub checker: Box<dyn PreferenceCheck>,
    /// Modules dynamic entries may import
    pub modules: ModuleRegistry,
    /// Directory for the disposable pre-flight file; system temp dir when `None`
    pub scratch_dir: Option<PathBuf>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            checker: Box::new(AcceptAll),
            modules: ModuleRegistry::builtin(),
            scratch_dir: None,
        }
    }
}

impl StoreOptions {
    /// Replaces the validation hook.
    pub fn with_checker(mut self, checker: impl PreferenceCheck + 'static) -> Self {
        self.checker = Box::new(checker);
        self
    }

    /// Replaces the module registry.
    pub fn with_modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }

    /// Sets the pre-flight directory.
    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(scratch_dir.into());
        self
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("modules", &self.modules)
            .field("scratch_dir", &self.scratch_dir)
            .finish_non_exhaustive()
    }
}
