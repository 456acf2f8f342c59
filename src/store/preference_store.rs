use std::{
    fmt, mem,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    PrefError, Result,
    codec::{self, DOCUMENT_VERSION},
    eval::{EvalError, Evaluator, ModuleRegistry},
    location::Location,
    value::{
        DynamicMap, DynamicSpec, Key, Preferences, Value, dynamic_to_spec, normalize_dynamic,
        same_entries,
    },
};

use super::{
    PreferenceCheck, StoreOptions,
    merge::{merge_missing, merge_overwrite},
    persist::write_document,
};

/// Persistent preferences bound to one backing file.
///
/// Holds the static mapping and the dynamic mapping. Every mutation renders
/// the candidate state, writes it through the two-phase protocol, and only
/// then swaps it in, so readers never observe a half-applied update.
pub struct PreferenceStore {
    location: Location,
    preferences: Preferences,
    dynamic: DynamicMap,
    version: Option<String>,
    checker: Box<dyn PreferenceCheck>,
    modules: ModuleRegistry,
    scratch_dir: Option<PathBuf>,
}

impl PreferenceStore {
    /// Opens the store at `location` with default options.
    ///
    /// # Errors
    /// See [`PreferenceStore::open_with`].
    pub fn open(location: Location) -> Result<Self> {
        Self::open_with(location, StoreOptions::default())
    }

    /// Opens the store at `location`, loading the existing document or
    /// writing an empty one when the file does not exist yet.
    ///
    /// # Errors
    /// * `PrefError::Format` - If the existing document is malformed
    /// * `PrefError::Io` - If the existing document cannot be read
    /// * `PrefError::Persist` - If the empty document cannot be written
    pub fn open_with(location: Location, options: StoreOptions) -> Result<Self> {
        let mut store = Self {
            location,
            preferences: Preferences::new(),
            dynamic: DynamicMap::new(),
            version: None,
            checker: options.checker,
            modules: options.modules,
            scratch_dir: options.scratch_dir,
        };

        let path = store.location.fullpath().to_path_buf();
        if path.is_file() {
            let document = codec::load(&path)?;
            store.preferences = document.preferences;
            store.dynamic = document.dynamic;
            store.version = document.version;
            info!(
                path = %path.display(),
                entries = store.preferences.len(),
                dynamic = store.dynamic.len(),
                "Loaded preferences"
            );
        } else {
            store.persist(&Preferences::new(), &DynamicMap::new())?;
            store.version = Some(DOCUMENT_VERSION.to_string());
            info!(path = %path.display(), "Created empty preferences document");
        }

        Ok(store)
    }

    /// Reads `key`, evaluating it when it is dynamic.
    ///
    /// Returns `default` unchanged when the key is absent; the default is
    /// never evaluated.
    ///
    /// # Errors
    /// Returns `PrefError::Evaluation` if a declared module cannot be
    /// imported, the stored expression is not a string or does not parse, or
    /// evaluating it fails.
    pub fn get(&self, key: &Key, default: Value) -> Result<Value> {
        let Some(value) = self.preferences.get(key) else {
            return Ok(default);
        };

        match self.dynamic.get(key) {
            Some(modules) if !modules.is_empty() => match value {
                Value::Str(expression) => {
                    Evaluator::new(&self.modules).evaluate(key, expression, modules)
                }
                other => Err(PrefError::evaluation(
                    key,
                    EvalError::Type {
                        message: format!(
                            "dynamic preference must hold an expression string, got {}",
                            other.type_name()
                        ),
                    },
                )),
            },
            _ => Ok(value.clone()),
        }
    }

    /// Reads `key`, returning `Value::None` when absent.
    ///
    /// # Errors
    /// See [`PreferenceStore::get`].
    pub fn get_or_none(&self, key: &Key) -> Result<Value> {
        self.get(key, Value::None)
    }

    /// Replaces the static mapping, and the dynamic mapping when given.
    ///
    /// Without `dynamic`, dynamic entries whose key no longer exists are
    /// dropped with a warning. With `dynamic`, the new static mapping is
    /// swapped in first and restored if [`PreferenceStore::set_dynamic`] fails.
    ///
    /// # Errors
    /// * `PrefError::Validation` - If the check hook rejects `preferences` or `dynamic` is malformed
    /// * `PrefError::Persist` - If the two-phase write fails
    pub fn set_preferences(
        &mut self,
        preferences: Preferences,
        dynamic: Option<DynamicSpec>,
    ) -> Result<()> {
        self.check(&preferences)?;

        match dynamic {
            None => {
                let mut kept = DynamicMap::new();
                for (key, modules) in &self.dynamic {
                    if preferences.contains_key(key) {
                        kept.insert(key.clone(), modules.clone());
                    } else {
                        warn!(%key, "Dropping dynamic entry of removed preference");
                    }
                }
                self.commit(preferences, kept)
            }
            Some(spec) => {
                let previous = mem::replace(&mut self.preferences, preferences);
                match self.set_dynamic(spec) {
                    Ok(_) => Ok(()),
                    Err(e) => {
                        self.preferences = previous;
                        Err(e)
                    }
                }
            }
        }
    }

    /// Replaces the dynamic mapping.
    ///
    /// Entries whose key is not in the static mapping are discarded with a
    /// warning and returned. `None` module lists become empty lists, which
    /// mark their key as static.
    ///
    /// # Errors
    /// * `PrefError::Validation` - If a module list has duplicates or invalid names
    /// * `PrefError::Persist` - If the two-phase write fails; the dynamic mapping is then unchanged
    pub fn set_dynamic(&mut self, dynamic: DynamicSpec) -> Result<Vec<Key>> {
        let (dynamic, discarded) =
            normalize_dynamic(dynamic, &self.preferences).map_err(PrefError::validation)?;
        for key in &discarded {
            warn!(%key, "Discarding dynamic entry without a backing preference");
        }

        self.persist(&self.preferences, &dynamic)?;
        self.dynamic = dynamic;
        self.version = Some(DOCUMENT_VERSION.to_string());
        Ok(discarded)
    }

    /// Merges `preferences` (and `dynamic`) over the current mappings,
    /// overwriting existing keys. Nothing is written when the merge changes
    /// nothing.
    ///
    /// # Errors
    /// See [`PreferenceStore::set_preferences`].
    pub fn update_preferences(
        &mut self,
        preferences: Preferences,
        dynamic: Option<DynamicSpec>,
    ) -> Result<()> {
        self.check(&preferences)?;
        let merged = merge_overwrite(&self.preferences, preferences);
        let dynamic = self.validated(dynamic, &merged)?;
        let merged_dynamic = dynamic.map(|d| merge_overwrite(&self.dynamic, d));
        self.apply_merge(merged, merged_dynamic)
    }

    /// Adds the keys of `preferences` (and `dynamic`) that are not present
    /// yet. Existing keys are never overwritten and nothing is written when
    /// nothing was added.
    ///
    /// # Errors
    /// See [`PreferenceStore::set_preferences`].
    pub fn set_default(
        &mut self,
        preferences: Preferences,
        dynamic: Option<DynamicSpec>,
    ) -> Result<()> {
        self.check(&preferences)?;
        // A key that already holds a static value keeps it; attaching modules
        // would turn that value into an expression.
        let dynamic = dynamic.map(|spec| {
            spec.into_iter()
                .filter(|(key, _)| !self.preferences.contains_key(key))
                .collect::<DynamicSpec>()
        });
        let merged = merge_missing(&self.preferences, preferences);
        let dynamic = self.validated(dynamic, &merged)?;
        let merged_dynamic = dynamic.map(|d| merge_missing(&self.dynamic, d));
        self.apply_merge(merged, merged_dynamic)
    }

    /// Re-reads the backing file.
    ///
    /// The document is loaded into temporaries and swapped in only on
    /// success. With `raise_on_error` false a failure is logged and the
    /// in-memory state is kept.
    ///
    /// # Errors
    /// With `raise_on_error`, any error of [`codec::load`].
    pub fn reload(&mut self, raise_on_error: bool) -> Result<()> {
        match codec::load(self.location.fullpath()) {
            Ok(document) => {
                self.preferences = document.preferences;
                self.dynamic = document.dynamic;
                self.version = document.version;
                debug!(path = %self.location, "Reloaded preferences");
                Ok(())
            }
            Err(e) if raise_on_error => Err(e),
            Err(e) => {
                warn!(path = %self.location, error = %e, "Reload failed, keeping in-memory preferences");
                Ok(())
            }
        }
    }

    /// Copy of the static mapping.
    pub fn preferences(&self) -> Preferences {
        self.preferences.clone()
    }

    /// Copy of the dynamic mapping, in caller form.
    pub fn dynamic(&self) -> DynamicSpec {
        dynamic_to_spec(&self.dynamic)
    }

    /// Path of the backing file.
    pub fn fullpath(&self) -> &Path {
        self.location.fullpath()
    }

    /// The validated backing location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Version marker of the last loaded or written document.
    pub fn document_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether reading `key` evaluates an expression.
    pub fn is_dynamic(&self, key: &Key) -> bool {
        self.dynamic.get(key).is_some_and(|modules| !modules.is_empty())
    }

    /// Number of static entries.
    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    /// Whether the static mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// Whether `key` has a static entry.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.preferences.contains_key(key)
    }

    /// Modules dynamic entries can import.
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    fn check(&self, preferences: &Preferences) -> Result<()> {
        self.checker
            .check_preferences(preferences)
            .map_err(PrefError::validation)
    }

    fn validated(
        &self,
        dynamic: Option<DynamicSpec>,
        preferences: &Preferences,
    ) -> Result<Option<DynamicMap>> {
        let Some(spec) = dynamic else {
            return Ok(None);
        };
        let (dynamic, discarded) =
            normalize_dynamic(spec, preferences).map_err(PrefError::validation)?;
        for key in &discarded {
            warn!(%key, "Discarding dynamic entry without a backing preference");
        }
        Ok(Some(dynamic))
    }

    fn apply_merge(&mut self, preferences: Preferences, dynamic: Option<DynamicMap>) -> Result<()> {
        let unchanged = same_entries(&preferences, &self.preferences)
            && dynamic.as_ref().is_none_or(|d| *d == self.dynamic);
        if unchanged {
            debug!(path = %self.location, "Merge changed nothing, skipping write");
            return Ok(());
        }

        self.set_preferences(preferences, dynamic.as_ref().map(dynamic_to_spec))
    }

    fn commit(&mut self, preferences: Preferences, dynamic: DynamicMap) -> Result<()> {
        self.persist(&preferences, &dynamic)?;
        self.preferences = preferences;
        self.dynamic = dynamic;
        self.version = Some(DOCUMENT_VERSION.to_string());
        Ok(())
    }

    fn persist(&self, preferences: &Preferences, dynamic: &DynamicMap) -> Result<()> {
        let text = codec::render(preferences, dynamic);
        write_document(self.scratch_dir.as_deref(), self.location.fullpath(), &text)
    }
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("location", &self.location)
            .field("preferences", &self.preferences)
            .field("dynamic", &self.dynamic)
            .field("version", &self.version)
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}
