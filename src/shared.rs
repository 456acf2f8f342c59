//! Process-wide single store instance.
//!
//! The first caller of [`open_shared`] constructs the store and keeps a
//! handle to it; later callers receive the same handle until [`release`] is
//! called. This only prevents duplicate in-memory copies within one process;
//! it does not lock the backing file.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::{
    Result,
    location::Location,
    store::{PreferenceStore, StoreOptions},
};

/// Shared handle to the process-wide store.
pub type SharedStore = Arc<RwLock<PreferenceStore>>;

static SHARED: Mutex<Option<SharedStore>> = Mutex::new(None);

/// Returns the process-wide store, opening it at `location` on first use.
///
/// # Errors
/// Any error of [`PreferenceStore::open`] on first use.
pub fn open_shared(location: Location) -> Result<SharedStore> {
    open_shared_with(location, StoreOptions::default())
}

/// Like [`open_shared`], with explicit options for the first construction.
///
/// Later calls ignore `location` and `options`; a differing location is
/// logged.
///
/// # Errors
/// Any error of [`PreferenceStore::open_with`] on first use.
pub fn open_shared_with(location: Location, options: StoreOptions) -> Result<SharedStore> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(existing) = slot.as_ref() {
        let current = read(existing).location().clone();
        if current != location {
            warn!(
                requested = %location,
                current = %current,
                "Shared preferences already open at another location, reusing it"
            );
        }
        return Ok(Arc::clone(existing));
    }

    let store = Arc::new(RwLock::new(PreferenceStore::open_with(location, options)?));
    info!(path = %read(&store).location(), "Opened shared preferences");
    *slot = Some(Arc::clone(&store));
    Ok(store)
}

/// The process-wide store, if one is open.
pub fn current() -> Option<SharedStore> {
    SHARED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(Arc::clone)
}

/// Drops the process-wide reference and returns it. Outstanding handles keep
/// the store alive; the next [`open_shared`] constructs a fresh one.
pub fn release() -> Option<SharedStore> {
    SHARED.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Read access that recovers from a poisoned lock.
pub fn read(store: &SharedStore) -> RwLockReadGuard<'_, PreferenceStore> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access that recovers from a poisoned lock.
pub fn write(store: &SharedStore) -> RwLockWriteGuard<'_, PreferenceStore> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}
