//! Process-wide registry of open libraries.
//!
//! Keyed by canonical directory and interpolation policy. Each entry is a
//! compute-once cell, so concurrent first opens of the same directory build
//! the library exactly once; a failed build leaves the cell empty and the
//! next open retries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::{Lazy, OnceCell};
use radial_model::{InterpolationPolicy, ModelConfig};

use crate::error::{LibraryError, Result};
use crate::library::RadialModelLibrary;

type Key = (PathBuf, InterpolationPolicy);
type Entry = Arc<OnceCell<Arc<RadialModelLibrary>>>;

static LIBRARIES: Lazy<Mutex<HashMap<Key, Entry>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn libraries() -> MutexGuard<'static, HashMap<Key, Entry>> {
    LIBRARIES.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open the library in `dir`, or return the one already open there.
pub fn open(dir: impl AsRef<Path>, config: &ModelConfig) -> Result<Arc<RadialModelLibrary>> {
    let dir = dir.as_ref();
    let root = dir.canonicalize().map_err(|e| LibraryError::io(dir, e))?;
    let entry = libraries()
        .entry((root.clone(), config.policy))
        .or_default()
        .clone();

    // built outside the map lock so other directories are not held up
    let result = entry
        .get_or_try_init(|| RadialModelLibrary::load(root.clone(), config).map(Arc::new))
        .cloned();
    if result.is_err() {
        discard_if_empty(&(root, config.policy), &entry);
    }
    result
}

/// Drop a registry entry whose library never got built.
fn discard_if_empty(key: &Key, entry: &Entry) {
    let mut map = libraries();
    let stale = map
        .get(key)
        .is_some_and(|current| Arc::ptr_eq(current, entry) && current.get().is_none());
    if stale {
        map.remove(key);
    }
}


/// Drop `library` from the registry if it is the one registered for its key.
pub(crate) fn forget(library: &RadialModelLibrary) {
    let key = (library.root().to_path_buf(), library.policy());
    let mut map = libraries();
    let registered = map
        .get(&key)
        .and_then(|entry| entry.get())
        .is_some_and(|open| std::ptr::eq(Arc::as_ptr(open), library));
    if registered {
        map.remove(&key);
    }
}

/// Canonical roots of every library currently open.
pub fn open_libraries() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = libraries()
        .iter()
        .filter(|(_, entry)| entry.get().is_some())
        .map(|((root, _), _)| root.clone())
        .collect();
    roots.sort();
    roots.dedup();
    roots
}
