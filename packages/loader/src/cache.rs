//! Process-wide cache of loaded datasets.
//!
//! A dataset is loaded the first time a `(path, schema)` pair is requested
//! and the same [`Arc`] is handed out afterwards. Entries are only replaced
//! by an explicit [`DatasetCache::reload`]; nothing is invalidated behind the
//! caller's back. A failed load never leaves an entry behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::progress::{ProgressCallback, null_progress};
use crate::schema::SchemaConfig;
use crate::{LoadError, WorkingDataset, load_path_with_progress};

type CacheKey = (PathBuf, SchemaConfig);

/// Loaded datasets keyed by canonical source path and the full schema.
///
/// Keying on the schema contents rather than its `id` keeps a custom schema
/// that reuses an id from being served another schema's dataset.
#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<BTreeMap<CacheKey, Arc<WorkingDataset>>>,
}

impl DatasetCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset for `path`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the dataset is not cached and loading fails.
    pub fn get_or_load(
        &self,
        path: &Path,
        schema: &SchemaConfig,
    ) -> Result<Arc<WorkingDataset>, LoadError> {
        self.get_or_load_with_progress(path, schema, &null_progress())
    }

    /// Like [`Self::get_or_load`], reporting load progress to `progress`.
    ///
    /// The cache lock is held for the duration of the load, so concurrent
    /// callers asking for the same source wait for a single read.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the dataset is not cached and loading fails.
    pub fn get_or_load_with_progress(
        &self,
        path: &Path,
        schema: &SchemaConfig,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Arc<WorkingDataset>, LoadError> {
        let key = cache_key(path, schema);
        let mut entries = self.lock();

        if let Some(dataset) = entries.get(&key) {
            log::debug!("[{}] Using cached dataset for {}", schema.id, path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_path_with_progress(path, schema, progress)?);
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Loads `path` again and replaces any cached entry.
    ///
    /// On failure the previous entry, if any, is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if loading fails.
    pub fn reload(
        &self,
        path: &Path,
        schema: &SchemaConfig,
    ) -> Result<Arc<WorkingDataset>, LoadError> {
        let key = cache_key(path, schema);
        let mut entries = self.lock();
        let dataset = Arc::new(load_path_with_progress(path, schema, &null_progress())?);
        log::info!("[{}] Reloaded {}", schema.id, path.display());
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Returns the cached dataset for `path` without loading.
    #[must_use]
    pub fn get(&self, path: &Path, schema: &SchemaConfig) -> Option<Arc<WorkingDataset>> {
        self.lock().get(&cache_key(path, schema)).cloned()
    }

    /// Removes the entry for `path`. Returns `true` if one was present.
    pub fn evict(&self, path: &Path, schema: &SchemaConfig) -> bool {
        self.lock().remove(&cache_key(path, schema)).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<CacheKey, Arc<WorkingDataset>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the process-wide dataset cache.
#[must_use]
pub fn global_cache() -> &'static DatasetCache {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new)
}

fn cache_key(path: &Path, schema: &SchemaConfig) -> CacheKey {
    let path = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    (path, schema.clone())
}
