use std::path::{Path, PathBuf};

use keepsake_codec::Cacheable;
use keepsake_store::{
    sanitize_key, FileStore, SnapshotStore, StoreConfig, StoreError, StoreResult,
};
use tracing::{debug, warn};

/// Read-through, write-through cell with no in-memory cache.
///
/// Construction only prepares the storage root; the first storage read
/// happens on the first [`get`](Self::get). Each `get` consults storage
/// again, so a snapshot deleted or replaced externally is picked up on the
/// next read.
pub struct LazyCell<T, S = FileStore> {
    pub(crate) key: String,
    default: T,
    store: S,
}

impl<T: Cacheable> LazyCell<T, FileStore> {
    /// Cell backed by the default file store.
    pub fn new(key: &str, default: T) -> Self {
        Self::with_config(StoreConfig::default(), key, default)
    }

    /// Cell backed by a file store rooted at `root`.
    pub fn in_root(root: impl Into<PathBuf>, key: &str, default: T) -> Self {
        Self::with_store(FileStore::at(root), key, default)
    }

    pub fn with_config(config: StoreConfig, key: &str, default: T) -> Self {
        Self::with_store(FileStore::new(config), key, default)
    }

    /// Where this cell's snapshot lives, if the key maps to a location.
    pub fn location(&self) -> Option<PathBuf> {
        self.store.location(&self.key).ok()
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }
}

impl<T: Cacheable, S: SnapshotStore> LazyCell<T, S> {
    /// Build a cell over an explicit backend.
    ///
    /// The backend's root is created if missing. A failure to create it is
    /// logged and otherwise ignored; later writes will fail the same way.
    pub fn with_store(store: S, key: &str, default: T) -> Self {
        let key = sanitize_key(key);
        if let Err(e) = store.ensure_root() {
            warn!(key = %key, error = %e, "could not create storage root");
        }
        Self {
            key,
            default,
            store,
        }
    }

    /// The sanitized key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Read and decode the stored snapshot.
    ///
    /// `Ok(None)` covers both "no snapshot" and "snapshot did not decode".
    /// Decoding never alters what is on disk.
    pub fn load(&self) -> StoreResult<Option<T>> {
        let Some(bytes) = self.store.read(&self.key)? else {
            return Ok(None);
        };
        let value = T::from_cache(&bytes);
        if value.is_none() {
            debug!(key = %self.key, len = bytes.len(), "snapshot did not decode; using default");
        }
        Ok(value)
    }

    /// Encode `value` and write it, replacing any prior snapshot.
    ///
    /// If `value` cannot be encoded nothing is written and the prior
    /// snapshot stays in place.
    pub fn store(&self, value: &T) -> StoreResult<()> {
        self.write_snapshot(value.try_to_cache())
    }

    pub(crate) fn write_snapshot(&self, snapshot: Option<Vec<u8>>) -> StoreResult<()> {
        let snapshot = snapshot.ok_or_else(|| StoreError::Encode {
            key: self.key.clone(),
        })?;
        self.store.write(&self.key, &snapshot)
    }

    /// Whether a snapshot is present, decodable or not.
    pub fn is_stored(&self) -> bool {
        self.store.exists(&self.key).unwrap_or(false)
    }

    /// Current value: the decoded snapshot, or the default.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match self.load() {
            Ok(Some(value)) => value,
            Ok(None) => self.default.clone(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "snapshot read failed; using default");
                self.default.clone()
            }
        }
    }

    /// Persist `value`. A failed write is logged and dropped.
    pub fn set(&self, value: &T) {
        if let Err(e) = self.store(value) {
            warn!(key = %self.key, error = %e, "snapshot write failed");
        }
    }
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for LazyCell<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyCell")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish()
    }
}
