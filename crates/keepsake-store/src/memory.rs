use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::key::validate_key;
use crate::traits::SnapshotStore;

/// In-memory, HashMap-based snapshot store.
///
/// Intended for tests and embedding. Snapshots are held behind a `RwLock` and
/// cloned on read/write. [`set_read_only`](Self::set_read_only) makes every
/// write fail, which exercises the failure paths of callers.
pub struct InMemoryStore {
    snapshots: RwLock<HashMap<String, Vec<u8>>>,
    read_only: AtomicBool,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Number of snapshots currently stored.
    pub fn len(&self) -> usize {
        self.snapshots.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().expect("lock poisoned").is_empty()
    }

    /// Remove all snapshots.
    pub fn clear(&self) {
        self.snapshots.write().expect("lock poisoned").clear();
    }

    /// When `true`, `write` and `remove` fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(StoreError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemoryStore {
    fn ensure_root(&self) -> StoreResult<()> {
        Ok(())
    }

    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let key = validate_key(key)?;
        let map = self.snapshots.read().expect("lock poisoned");
        Ok(map.get(&key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let key = validate_key(key)?;
        self.check_writable()?;
        let mut map = self.snapshots.write().expect("lock poisoned");
        map.insert(key, bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let key = validate_key(key)?;
        self.check_writable()?;
        let mut map = self.snapshots.write().expect("lock poisoned");
        Ok(map.remove(&key).is_some())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let key = validate_key(key)?;
        let map = self.snapshots.read().expect("lock poisoned");
        Ok(map.contains_key(&key))
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.snapshots.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("snapshot_count", &self.len())
            .field("read_only", &self.read_only.load(Ordering::SeqCst))
            .finish()
    }
}
