use std::sync::Arc;

use crate::error::StoreResult;

/// Keyed snapshot storage.
///
/// All implementations must satisfy these invariants:
/// - Keys are sanitized before use; `"a/b"` and `"a_b"` address the same slot.
/// - A slot holds at most one snapshot. `write` replaces it whole: readers
///   never observe old and new bytes mixed.
/// - A missing snapshot is `Ok(None)`; `Err` is reserved for backend failure.
/// - Operations on different keys are independent and unordered.
pub trait SnapshotStore: Send + Sync {
    /// Create the storage root (and missing parents) if absent.
    fn ensure_root(&self) -> StoreResult<()>;

    /// Read the snapshot for `key`.
    ///
    /// Returns `Ok(None)` if no snapshot exists.
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `bytes` as the snapshot for `key`, replacing any prior snapshot.
    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Remove the snapshot for `key`. Returns `true` if one existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Check whether a snapshot exists for `key`.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read(key)?.is_some())
    }

    /// Sanitized keys of every stored snapshot, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    fn ensure_root(&self) -> StoreResult<()> {
        (**self).ensure_root()
    }

    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        (**self).write(key, bytes)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
