use std::path::PathBuf;
use std::sync::Arc;

use keepsake_codec::Cacheable;
use keepsake_store::{FileStore, SnapshotStore, StoreConfig, StoreResult};
use tokio::sync::watch;
use tracing::warn;

use crate::binding::Binding;
use crate::lazy::LazyCell;

/// Observable cell that caches its value in memory and writes through.
///
/// Storage is read exactly once, during construction. After that the
/// in-memory value is authoritative: [`get`](Self::get) never touches
/// storage, and [`set`](Self::set) updates memory before persisting. If the
/// write fails, memory keeps the new value and storage keeps the old one.
///
/// Clones share the same value and backend. Observers are notified through a
/// `tokio::sync::watch` channel; the cell does not care how they schedule
/// their reaction. Writers are not serialized against each other.
pub struct LiveCell<T, S = FileStore> {
    inner: Arc<LiveInner<T, S>>,
}

struct LiveInner<T, S> {
    cell: LazyCell<T, S>,
    value: watch::Sender<T>,
}

impl<T: Cacheable + Clone> LiveCell<T, FileStore> {
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

    pub fn location(&self) -> Option<PathBuf> {
        self.inner.cell.location()
    }
}

impl<T: Cacheable + Clone, S: SnapshotStore> LiveCell<T, S> {
    /// Build a cell over an explicit backend, loading its initial value.
    pub fn with_store(store: S, key: &str, default: T) -> Self {
        Self::from_lazy(LazyCell::with_store(store, key, default))
    }

    /// Wrap a plain cell, reading its current value once.
    pub fn from_lazy(cell: LazyCell<T, S>) -> Self {
        let initial = cell.get();
        let (value, _) = watch::channel(initial);
        Self {
            inner: Arc::new(LiveInner { cell, value }),
        }
    }

    /// The sanitized key.
    pub fn key(&self) -> &str {
        self.inner.cell.key()
    }

    pub fn default_value(&self) -> &T {
        self.inner.cell.default_value()
    }

    pub fn backend(&self) -> &S {
        self.inner.cell.backend()
    }

    /// Current in-memory value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value, notify observers, and persist. A failed write is
    /// logged and dropped.
    pub fn set(&self, value: T) {
        if let Err(e) = self.try_set(value) {
            warn!(key = %self.key(), error = %e, "snapshot write failed; keeping in-memory value");
        }
    }

    /// Like [`set`](Self::set), but returns the write result. The in-memory
    /// value is replaced either way.
    pub fn try_set(&self, value: T) -> StoreResult<()> {
        let snapshot = value.try_to_cache();
        self.inner.value.send_replace(value);
        self.inner.cell.write_snapshot(snapshot)
    }

    /// Mutate the value in place, notify observers, and persist once.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.inner.value.send_modify(f);
        let snapshot = self.inner.value.borrow().try_to_cache();
        if let Err(e) = self.inner.cell.write_snapshot(snapshot) {
            warn!(key = %self.key(), error = %e, "snapshot write failed; keeping in-memory value");
        }
    }

    /// Watch the value. The receiver sees the current value immediately and
    /// is notified on every subsequent `set` or `update`.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.value.subscribe()
    }

    /// Two-way view for an external observer.
    pub fn binding(&self) -> Binding<T, S> {
        Binding::new(self.clone())
    }

    /// Number of live subscribers.
    pub fn observer_count(&self) -> usize {
        self.inner.value.receiver_count()
    }
}

impl<T, S> Clone for LiveCell<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for LiveCell<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveCell")
            .field("key", &self.inner.cell.key)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_store::InMemoryStore;

    fn memory_cell(default: u32) -> (Arc<InMemoryStore>, LiveCell<u32, Arc<InMemoryStore>>) {
        let store = Arc::new(InMemoryStore::new());
        let cell = LiveCell::with_store(Arc::clone(&store), "live", default);
        (store, cell)
    }

    #[test]
    fn fresh_key_yields_default() {
        let (_store, cell) = memory_cell(3);
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn loads_existing_snapshot_once() {
        let store = Arc::new(InMemoryStore::new());
        store.write("live", &9u32.to_cache()).unwrap();
        let cell = LiveCell::with_store(Arc::clone(&store), "live", 0u32);
        assert_eq!(cell.get(), 9);

        // Storage changes after construction are not observed.
        store.write("live", &10u32.to_cache()).unwrap();
        assert_eq!(cell.get(), 9);
        store.clear();
        assert_eq!(cell.get(), 9);
    }

    #[test]
    fn set_updates_memory_and_storage() {
        let (store, cell) = memory_cell(0);
        cell.set(5);
        assert_eq!(cell.get(), 5);
        assert_eq!(store.read("live").unwrap(), Some(5u32.to_cache()));
    }

    #[test]
    fn memory_survives_failed_write() {
        let (store, cell) = memory_cell(0);
        cell.set(1);
        store.set_read_only(true);
        cell.set(2);
        assert_eq!(cell.get(), 2);
        assert_eq!(store.read("live").unwrap(), Some(1u32.to_cache()));
        assert!(cell.try_set(3).is_err());
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn update_writes_through_once() {
        let (store, cell) = memory_cell(10);
        cell.update(|v| *v += 5);
        assert_eq!(cell.get(), 15);
        assert_eq!(store.read("live").unwrap(), Some(15u32.to_cache()));
    }

    #[test]
    fn subscribers_see_changes() {
        let (_store, cell) = memory_cell(0);
        let mut rx = cell.subscribe();
        assert_eq!(*rx.borrow_and_update(), 0);
        assert!(!rx.has_changed().unwrap());
        cell.set(4);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 4);
        assert_eq!(cell.observer_count(), 1);
    }

    #[test]
    fn clones_share_state() {
        let (_store, cell) = memory_cell(0);
        let other = cell.clone();
        other.set(8);
        assert_eq!(cell.get(), 8);
        assert_eq!(cell.with(|v| v * 2), 16);
    }

    #[test]
    fn corrupt_snapshot_yields_default() {
        let store = Arc::new(InMemoryStore::new());
        store.write("live", b"not-a-u32").unwrap();
        let cell = LiveCell::with_store(Arc::clone(&store), "live", 7u32);
        assert_eq!(cell.get(), 7);
    }

    #[test]
    fn uncreatable_root_keeps_value_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the root directory should be.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();
        let cell = LiveCell::in_root(&blocker, "k", 3u32);
        assert_eq!(cell.get(), 3);
        cell.set(4);
        assert_eq!(cell.get(), 4);
        assert!(cell.try_set(5).is_err());
        assert_eq!(cell.get(), 5);
        assert!(blocker.is_file());
    }

    #[test]
    fn unencodable_value_stays_in_memory_only() {
        use keepsake_codec::Json;
        use keepsake_store::StoreError;
        use std::collections::BTreeMap;

        let store = Arc::new(InMemoryStore::new());
        let cell = LiveCell::with_store(Arc::clone(&store), "grid", Json(BTreeMap::new()));
        cell.set(Json(BTreeMap::from([((0u32, 0u32), 1u32)])));
        assert!(store.read("grid").unwrap().is_none());
        assert_eq!(cell.get().len(), 1);

        cell.update(|grid| grid.clear());
        assert_eq!(store.read("grid").unwrap(), Some(b"{}".to_vec()));
        let err = cell.try_set(Json(BTreeMap::from([((2, 2), 2)]))).unwrap_err();
        assert!(matches!(err, StoreError::Encode { .. }));
        assert_eq!(store.read("grid").unwrap(), Some(b"{}".to_vec()));
    }

    #[tokio::test]
    async fn async_observer_is_woken() {
        let (_store, cell) = memory_cell(0);
        let mut rx = cell.subscribe();
        let writer = cell.clone();
        let handle = tokio::spawn(async move {
            writer.set(42);
        });
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 42);
        handle.await.unwrap();
    }
}
