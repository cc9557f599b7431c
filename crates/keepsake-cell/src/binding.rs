use keepsake_codec::Cacheable;
use keepsake_store::SnapshotStore;
use tokio::sync::watch;

use crate::live::LiveCell;

/// Two-way view onto a [`LiveCell`]'s value.
///
/// Handed to whatever observes the value from outside (a UI layer, a
/// settings panel). Writes through a binding behave exactly like writes to
/// the cell, including the write-through to storage.
pub struct Binding<T, S> {
    cell: LiveCell<T, S>,
}

impl<T: Cacheable + Clone, S: SnapshotStore> Binding<T, S> {
    pub(crate) fn new(cell: LiveCell<T, S>) -> Self {
        Self { cell }
    }

    pub fn get(&self) -> T {
        self.cell.get()
    }

    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.cell.update(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.cell.subscribe()
    }

    pub fn key(&self) -> &str {
        self.cell.key()
    }
}

impl<T, S> Clone for Binding<T, S> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for Binding<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Binding").field(&self.cell).finish()
    }
}
