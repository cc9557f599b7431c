//! Persistent cells for Keepsake.
//!
//! A persistent cell owns one key and one default value. It reads through
//! from snapshot storage and writes through to it on every assignment, so the
//! value survives process restarts. Failures never reach the caller: a
//! missing or undecodable snapshot yields the default, and a failed write is
//! logged and dropped.
//!
//! # Variants
//!
//! - [`LazyCell`] -- no in-memory cache. Every `get` re-reads storage; every
//!   `set` writes it. Nothing is read at construction.
//! - [`LiveCell`] -- reads storage exactly once at construction and keeps the
//!   value in memory from then on. `set` updates memory first (notifying
//!   observers) and then writes through. Observers attach with
//!   [`LiveCell::subscribe`] or take a two-way [`Binding`].
//!
//! Both accept any [`Cacheable`] value and any [`SnapshotStore`] backend; the
//! default backend is a [`FileStore`] under [`StoreConfig::default`].
//!
//! ```no_run
//! use keepsake_cell::LazyCell;
//!
//! let launches = LazyCell::new("stats/launches", 0u64);
//! launches.set(&(launches.get() + 1));
//! ```

pub mod binding;
pub mod lazy;
pub mod live;

pub use binding::Binding;
pub use lazy::LazyCell;
pub use live::LiveCell;

pub use keepsake_codec::{Bincode, Cacheable, Json};
pub use keepsake_store::{
    FileStore, InMemoryStore, SnapshotStore, StoreConfig, StoreError, StoreResult,
};
