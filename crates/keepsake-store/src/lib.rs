//! Snapshot storage for Keepsake persistent cells.
//!
//! A store maps a caller-supplied key to at most one snapshot: an opaque byte
//! sequence produced by a codec. The store never interprets snapshot bytes.
//!
//! # Keys and locations
//!
//! Every `/` in a key is replaced with `_` before it is used (see
//! [`sanitize_key`]), so keys cannot introduce subdirectories or leave the
//! storage root. The file backend stores each key at
//! `<root>/<sanitized-key>.<extension>`, holding exactly the snapshot bytes.
//!
//! # Backends
//!
//! All backends implement the [`SnapshotStore`] trait:
//!
//! - [`FileStore`] -- one file per key, replaced atomically on write
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. One location holds at most one snapshot; a write replaces it whole.
//! 2. A missing snapshot is `Ok(None)`, not an error.
//! 3. Errors are returned to the caller. Deciding whether to swallow them is
//!    the cell's job, not the store's.
//! 4. Keys are independent: no operation spans more than one key.

pub mod config;
pub mod error;
pub mod file;
pub mod key;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use key::{sanitize_key, validate_key};
pub use memory::InMemoryStore;
pub use traits::SnapshotStore;
