//! Single-integer persistence.
//!
//! A [`CounterFile`] keeps one decimal integer in a text file. Reading a
//! counter that was never initialized can seed it from an [`IdProvider`]
//! (typically a remote lookup of the newest known id) and persist the result.
//!
//! Like persistent cells, nothing here fails loudly: every outcome is an
//! `Option<i64>` and problems are reported through `tracing`.

pub mod counter;
pub mod error;
pub mod provider;

pub use counter::{CounterFile, DEFAULT_FILE_NAME};
pub use error::{CounterError, CounterResult};
pub use provider::{FnProvider, IdProvider, NoProvider};
