//! Snapshot codec contract for Keepsake persistent cells.
//!
//! A value is *cacheable* when it can be turned into a byte snapshot and
//! recovered from one. Persistent cells are generic over any type with this
//! capability; the store never interprets the bytes.
//!
//! # Contract
//!
//! - [`Cacheable::to_cache`] is total for every in-domain value.
//! - [`Cacheable::from_cache`] returns `None` for malformed or foreign input.
//!   It never panics: corrupt snapshots are an expected condition.
//! - `from_cache(&v.to_cache())` is observably equal to `v`.
//!
//! Snapshots carry no header or length prefix, so every encoding here is
//! either fixed-width or self-describing.
//!
//! # Stock implementations
//!
//! - `bool`, all fixed-width integers, `f32`/`f64` -- little-endian, exact width
//! - [`String`] -- UTF-8 bytes
//! - `Vec<u8>` -- the raw bytes
//! - [`Json`] -- any serde type, encoded with `serde_json`
//! - [`Bincode`] -- any serde type, encoded with `bincode`

pub mod primitive;
pub mod serde_codec;
pub mod traits;

pub use serde_codec::{Bincode, Json};
pub use traits::Cacheable;
