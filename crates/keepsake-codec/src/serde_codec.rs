//! Codecs for arbitrary serde types.
//!
//! Wrap a value in [`Json`] or [`Bincode`] to make it cacheable. JSON
//! snapshots are human-readable on disk; bincode snapshots are compact.
//!
//! A type whose `Serialize` impl can fail (for example a map with non-string
//! keys under JSON) does not satisfy the codec contract. If serialization
//! fails anyway, [`Cacheable::try_to_cache`] returns `None` and cells skip the
//! write, keeping the previous snapshot; `to_cache` returns an empty snapshot.
//!
//! JSON has no representation for non-finite floats: `serde_json` writes NaN
//! and infinities as `null`, which does not decode back into a float. Values
//! holding non-finite floats are outside the domain of [`Json`]; use
//! [`Bincode`] for them. Finite floats round-trip bit-exactly.

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::traits::Cacheable;

macro_rules! serde_wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name<T>(pub T);

        impl<T> $name<T> {
            /// Unwrap the inner value.
            pub fn into_inner(self) -> T {
                self.0
            }
        }

        impl<T> Deref for $name<T> {
            type Target = T;

            fn deref(&self) -> &T {
                &self.0
            }
        }

        impl<T> DerefMut for $name<T> {
            fn deref_mut(&mut self) -> &mut T {
                &mut self.0
            }
        }

        impl<T> From<T> for $name<T> {
            fn from(value: T) -> Self {
                Self(value)
            }
        }
    };
}

serde_wrapper! {
    /// Cacheable via `serde_json`.
    Json
}

serde_wrapper! {
    /// Cacheable via `bincode`.
    Bincode
}

impl<T: Serialize + DeserializeOwned> Cacheable for Json<T> {
    fn from_cache(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice(bytes) {
            Ok(value) => Some(Self(value)),
            Err(e) => {
                debug!(error = %e, len = bytes.len(), "json snapshot did not decode");
                None
            }
        }
    }

    fn to_cache(&self) -> Vec<u8> {
        self.try_to_cache().unwrap_or_default()
    }

    fn try_to_cache(&self) -> Option<Vec<u8>> {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, "value is not json-serializable");
                None
            }
        }
    }
}

impl<T: Serialize + DeserializeOwned> Cacheable for Bincode<T> {
    fn from_cache(bytes: &[u8]) -> Option<Self> {
        match bincode::deserialize(bytes) {
            Ok(value) => Some(Self(value)),
            Err(e) => {
                debug!(error = %e, len = bytes.len(), "bincode snapshot did not decode");
                None
            }
        }
    }

    fn to_cache(&self) -> Vec<u8> {
        self.try_to_cache().unwrap_or_default()
    }

    fn try_to_cache(&self) -> Option<Vec<u8>> {
        match bincode::serialize(&self.0) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, "value is not bincode-serializable");
                None
            }
        }
    }
}
