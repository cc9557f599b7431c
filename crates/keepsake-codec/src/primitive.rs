//! Fixed-format codecs for standard library types.

use crate::traits::Cacheable;

impl Cacheable for bool {
    fn from_cache(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0] => Some(false),
            [1] => Some(true),
            _ => None,
        }
    }

    fn to_cache(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }
}

macro_rules! impl_cacheable_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn from_cache(bytes: &[u8]) -> Option<Self> {
                    let raw = bytes.try_into().ok()?;
                    Some(<$ty>::from_le_bytes(raw))
                }

                fn to_cache(&self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }
            }
        )*
    };
}

impl_cacheable_le!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl Cacheable for String {
    fn from_cache(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn to_cache(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl Cacheable for Vec<u8> {
    fn from_cache(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }

    fn to_cache(&self) -> Vec<u8> {
        self.clone()
    }
}
