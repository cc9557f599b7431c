//! Key sanitization.
//!
//! The only rewrite is `/` to `_`. Two raw keys that differ only in that
//! character share a location (`"a/b"` and `"a_b"`), and the last writer wins.

use crate::error::{StoreError, StoreResult};

/// Separator replaced in raw keys.
pub const SEPARATOR: char = '/';

/// Replacement for [`SEPARATOR`].
pub const REPLACEMENT: char = '_';

/// Replace every `/` in `key` with `_`. No other character is altered.
///
/// # Examples
///
/// ```
/// use keepsake_store::sanitize_key;
///
/// assert_eq!(sanitize_key("user/settings"), "user_settings");
/// assert_eq!(sanitize_key("counter"), "counter");
/// ```
pub fn sanitize_key(key: &str) -> String {
    key.replace(SEPARATOR, &REPLACEMENT.to_string())
}

/// Sanitize `key` and reject keys no filesystem can name.
///
/// The empty key is valid; the file backend stores it as `<root>/.<ext>`.
pub fn validate_key(key: &str) -> StoreResult<String> {
    if key.contains('\0') {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not contain NUL".into(),
        });
    }
    Ok(sanitize_key(key))
}
