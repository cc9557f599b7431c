/// Conversion between a value and its byte snapshot.
///
/// Implementors must satisfy the round-trip law: for every value `v`,
/// `Self::from_cache(&v.to_cache())` yields a value observably equal to `v`.
/// Types that cannot uphold this must not be stored in a persistent cell.
pub trait Cacheable: Sized {
    /// Decode a snapshot.
    ///
    /// Returns `None` if `bytes` is not a well-formed snapshot of this type.
    fn from_cache(bytes: &[u8]) -> Option<Self>;

    /// Encode this value as a snapshot.
    fn to_cache(&self) -> Vec<u8>;

    /// Encode, or `None` if this particular value cannot be encoded.
    ///
    /// Cells write through this method so that a failed encode leaves the
    /// previous snapshot in place. Codecs that are total keep the default.
    fn try_to_cache(&self) -> Option<Vec<u8>> {
        Some(self.to_cache())
    }
}
