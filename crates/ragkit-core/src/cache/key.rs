//! Cache key derivation.

/// Derives a stable cache key from tuple fields.
///
/// Fields are joined with `:` and digested to a fixed-width 128-bit hex
/// string, so keys stay uniform regardless of field content or length.
/// The digest is for uniformity and collision resistance, not security.
/// Inputs are exact: no trimming or case folding is applied.
#[must_use]
pub fn derive(parts: &[&str]) -> String {
    format!("{:x}", md5::compute(parts.join(":")))
}
