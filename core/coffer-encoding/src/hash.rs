//! Hash transforms for tagged fields.

use coffer_crypto::sha256_hex;

/// A named hash transform applied to string field values.
pub type HashingFn = fn(&[u8]) -> String;

/// Returns the hash function for a transform name, or `None` when the
/// name is unknown (the field is then written unchanged).
pub fn hash_function_for(name: &str) -> Option<HashingFn> {
    match name {
        crate::tags::HASH_SHA256 => Some(sha256_hex),
        _ => None,
    }
}
