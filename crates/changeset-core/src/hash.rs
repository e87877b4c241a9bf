/// 64-bit hash code used to match array elements by content.
///
/// ```
/// # use changeset_core::hash_bytes;
/// let code = hash_bytes(b"changeset");
/// assert_eq!(code.len(), 8);
/// ```
pub type HashCode = [u8; 8];

/// Computes the FNV-1a hash of the provided bytes.
///
/// ```
/// # use changeset_core::hash_bytes;
/// assert_eq!(hash_bytes(b"doc"), hash_bytes(b"doc"));
/// assert_ne!(hash_bytes(b"doc"), hash_bytes(b"Doc"));
/// ```
#[must_use]
pub fn hash_bytes(input: &[u8]) -> HashCode {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in input {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash.to_le_bytes()
}

/// Combines hash codes into a single order-insensitive aggregate.
///
/// Used for mapping contents, where key insertion order must not affect
/// the resulting content hash.
///
/// ```
/// # use changeset_core::{combine, hash_bytes};
/// let ab = combine(vec![hash_bytes(b"a"), hash_bytes(b"b")]);
/// let ba = combine(vec![hash_bytes(b"b"), hash_bytes(b"a")]);
/// assert_eq!(ab, ba);
/// ```
#[must_use]
pub fn combine(mut codes: Vec<HashCode>) -> HashCode {
    codes.sort_unstable();
    let mut bytes = Vec::with_capacity(codes.len() * 8);
    for code in codes {
        bytes.extend_from_slice(&code);
    }
    hash_bytes(&bytes)
}
