//! Attribute hashing for composite bucket addresses.
//!
//! Bucket addresses are assembled bit-by-bit from per-attribute hashes,
//! so the hash must stay stable across runs: re-hashing with a different
//! seed or algorithm makes every stored relation unaddressable.

pub mod bits;
pub mod choice;

use crate::consts::hash_consts::HASH_SEED;
use crate::hash::bits::Bits;
use xxhash_rust::xxh32::xxh32;

/// 32-bit hash of one attribute value.
pub fn hash_bytes(bytes: &[u8]) -> Bits {
    xxh32(bytes, HASH_SEED)
}
