//! Caller-side hashing helpers.
//!
//! [`HyperLogLog`](crate::HyperLogLog) only ever sees `u64` values. These
//! helpers produce well-mixed 64-bit hashes with XXH3 for callers that do not
//! already have a hash function of their own. Every estimator that will be
//! merged must be fed with the same function and seed.

use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// Hashes `key` with XXH3-64 and the default seed.
pub fn hash_bytes<K: AsRef<[u8]>>(key: K) -> u64 {
    xxh3_64(key.as_ref())
}

/// Hashes `key` with XXH3-64 and an explicit seed.
pub fn hash_bytes_with_seed<K: AsRef<[u8]>>(key: K, seed: u64) -> u64 {
    xxh3_64_with_seed(key.as_ref(), seed)
}
