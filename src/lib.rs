//! Mergeable HyperLogLog cardinality estimator.
//!
//! [`HyperLogLog`] keeps `2^p` small registers and estimates how many distinct
//! items have been seen from the longest runs of leading zeros observed in
//! their hashes. Memory is fixed at construction, updates are O(1), and two
//! estimators of the same precision merge into one that describes the union of
//! both streams.
//!
//! The estimator accepts already-hashed `u64` values and never picks a hash
//! function itself. [`hashing`] offers XXH3 helpers for callers without one.
//!
//! ```
//! use hll_sketch::{HyperLogLog, hashing::hash_bytes};
//!
//! let mut shard_a = HyperLogLog::new(12)?;
//! let mut shard_b = HyperLogLog::new(12)?;
//! for id in 0..1_000 {
//!     let hash = hash_bytes(format!("user-{id}"));
//!     if id % 2 == 0 { shard_a.add(hash); } else { shard_b.add(hash); }
//! }
//! shard_a.merge(&shard_b)?;
//! assert!((shard_a.estimate() - 1_000.0).abs() < 50.0);
//! # Ok::<(), hll_sketch::SketchError>(())
//! ```

mod config;
mod encoding;
mod error;
mod estimator;
pub mod hashing;
mod util;

pub use config::SketchConfig;
pub use error::{Result, SketchError};
pub use estimator::HyperLogLog;
