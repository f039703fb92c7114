//! Builds independent estimators on different shards, then merges them
//! without replaying the original stream.

use hll_sketch::{HyperLogLog, SketchError, hashing::hash_bytes_with_seed};

const SEED: u64 = 99;

fn main() -> Result<(), SketchError> {
    // Shard A ingests even IDs, shard B odd ones, and both see a shared
    // overlap. Same precision and hash seed on both sides so they can merge.
    let mut shard_a = HyperLogLog::new(14)?;
    let mut shard_b = HyperLogLog::new(14)?;

    for id in 0..100_000u64 {
        let hash = hash_bytes_with_seed(id.to_le_bytes(), SEED);
        if id % 2 == 0 || id < 10_000 {
            shard_a.add(hash);
        }
        if id % 2 == 1 || id < 10_000 {
            shard_b.add(hash);
        }
    }

    println!("Shard A estimate: {:.0}", shard_a.estimate());
    println!("Shard B estimate: {:.0}", shard_b.estimate());

    let mut aggregate = shard_a.clone();
    aggregate.merge(&shard_b)?;
    println!("Union estimate (100000 expected): {:.0}", aggregate.estimate());

    // Merging is associative and idempotent, so rebuilding from an empty
    // estimator in any order gives the same registers.
    let mut reconstructed = HyperLogLog::new(14)?;
    reconstructed.merge_all([&shard_b, &shard_a, &shard_b])?;
    println!("Reconstructed matches aggregate? {}", reconstructed == aggregate);

    let mismatched = HyperLogLog::new(10)?;
    if let Err(err) = aggregate.merge(&mismatched) {
        println!("Refused merge: {err}");
    }
    Ok(())
}
