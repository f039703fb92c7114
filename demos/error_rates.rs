//! Shows how the requested error rate maps to precision and memory, and how
//! the three estimators compare on the same registers.

use hll_sketch::{HyperLogLog, SketchConfig, SketchError, hashing::hash_bytes};

fn main() -> Result<(), SketchError> {
    for rate in [0.1, 0.05, 0.02, 0.01, 0.005] {
        let hll = HyperLogLog::with_error_rate(rate)?;
        println!(
            "error rate {rate:<6} -> p = {:>2}, {:>6} registers, {:>6} bytes",
            hll.precision(),
            hll.register_count(),
            hll.memory_footprint()
        );
    }

    let config = SketchConfig::with_error_rate(0.01);
    let mut hll = config.build()?;
    let mut count = 0u64;
    for target in [100u64, 1_000, 10_000, 100_000, 1_000_000] {
        while count < target {
            hll.add(hash_bytes(count.to_le_bytes()));
            count += 1;
        }
        println!(
            "{target:>8}: classic {:>10.1} beta {:>10.1} improved {:>10.1}",
            hll.estimate(),
            hll.estimate_beta(),
            hll.estimate_improved()
        );
    }
    Ok(())
}
