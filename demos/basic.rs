use hll_sketch::{HyperLogLog, SketchError, hashing::hash_bytes};

fn main() -> Result<(), SketchError> {
    let mut hll = HyperLogLog::new(12)?;

    let requests = [
        "/api/v1/users",
        "/api/v1/orders",
        "/api/v1/users",
        "/api/v2/users",
        "/static/css",
    ];
    for path in requests {
        hll.add(hash_bytes(path));
    }

    println!("Distinct paths (classic): {:.2}", hll.estimate());
    println!("Distinct paths (beta):    {:.2}", hll.estimate_beta());
    println!("Distinct paths (improved): {:.2}", hll.estimate_improved());

    let persisted = hll.to_bytes();
    let restored = HyperLogLog::from_bytes(&persisted)?;
    println!(
        "Persisted {} bytes, restored estimate {:.2}",
        persisted.len(),
        restored.estimate()
    );
    Ok(())
}
