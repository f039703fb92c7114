//! Flat persistence format.
//!
//! An encoded estimator is one precision byte followed by the `2^p` register
//! bytes in index order. Registers are single bytes, so there is no byte-order
//! concern. The serde representation carries the same two fields and goes
//! through the same validation on the way in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SketchError};
use crate::estimator::{HyperLogLog, check_precision};
use crate::util::max_rank;

impl HyperLogLog {
    /// Encodes the estimator as `[precision, registers...]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let registers = self.registers();
        let mut out = Vec::with_capacity(1 + registers.len());
        out.push(self.precision());
        out.extend_from_slice(registers);
        out
    }

    /// Decodes bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((&precision, registers)) = bytes.split_first() else {
            return Err(SketchError::Malformed("empty buffer".to_string()));
        };
        let hll = decode(precision, registers.to_vec())?;
        debug!(precision, bytes = bytes.len(), "decoded estimator");
        Ok(hll)
    }
}

fn decode(precision: u8, registers: Vec<u8>) -> Result<HyperLogLog> {
    check_precision(precision)?;
    let expected = 1usize << precision;
    if registers.len() != expected {
        return Err(SketchError::Malformed(format!(
            "expected {expected} registers for precision {precision}, found {}",
            registers.len()
        )));
    }
    let limit = max_rank(precision);
    if let Some((index, &value)) = registers
        .iter()
        .enumerate()
        .find(|(_, value)| **value > limit)
    {
        return Err(SketchError::Malformed(format!(
            "register {index} holds {value}, above the limit of {limit} for precision {precision}"
        )));
    }
    Ok(HyperLogLog::from_parts(precision, registers.into_boxed_slice()))
}

/// Wire shape used by the serde impls of [`HyperLogLog`].
#[derive(Serialize, Deserialize)]
struct RawHyperLogLog {
    precision: u8,
    registers: Vec<u8>,
}

impl From<&HyperLogLog> for RawHyperLogLog {
    fn from(hll: &HyperLogLog) -> Self {
        Self {
            precision: hll.precision(),
            registers: hll.registers().to_vec(),
        }
    }
}

impl Serialize for HyperLogLog {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        RawHyperLogLog::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HyperLogLog {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = RawHyperLogLog::deserialize(deserializer)?;
        decode(raw.precision, raw.registers).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hash_bytes;

    fn sample(precision: u8, count: usize) -> HyperLogLog {
        let mut hll = HyperLogLog::new(precision).unwrap();
        for i in 0..count {
            hll.add(hash_bytes(format!("enc-{i}")));
        }
        hll
    }

    #[test]
    fn layout_is_precision_then_registers() {
        let hll = sample(4, 20);
        let bytes = hll.to_bytes();
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 4);
        assert_eq!(&bytes[1..], hll.registers());
    }

    #[test]
    fn decoded_estimator_matches_source() {
        let hll = sample(12, 5_000);
        let decoded = HyperLogLog::from_bytes(&hll.to_bytes()).unwrap();
        assert_eq!(decoded, hll);
        assert_eq!(decoded.estimate(), hll.estimate());
    }

    #[test]
    fn empty_buffer_is_malformed() {
        assert!(matches!(
            HyperLogLog::from_bytes(&[]),
            Err(SketchError::Malformed(_))
        ));
    }

    #[test]
    fn bad_precision_byte_is_invalid_argument() {
        let mut bytes = vec![3u8];
        bytes.resize(9, 0);
        assert!(matches!(
            HyperLogLog::from_bytes(&bytes),
            Err(SketchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn truncated_registers_are_malformed() {
        let bytes = sample(6, 10).to_bytes();
        let err = HyperLogLog::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, SketchError::Malformed(_)), "{err}");
    }

    #[test]
    fn oversized_register_is_malformed() {
        let mut bytes = HyperLogLog::new(18).unwrap().to_bytes();
        bytes[1] = 64 - 18 + 2;
        let err = HyperLogLog::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("register 0"), "{err}");

        bytes[1] = 64 - 18 + 1;
        assert!(HyperLogLog::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn serde_json_round_trip_validates() {
        let hll = sample(5, 100);
        let json = serde_json::to_string(&hll).unwrap();
        let back: HyperLogLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hll);

        let bad = r#"{"precision":5,"registers":[1,2,3]}"#;
        let err = serde_json::from_str::<HyperLogLog>(bad).unwrap_err();
        assert!(err.to_string().contains("malformed encoding"), "{err}");
    }
}
