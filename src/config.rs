use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};
use crate::estimator::HyperLogLog;

/// Declarative description of how to size an estimator.
///
/// Set either `precision` or `error_rate`; with neither, the default
/// precision of 14 is used. Typically deserialized from an application's own
/// config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchConfig {
    /// Explicit precision `p`, in `4..=18`.
    pub precision: Option<u8>,
    /// Target relative standard error, in `(0, 1)`.
    pub error_rate: Option<f64>,
}

impl SketchConfig {
    /// Config that asks for a fixed precision.
    pub fn with_precision(precision: u8) -> Self {
        Self {
            precision: Some(precision),
            error_rate: None,
        }
    }

    /// Config that derives the precision from a target error rate.
    pub fn with_error_rate(error_rate: f64) -> Self {
        Self {
            precision: None,
            error_rate: Some(error_rate),
        }
    }

    /// Builds an empty estimator from this config.
    pub fn build(&self) -> Result<HyperLogLog> {
        match (self.precision, self.error_rate) {
            (Some(_), Some(_)) => Err(SketchError::InvalidArgument(
                "set either precision or error_rate, not both".to_string(),
            )),
            (Some(precision), None) => HyperLogLog::new(precision),
            (None, Some(error_rate)) => HyperLogLog::with_error_rate(error_rate),
            (None, None) => Ok(HyperLogLog::default()),
        }
    }
}
