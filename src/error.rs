use thiserror::Error;

/// Errors produced when building, merging, or decoding an estimator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    /// A constructor argument (precision, error rate, config) is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Two estimators with different register counts cannot be merged.
    #[error("incompatible precision: cannot merge p={right} into p={left}")]
    IncompatiblePrecision { left: u8, right: u8 },
    /// Persisted bytes do not describe a valid estimator.
    #[error("malformed encoding: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, SketchError>;
