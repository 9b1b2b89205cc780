use thiserror::Error;

/// Errors surfaced when building a sampler.
///
/// Drawing never fails: every construction-time problem is reported here,
/// and numerical artifacts during sampling are clamped internally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ZipfError {
    /// The range must contain at least one item.
    #[error("invalid range: {range} (must be > 0)")]
    InvalidRange { range: i64 },

    /// The skew exponent must be a finite number.
    #[error("invalid skew: {skew} (must be finite)")]
    InvalidSkew { skew: f64 },

    /// The condensed table stores 32-bit item ids.
    #[error("range {range} exceeds the maximum of {max} supported by this algorithm")]
    RangeTooLarge { range: i64, max: i64 },

    /// The probability mass could not be normalized (overflow or underflow).
    #[error("degenerate distribution for range {range}, skew {skew}")]
    DegenerateDistribution { range: i64, skew: f64 },

    /// Table weights must add up to exactly 2^30.
    #[error("table weights sum to {total}, expected {expected}")]
    WeightSumMismatch { total: u64, expected: u64 },

    /// Algorithm name did not match any known sampler.
    #[error("unknown algorithm: {name:?} (expected one of: rji, condensed, base)")]
    UnknownAlgorithm { name: String },
}

impl ZipfError {
    /// Whether this error comes from an unusable `(range, skew)` pair.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            ZipfError::InvalidRange { .. }
                | ZipfError::InvalidSkew { .. }
                | ZipfError::RangeTooLarge { .. }
                | ZipfError::DegenerateDistribution { .. }
                | ZipfError::WeightSumMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ZipfError>;
