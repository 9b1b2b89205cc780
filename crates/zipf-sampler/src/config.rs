use crate::error::{Result, ZipfError};
use serde::{Deserialize, Serialize};

/// Construction parameters of a sampler.
///
/// Fully determines the target distribution and, together with the PRNG
/// algorithm, the exact sequence of draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of items; draws fall in `[1, range]`.
    pub range: i64,
    /// Power-law exponent `s`.
    pub skew: f64,
    #[serde(default)]
    pub seed: u64,
}

impl SamplerConfig {
    pub fn new(range: i64, skew: f64, seed: u64) -> Self {
        Self { range, skew, seed }
    }

    /// Check the parameters and return the range as an unsigned count.
    ///
    /// Non-positive skew is accepted: the algorithms degrade toward a uniform
    /// (or inverted) shape but stay in range.
    pub fn validate(&self) -> Result<u64> {
        if self.range <= 0 {
            return Err(ZipfError::InvalidRange { range: self.range });
        }
        let range = self.range as u64;
        check_params(range, self.skew)?;
        Ok(range)
    }
}

/// Parameter check shared by every sampler constructor.
pub(crate) fn check_params(range: u64, skew: f64) -> Result<()> {
    if range == 0 {
        return Err(ZipfError::InvalidRange { range: 0 });
    }
    if !skew.is_finite() {
        return Err(ZipfError::InvalidSkew { skew });
    }
    Ok(())
}
