use crate::config::{check_params, SamplerConfig};
use crate::error::Result;
use crate::math::{power_integral, power_integral_inverse};
use crate::rng::Prng;
use crate::traits::ZipfSampler;

/// Closed-form power-law rejection sampler.
///
/// The envelope has density proportional to 1 on `[0, 1)` and `x^(-s)` on
/// `[1, N)`; its CDF is `x / t` and `(x^(1-s) - s) / ((1-s)·t)` respectively,
/// with `t = (N^(1-s) - s) / (1-s)`. A candidate `invB` is drawn by inversion
/// and item `floor(invB) + 1` is accepted with probability `(invB / x)^s`.
///
/// Construction is O(1). Each trial costs one or two uniforms and a couple of
/// transcendental calls, cheaper than rejection-inversion, but the acceptance
/// rate is lower for small ranges.
///
/// `t` and the inverse are evaluated through [`power_integral`] so that
/// `s = 1` and its neighbourhood stay finite.
#[derive(Debug, Clone)]
pub struct BaseRejectionSampler {
    range: u64,
    skew: f64,
    t: f64,
    rng: Prng,
}

impl BaseRejectionSampler {
    /// Fails on an empty range or a non-finite skew.
    pub fn new(range: u64, skew: f64, seed: u64) -> Result<Self> {
        check_params(range, skew)?;
        // (N^(1-s) - s) / (1-s) = 1 + (N^(1-s) - 1) / (1-s)
        let t = 1.0 + power_integral(range as f64, skew);
        tracing::debug!(range, skew, t, "base rejection sampler built");
        Ok(Self {
            range,
            skew,
            t,
            rng: Prng::from_seed(seed),
        })
    }

    /// Normalizer of the envelope, `(N^(1-s) - s) / (1-s)`.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Inverse envelope CDF at `p·t`.
    #[inline]
    fn inverse_cdf(&self, pt: f64) -> f64 {
        if pt <= 1.0 {
            pt
        } else {
            // (pt·(1-s) + s)^(1/(1-s)) = (1 + (1-s)(pt-1))^(1/(1-s))
            power_integral_inverse(pt - 1.0, self.skew)
        }
    }
}

impl ZipfSampler for BaseRejectionSampler {
    fn from_config(config: &SamplerConfig) -> Result<Self> {
        let range = config.validate()?;
        Self::new(range, config.skew, config.seed)
    }

    fn sample(&mut self) -> u64 {
        loop {
            let p = self.rng.next_f64();
            let inv_b = self.inverse_cdf(p * self.t);
            let x = (inv_b as u64).saturating_add(1).min(self.range);
            if x == 1 {
                return 1;
            }

            let ratio = (self.skew * (inv_b / x as f64).ln()).exp();
            if self.rng.next_f64() < ratio {
                return x;
            }
        }
    }

    fn range(&self) -> u64 {
        self.range
    }

    fn skew(&self) -> f64 {
        self.skew
    }

    fn name(&self) -> &'static str {
        "base-rejection"
    }
}
