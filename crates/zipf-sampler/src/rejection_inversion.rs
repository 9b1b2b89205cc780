use crate::config::{check_params, SamplerConfig};
use crate::error::Result;
use crate::math::{power_integral, power_integral_inverse};
use crate::rng::Prng;
use crate::traits::ZipfSampler;

/// Rejection-inversion sampler (Hörmann & Derflinger, 1996).
///
/// The hat function `h(x) = x^(-s)` majorizes the Zipf weights on
/// `[k - 1/2, k + 1/2]`. A candidate is produced by inverting the hat's
/// integral `H(x)` at a uniform point, rounded to the nearest item, and
/// accepted when the uniform point falls under the item's own area.
///
/// No table and no normalizer: construction is three closed-form constants
/// and sampling is O(1) expected, with the expected number of trials
/// decreasing toward 1 as the range grows.
///
/// The shortcut `k - x <= threshold` relies on
/// `f(x) = x - H⁻¹(H(x + 1/2) - h(x))` being non-increasing for every
/// positive skew, as shown by Hörmann and Derflinger (1996). It is not re-derived
/// here; the convergence tests cover skew values on both sides of 1.
#[derive(Debug, Clone)]
pub struct RejectionInversionSampler {
    range: u64,
    skew: f64,
    /// `H(1.5) - 1`: lower end of the uniform interval.
    h_integral_x1: f64,
    /// `H(range + 0.5)`: upper end of the uniform interval.
    h_integral_range: f64,
    /// Squeeze threshold `2 - H⁻¹(H(2.5) - h(2))`.
    threshold: f64,
    rng: Prng,
}

impl RejectionInversionSampler {
    /// Fails on an empty range or a non-finite skew.
    pub fn new(range: u64, skew: f64, seed: u64) -> Result<Self> {
        check_params(range, skew)?;
        let h_integral_x1 = power_integral(1.5, skew) - 1.0;
        let h_integral_range = power_integral(range as f64 + 0.5, skew);
        let threshold =
            2.0 - power_integral_inverse(power_integral(2.5, skew) - hat(2.0, skew), skew);

        tracing::debug!(
            range,
            skew,
            h_integral_x1,
            h_integral_range,
            threshold,
            "rejection-inversion sampler built"
        );

        Ok(Self {
            range,
            skew,
            h_integral_x1,
            h_integral_range,
            threshold,
            rng: Prng::from_seed(seed),
        })
    }

    /// Lower bound of the uniform interval, `H(1.5) - 1`.
    pub fn h_integral_x1(&self) -> f64 {
        self.h_integral_x1
    }

    /// Upper bound of the uniform interval, `H(N + 0.5)`.
    pub fn h_integral_range(&self) -> f64 {
        self.h_integral_range
    }

    /// Squeeze threshold used for the fast acceptance test.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Round `x` to the nearest item and clamp into `[1, range]`.
    #[inline]
    fn nearest_item(&self, x: f64) -> u64 {
        // `as` saturates: NaN and negatives become 0, huge values u64::MAX.
        let k = (x + 0.5) as u64;
        k.clamp(1, self.range)
    }
}

/// `h(x) = x^(-s)`, computed as `exp(-s ln x)`.
#[inline]
fn hat(x: f64, s: f64) -> f64 {
    (-s * x.ln()).exp()
}

impl ZipfSampler for RejectionInversionSampler {
    fn from_config(config: &SamplerConfig) -> Result<Self> {
        let range = config.validate()?;
        Self::new(range, config.skew, config.seed)
    }

    fn sample(&mut self) -> u64 {
        loop {
            let u = self
                .rng
                .next_in_open_closed(self.h_integral_x1, self.h_integral_range);
            let x = power_integral_inverse(u, self.skew);
            let k = self.nearest_item(x);
            let kf = k as f64;

            // Items are accepted either by the squeeze, or when u lies above
            // the part of the hat that does not belong to item k.
            if kf - x <= self.threshold
                || u >= power_integral(kf + 0.5, self.skew) - hat(kf, self.skew)
            {
                return k;
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
        "rejection-inversion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZipfError;
    use approx::assert_relative_eq;

    #[test]
    fn draws_stay_in_range() {
        for (range, skew) in [(1, 1.2), (2, 0.5), (10, 2.0), (1000, 1.0), (1_000_000, 0.99)] {
            let mut sampler = RejectionInversionSampler::new(range, skew, 17).unwrap();
            for _ in 0..20_000 {
                let k = sampler.sample();
                assert!((1..=range).contains(&k), "k={k} range={range} skew={skew}");
            }
        }
    }

    #[test]
    fn rejects_empty_range_and_non_finite_skew() {
        assert_eq!(
            RejectionInversionSampler::new(0, 1.2, 0).unwrap_err(),
            ZipfError::InvalidRange { range: 0 }
        );
        assert!(matches!(
            RejectionInversionSampler::new(10, f64::INFINITY, 0),
            Err(ZipfError::InvalidSkew { .. })
        ));
    }

    #[test]
    fn single_item_always_one() {
        for skew in [0.0, 0.3, 1.0, 5.0] {
            let mut sampler = RejectionInversionSampler::new(1, skew, 99).unwrap();
            assert!((0..1000).all(|_| sampler.sample() == 1));
        }
    }

    #[test]
    fn constants_finite_near_unit_skew() {
        for skew in [1.0 - 1e-7, 1.0, 1.0 + 1e-7] {
            let sampler = RejectionInversionSampler::new(10_000_000, skew, 0).unwrap();
            assert!(sampler.h_integral_x1().is_finite());
            assert!(sampler.h_integral_range().is_finite());
            assert!(sampler.threshold().is_finite());
        }
    }

    #[test]
    fn constants_match_direct_formula_away_from_one() {
        let s: f64 = 1.5;
        let direct_h = |x: f64| (x.powf(1.0 - s) - 1.0) / (1.0 - s);
        let direct_inv = |y: f64| (1.0 + (1.0 - s) * y).powf(1.0 / (1.0 - s));

        let sampler = RejectionInversionSampler::new(1000, s, 0).unwrap();
        assert_relative_eq!(sampler.h_integral_x1(), direct_h(1.5) - 1.0, max_relative = 1e-12);
        assert_relative_eq!(sampler.h_integral_range(), direct_h(1000.5), max_relative = 1e-12);
        let threshold = 2.0 - direct_inv(direct_h(2.5) - 2f64.powf(-s));
        assert_relative_eq!(sampler.threshold(), threshold, max_relative = 1e-12);
    }

    #[test]
    fn constants_continuous_across_one() {
        let below = RejectionInversionSampler::new(1000, 1.0 - 1e-7, 0).unwrap();
        let above = RejectionInversionSampler::new(1000, 1.0 + 1e-7, 0).unwrap();
        assert_relative_eq!(below.h_integral_range(), above.h_integral_range(), max_relative = 1e-5);
        assert_relative_eq!(below.threshold(), above.threshold(), max_relative = 1e-5);
    }

    #[test]
    fn deterministic_for_seed() {
        let mut a = RejectionInversionSampler::new(500, 1.1, 42).unwrap();
        let mut b = RejectionInversionSampler::new(500, 1.1, 42).unwrap();
        for _ in 0..1000 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn head_frequency_for_skew_two() {
        let mut sampler = RejectionInversionSampler::new(10, 2.0, 42).unwrap();
        let n = 200_000;
        let ones = (0..n).filter(|_| sampler.sample() == 1).count();
        let freq = ones as f64 / n as f64;
        assert!((freq - 0.6453).abs() < 0.005, "freq {freq}");
    }

    #[test]
    fn zero_skew_is_uniform() {
        let mut sampler = RejectionInversionSampler::new(4, 0.0, 5).unwrap();
        let mut counts = [0u32; 4];
        for _ in 0..40_000 {
            counts[(sampler.sample() - 1) as usize] += 1;
        }
        for c in counts {
            assert!((9_400..=10_600).contains(&c), "counts {counts:?}");
        }
    }
}
