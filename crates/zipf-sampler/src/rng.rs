use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// 2^-53, the spacing of doubles in `[0.5, 1)` scaled down to `[0, 1)`.
const F64_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Uniform random source owned by each sampler.
///
/// Xoshiro256++ seeded through SplitMix64, so a given `u64` seed yields the
/// same stream on every platform and crate version. Not `Sync`-shared: each
/// sampler owns its own instance.
#[derive(Debug, Clone)]
pub struct Prng {
    inner: Xoshiro256PlusPlus,
}

impl Prng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform real in `[0, 1)` with 53 bits of precision.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * F64_UNIT
    }

    /// Uniform integer in `[0, 2^bits)`, taken from the high bits.
    #[inline]
    pub fn next_bits(&mut self, bits: u32) -> u64 {
        debug_assert!(bits > 0 && bits <= 64);
        self.next_u64() >> (64 - bits)
    }

    /// Uniform real in the half-open interval `(lo, hi]`.
    #[inline]
    pub fn next_in_open_closed(&mut self, lo: f64, hi: f64) -> f64 {
        hi + self.next_f64() * (lo - hi)
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::from_seed(12345);
        let mut b = Prng::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Prng::from_seed(1);
        let mut b = Prng::from_seed(2);
        let same = (0..64).filter(|_| a.next_u64() == b.next_u64()).count();
        assert!(same < 2);
    }

    #[test]
    fn unit_interval_is_half_open() {
        let mut rng = Prng::from_seed(42);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "value {v} outside [0, 1)");
        }
    }

    #[test]
    fn unit_interval_mean_is_centered() {
        let mut rng = Prng::from_seed(7);
        let n = 100_000;
        let mean = (0..n).map(|_| rng.next_f64()).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn bits_stay_below_bound() {
        let mut rng = Prng::from_seed(3);
        for _ in 0..10_000 {
            assert!(rng.next_bits(30) < 1 << 30);
        }
        assert!(rng.next_bits(1) <= 1);
    }

    #[test]
    fn open_closed_interval_excludes_lower_bound() {
        let mut rng = Prng::from_seed(9);
        for _ in 0..10_000 {
            let v = rng.next_in_open_closed(-2.0, 3.0);
            assert!(v > -2.0 && v <= 3.0, "value {v}");
        }
    }
}
