use anyhow::{anyhow, Result};
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Wraps `rand_distr::Zipf` as a baseline to compare the in-tree samplers against.
pub struct ReferenceZipf {
    dist: Zipf<f64>,
    rng: Xoshiro256PlusPlus,
    range: u64,
}

impl ReferenceZipf {
    pub fn new(range: u64, skew: f64, seed: u64) -> Result<Self> {
        let dist = Zipf::new(range, skew)
            .map_err(|e| anyhow!("rand_distr rejected range={range} skew={skew}: {e:?}"))?;
        Ok(Self {
            dist,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            range,
        })
    }

    /// Generate the next item ID (1-based).
    pub fn next_id(&mut self) -> u64 {
        let k = self.rng.sample(&self.dist) as u64;
        k.clamp(1, self.range)
    }
}
