use crate::config::SamplerConfig;
use crate::error::Result;

/// Common interface for all Zipf sampling algorithms.
///
/// Implementations: rejection-inversion, condensed table, base rejection.
/// All draws take `&mut self` since they advance the owned PRNG. A sampler
/// is `Send` but has no internal locking; sharing one across threads is the
/// caller's responsibility.
pub trait ZipfSampler: Send {
    /// Build a sampler for `config`, precomputing whatever the algorithm needs.
    fn from_config(config: &SamplerConfig) -> Result<Self>
    where
        Self: Sized;

    /// Draw the next variate. Always in `[1, range]`.
    fn sample(&mut self) -> u64;

    /// Number of items in the support.
    fn range(&self) -> u64;

    /// Skew exponent the sampler was built with.
    fn skew(&self) -> f64;

    /// Short human-readable name of the algorithm.
    fn name(&self) -> &'static str;

    /// Fill `out` with consecutive draws.
    fn fill(&mut self, out: &mut [u64]) {
        for slot in out.iter_mut() {
            *slot = self.sample();
        }
    }
}
