use crate::base_rejection::BaseRejectionSampler;
use crate::condensed_table::CondensedTableSampler;
use crate::config::SamplerConfig;
use crate::error::{Result, ZipfError};
use crate::rejection_inversion::RejectionInversionSampler;
use crate::traits::ZipfSampler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Which sampling algorithm to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Exact Hörmann–Derflinger rejection-inversion.
    #[serde(alias = "rji")]
    RejectionInversion,
    /// Marsaglia–Tsang–Wang quantized table.
    #[serde(alias = "condensed", alias = "marsaglia")]
    CondensedTable,
    /// Closed-form power-law rejection.
    #[serde(alias = "base")]
    BaseRejection,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::RejectionInversion,
        Algorithm::CondensedTable,
        Algorithm::BaseRejection,
    ];

    /// Short name used on the command line.
    pub fn short_name(self) -> &'static str {
        match self {
            Algorithm::RejectionInversion => "rji",
            Algorithm::CondensedTable => "condensed",
            Algorithm::BaseRejection => "base",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Algorithm {
    type Err = ZipfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rji" | "rejection-inversion" => Ok(Algorithm::RejectionInversion),
            "condensed" | "condensed-table" | "marsaglia" => Ok(Algorithm::CondensedTable),
            "base" | "base-rejection" => Ok(Algorithm::BaseRejection),
            _ => Err(ZipfError::UnknownAlgorithm { name: s.to_string() }),
        }
    }
}

/// A Zipf sampler of any algorithm, chosen once at construction.
///
/// Dispatch is a `match` over a closed set; an instance never changes
/// algorithm. This is the handle external drivers hold: build it with
/// [`create`], draw with [`Sampler::sample`], release it with [`destroy`]
/// (or by dropping it).
#[derive(Debug, Clone)]
pub enum Sampler {
    RejectionInversion(RejectionInversionSampler),
    CondensedTable(CondensedTableSampler),
    BaseRejection(BaseRejectionSampler),
}

impl Sampler {
    pub fn new(algorithm: Algorithm, config: &SamplerConfig) -> Result<Self> {
        Ok(match algorithm {
            Algorithm::RejectionInversion => {
                Sampler::RejectionInversion(RejectionInversionSampler::from_config(config)?)
            }
            Algorithm::CondensedTable => {
                Sampler::CondensedTable(CondensedTableSampler::from_config(config)?)
            }
            Algorithm::BaseRejection => {
                Sampler::BaseRejection(BaseRejectionSampler::from_config(config)?)
            }
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Sampler::RejectionInversion(_) => Algorithm::RejectionInversion,
            Sampler::CondensedTable(_) => Algorithm::CondensedTable,
            Sampler::BaseRejection(_) => Algorithm::BaseRejection,
        }
    }

    /// Time `samples` consecutive draws.
    ///
    /// Convenience for drivers; not part of the statistical contract.
    pub fn benchmark(&mut self, samples: u64) -> Duration {
        let start = Instant::now();
        let mut acc = 0u64;
        for _ in 0..samples {
            acc = acc.wrapping_add(self.sample());
        }
        std::hint::black_box(acc);
        start.elapsed()
    }

    /// Endless iterator of draws borrowing this sampler.
    pub fn sample_iter(&mut self) -> SampleIter<'_> {
        SampleIter { sampler: self }
    }
}

impl ZipfSampler for Sampler {
    /// Builds the default algorithm, rejection-inversion.
    fn from_config(config: &SamplerConfig) -> Result<Self> {
        Sampler::new(Algorithm::RejectionInversion, config)
    }

    #[inline]
    fn sample(&mut self) -> u64 {
        match self {
            Sampler::RejectionInversion(s) => s.sample(),
            Sampler::CondensedTable(s) => s.sample(),
            Sampler::BaseRejection(s) => s.sample(),
        }
    }

    fn range(&self) -> u64 {
        match self {
            Sampler::RejectionInversion(s) => s.range(),
            Sampler::CondensedTable(s) => s.range(),
            Sampler::BaseRejection(s) => s.range(),
        }
    }

    fn skew(&self) -> f64 {
        match self {
            Sampler::RejectionInversion(s) => s.skew(),
            Sampler::CondensedTable(s) => s.skew(),
            Sampler::BaseRejection(s) => s.skew(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Sampler::RejectionInversion(s) => s.name(),
            Sampler::CondensedTable(s) => s.name(),
            Sampler::BaseRejection(s) => s.name(),
        }
    }
}

/// Iterator returned by [`Sampler::sample_iter`].
pub struct SampleIter<'a> {
    sampler: &'a mut Sampler,
}

impl Iterator for SampleIter<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        Some(self.sampler.sample())
    }
}

/// Build a sampler for `(range, skew, seed)`.
///
/// Fails with an invalid-config error when `range <= 0` or the skew is not
/// finite.
pub fn create(algorithm: Algorithm, range: i64, skew: f64, seed: u64) -> Result<Sampler> {
    Sampler::new(algorithm, &SamplerConfig::new(range, skew, seed))
}

/// Release a sampler and everything it owns.
pub fn destroy(sampler: Sampler) {
    drop(sampler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("rji".parse::<Algorithm>().unwrap(), Algorithm::RejectionInversion);
        assert_eq!("Marsaglia".parse::<Algorithm>().unwrap(), Algorithm::CondensedTable);
        assert_eq!("base-rejection".parse::<Algorithm>().unwrap(), Algorithm::BaseRejection);
        assert!(matches!(
            "alias".parse::<Algorithm>(),
            Err(ZipfError::UnknownAlgorithm { .. })
        ));
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn create_rejects_non_positive_range() {
        for algorithm in Algorithm::ALL {
            for range in [0, -7] {
                let err = create(algorithm, range, 1.0, 0).unwrap_err();
                assert!(err.is_invalid_config());
            }
        }
    }

    #[test]
    fn create_sample_destroy_scenario() {
        // range 10, skew 2, seed 42: five draws in {1..10}.
        for algorithm in Algorithm::ALL {
            let mut sampler = create(algorithm, 10, 2.0, 42).unwrap();
            assert_eq!(sampler.algorithm(), algorithm);
            assert_eq!(sampler.range(), 10);
            let draws: Vec<u64> = sampler.sample_iter().take(5).collect();
            assert!(draws.iter().all(|k| (1..=10).contains(k)), "{algorithm}: {draws:?}");
            destroy(sampler);
        }
    }

    #[test]
    fn independent_instances_with_same_seed() {
        for algorithm in Algorithm::ALL {
            let mut a = create(algorithm, 1000, 1.2, 7).unwrap();
            let mut b = create(algorithm, 1000, 1.2, 7).unwrap();
            // Advancing one must not affect the other.
            let head: Vec<u64> = a.sample_iter().take(100).collect();
            let replay: Vec<u64> = b.sample_iter().take(100).collect();
            assert_eq!(head, replay, "{algorithm}");
        }
    }

    #[test]
    fn fill_matches_repeated_sample() {
        let mut a = create(Algorithm::CondensedTable, 50, 0.9, 3).unwrap();
        let mut b = create(Algorithm::CondensedTable, 50, 0.9, 3).unwrap();
        let mut buf = [0u64; 64];
        a.fill(&mut buf);
        let expected: Vec<u64> = (0..64).map(|_| b.sample()).collect();
        assert_eq!(buf.to_vec(), expected);
    }

    #[test]
    fn benchmark_advances_state() {
        let mut a = create(Algorithm::BaseRejection, 100, 1.5, 1).unwrap();
        let mut b = create(Algorithm::BaseRejection, 100, 1.5, 1).unwrap();
        a.benchmark(10);
        for _ in 0..10 {
            b.sample();
        }
        assert_eq!(a.sample(), b.sample());
    }

    fn algorithm_strategy() -> impl Strategy<Value = Algorithm> {
        prop_oneof![
            Just(Algorithm::RejectionInversion),
            Just(Algorithm::CondensedTable),
            Just(Algorithm::BaseRejection),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn draws_always_in_range(
            algorithm in algorithm_strategy(),
            range in 1i64..5_000,
            skew in 0.01f64..4.0,
            seed in any::<u64>(),
        ) {
            let mut sampler = create(algorithm, range, skew, seed).unwrap();
            for _ in 0..2_000 {
                let k = sampler.sample();
                prop_assert!(k >= 1 && k <= range as u64, "k={} range={}", k, range);
            }
        }

        #[test]
        fn same_config_same_sequence(
            algorithm in algorithm_strategy(),
            range in 1i64..2_000,
            skew in 0.01f64..3.0,
            seed in any::<u64>(),
        ) {
            let mut a = create(algorithm, range, skew, seed).unwrap();
            let mut b = create(algorithm, range, skew, seed).unwrap();
            for _ in 0..200 {
                prop_assert_eq!(a.sample(), b.sample());
            }
        }

        #[test]
        fn near_unit_skew_stays_in_range(
            algorithm in algorithm_strategy(),
            range in 1i64..100_000,
            offset in -1e-7f64..1e-7,
        ) {
            let mut sampler = create(algorithm, range, 1.0 + offset, 0).unwrap();
            for _ in 0..500 {
                let k = sampler.sample();
                prop_assert!(k >= 1 && k <= range as u64);
            }
        }
    }
}
