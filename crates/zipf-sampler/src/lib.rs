//! Zipfian variate generation over `[1, N]`.
//!
//! Three algorithms share one contract ([`ZipfSampler`]) and one handle
//! type ([`Sampler`]):
//!
//! - [`RejectionInversionSampler`]: exact, O(1) construction, O(1)
//!   expected draws.
//! - [`CondensedTableSampler`]: O(N) construction, O(1) worst-case draws
//!   with no rejection.
//! - [`BaseRejectionSampler`]: O(1) construction, cheaper trials, lower
//!   acceptance for small ranges.
//!
//! ```
//! use zipf_sampler::{create, Algorithm, ZipfSampler};
//!
//! let mut sampler = create(Algorithm::RejectionInversion, 1_000, 1.2, 42).unwrap();
//! let k = sampler.sample();
//! assert!((1..=1_000).contains(&k));
//! ```

pub mod base_rejection;
pub mod condensed_table;
pub mod config;
pub mod error;
pub mod harmonic;
pub mod math;
pub mod rejection_inversion;
pub mod rng;
pub mod sampler;
pub mod stats;
pub mod traits;

pub use base_rejection::BaseRejectionSampler;
pub use condensed_table::{CondensedTable, CondensedTableSampler};
pub use config::SamplerConfig;
pub use error::{Result, ZipfError};
pub use harmonic::{harmonic, hurwitz_zeta, zipf_pmf, zipf_pmf_vector};
pub use rejection_inversion::RejectionInversionSampler;
pub use rng::Prng;
pub use sampler::{create, destroy, Algorithm, SampleIter, Sampler};
pub use traits::ZipfSampler;
