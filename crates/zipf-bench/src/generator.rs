use crate::reference::ReferenceZipf;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zipf_sampler::{create, Algorithm, Sampler, ZipfSampler};

/// Anything the driver can draw from: an in-tree algorithm or the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeneratorKind {
    Core(Algorithm),
    RandDistr,
}

impl GeneratorKind {
    pub fn all() -> Vec<GeneratorKind> {
        Algorithm::ALL
            .iter()
            .copied()
            .map(GeneratorKind::Core)
            .chain(std::iter::once(GeneratorKind::RandDistr))
            .collect()
    }

    pub fn build(self, range: u64, skew: f64, seed: u64) -> Result<Generator> {
        match self {
            GeneratorKind::Core(algorithm) => {
                let sampler = create(algorithm, range as i64, skew, seed)
                    .with_context(|| format!("building {algorithm} sampler"))?;
                Ok(Generator::Core(sampler))
            }
            GeneratorKind::RandDistr => Ok(Generator::Reference(ReferenceZipf::new(
                range, skew, seed,
            )?)),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Core(a) => write!(f, "{a}"),
            GeneratorKind::RandDistr => f.write_str("rand-distr"),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("rand-distr") || s.eq_ignore_ascii_case("rust") {
            return Ok(GeneratorKind::RandDistr);
        }
        Ok(GeneratorKind::Core(s.parse()?))
    }
}

impl TryFrom<String> for GeneratorKind {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<GeneratorKind> for String {
    fn from(kind: GeneratorKind) -> String {
        kind.to_string()
    }
}

/// A constructed generator.
pub enum Generator {
    Core(Sampler),
    Reference(ReferenceZipf),
}

impl Generator {
    #[inline]
    pub fn next(&mut self) -> u64 {
        match self {
            Generator::Core(s) => s.sample(),
            Generator::Reference(r) => r.next_id(),
        }
    }
}
