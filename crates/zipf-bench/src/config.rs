use crate::generator::GeneratorKind;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct SuiteConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default, rename = "run")]
    pub runs: Vec<RunConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Perf,
    Accuracy,
    Histogram,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub kind: RunKind,
    pub range: u64,
    pub skew: f64,
    #[serde(default = "default_samples")]
    pub samples: u64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_buckets")]
    pub buckets: usize,
    #[serde(default = "GeneratorKind::all")]
    pub generators: Vec<GeneratorKind>,
}

impl SuiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading suite file {}", path.display()))?;
        let config: SuiteConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing suite file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (i, run) in self.runs.iter().enumerate() {
            if run.range == 0 {
                bail!("run {i}: range must be > 0");
            }
            if run.samples == 0 {
                bail!("run {i}: samples must be > 0");
            }
            if run.buckets == 0 {
                bail!("run {i}: buckets must be > 0");
            }
            if run.generators.is_empty() {
                bail!("run {i}: no generators listed");
            }
        }
        Ok(())
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_samples() -> u64 {
    1_000_000
}

fn default_buckets() -> usize {
    100
}
