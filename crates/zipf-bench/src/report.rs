use crate::generator::GeneratorKind;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::Instant;
use zipf_sampler::stats::{
    chi_squared, kl_divergence, ks_statistic, total_variation, zipf_pmf_vector,
};

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub skew: f64,
    pub n: u64,
    pub samples: u64,
    pub timestamp: String,
}

/// JSON envelope shared by the perf and accuracy reports.
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub metadata: Metadata,
    pub results: BTreeMap<String, T>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PerfResult {
    pub millis: f64,
    pub ns_per_sample: f64,
    pub construct_millis: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccuracyResult {
    pub kl_divergence: f64,
    pub tvd: f64,
    pub ks_test: f64,
    pub chi_squared: f64,
    pub chi_squared_df: usize,
}

impl<T: Serialize> Report<T> {
    fn new(range: u64, skew: f64, samples: u64, now: DateTime<Local>) -> Self {
        Self {
            metadata: Metadata {
                skew,
                n: range,
                samples,
                timestamp: now.to_rfc3339(),
            },
            results: BTreeMap::new(),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// `<dir>/<kind>-n<range>-s<skew>-<YYYY-mm-dd-HH-MM>.<ext>`
pub fn output_path(
    dir: &Path,
    kind: &str,
    range: u64,
    skew: f64,
    now: DateTime<Local>,
    ext: &str,
) -> PathBuf {
    let stamp = now.format("%Y-%m-%d-%H-%M");
    dir.join(format!("{kind}-n{range}-s{skew}-{stamp}.{ext}"))
}

/// Time `samples` draws per generator. Construction is timed separately.
pub fn run_perf(
    range: u64,
    skew: f64,
    samples: u64,
    seed: u64,
    generators: &[GeneratorKind],
) -> Result<Report<PerfResult>> {
    let mut report = Report::new(range, skew, samples, Local::now());
    for &kind in generators {
        let start = Instant::now();
        let mut gen = kind.build(range, skew, seed)?;
        let construct = start.elapsed();

        let start = Instant::now();
        for _ in 0..samples {
            black_box(gen.next());
        }
        let elapsed = start.elapsed();

        let result = PerfResult {
            millis: elapsed.as_secs_f64() * 1e3,
            ns_per_sample: elapsed.as_nanos() as f64 / samples.max(1) as f64,
            construct_millis: construct.as_secs_f64() * 1e3,
        };
        tracing::info!(
            generator = %kind,
            millis = format!("{:.1}", result.millis),
            ns_per_sample = format!("{:.2}", result.ns_per_sample),
            "perf run complete"
        );
        report.results.insert(kind.to_string(), result);
    }
    Ok(report)
}

/// Draw `samples` per generator and score the counts against the exact PMF.
pub fn run_accuracy(
    range: u64,
    skew: f64,
    samples: u64,
    seed: u64,
    generators: &[GeneratorKind],
) -> Result<Report<AccuracyResult>> {
    let mut report = Report::new(range, skew, samples, Local::now());
    let expected = zipf_pmf_vector(skew, range);
    for &kind in generators {
        let mut gen = kind.build(range, skew, seed)?;
        let mut counts = vec![0u64; range as usize];
        for _ in 0..samples {
            counts[(gen.next() - 1) as usize] += 1;
        }
        let chi = chi_squared(&counts, &expected);
        let result = AccuracyResult {
            kl_divergence: kl_divergence(&counts, &expected),
            tvd: total_variation(&counts, &expected),
            ks_test: ks_statistic(&counts, &expected),
            chi_squared: chi.statistic,
            chi_squared_df: chi.degrees_of_freedom,
        };
        tracing::info!(
            generator = %kind,
            kl = result.kl_divergence,
            tvd = result.tvd,
            ks = result.ks_test,
            "accuracy run complete"
        );
        report.results.insert(kind.to_string(), result);
    }
    Ok(report)
}
