mod config;
mod generator;
mod histogram;
mod reference;
mod report;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use config::{RunConfig, RunKind, SuiteConfig};
use generator::GeneratorKind;
use histogram::BucketHistogram;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Zipf sampler driver: raw draws, histograms, throughput and accuracy reports.
#[derive(Parser)]
#[command(name = "zipf-bench")]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print raw draws, one per line
    Sample {
        #[command(flatten)]
        dist: DistArgs,
        /// Generator to draw from
        #[arg(long, default_value = "rji")]
        generator: GeneratorKind,
        /// Number of draws
        #[arg(long, default_value_t = 10)]
        count: u64,
    },
    /// Bucket draws and write a CSV histogram
    Histogram {
        #[command(flatten)]
        dist: DistArgs,
        #[arg(long, default_value = "rji")]
        generator: GeneratorKind,
        #[arg(long, default_value_t = 1_000_000)]
        samples: u64,
        #[arg(long, default_value_t = 100)]
        buckets: usize,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Time draws per generator and write a JSON report
    Perf {
        #[command(flatten)]
        run: ReportArgs,
    },
    /// Score draws per generator against the exact PMF
    Accuracy {
        #[command(flatten)]
        run: ReportArgs,
    },
    /// Run every entry of a TOML suite file
    Suite {
        /// Path to the suite file
        file: PathBuf,
    },
}

#[derive(ClapArgs)]
struct DistArgs {
    /// Number of items N
    #[arg(long, default_value_t = 1_000)]
    range: u64,
    /// Zipf exponent s
    #[arg(long, default_value_t = 0.99)]
    skew: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(ClapArgs)]
struct ReportArgs {
    #[command(flatten)]
    dist: DistArgs,
    #[arg(long, default_value_t = 1_000_000)]
    samples: u64,
    /// Comma-separated generators (defaults to all)
    #[arg(long, value_delimiter = ',')]
    generators: Vec<GeneratorKind>,
    /// Directory for the JSON report (stdout when omitted)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl ReportArgs {
    fn generators(&self) -> Vec<GeneratorKind> {
        if self.generators.is_empty() {
            GeneratorKind::all()
        } else {
            self.generators.clone()
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    match args.command {
        Command::Sample {
            dist,
            generator,
            count,
        } => {
            let mut gen = generator.build(dist.range, dist.skew, dist.seed)?;
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            for _ in 0..count {
                writeln!(out, "{}", gen.next())?;
            }
            out.flush()?;
        }
        Command::Histogram {
            dist,
            generator,
            samples,
            buckets,
            output,
        } => {
            let hist =
                build_histogram(generator, dist.range, dist.skew, dist.seed, samples, buckets)?;
            match output {
                Some(path) => {
                    hist.write_csv_file(&path)?;
                    tracing::info!(path = %path.display(), "histogram written");
                }
                None => hist.write_csv(std::io::stdout().lock())?,
            }
        }
        Command::Perf { run } => {
            let report = report::run_perf(
                run.dist.range,
                run.dist.skew,
                run.samples,
                run.dist.seed,
                &run.generators(),
            )?;
            emit_report(&report, run.output_dir.as_deref(), "perf", &run.dist)?;
        }
        Command::Accuracy { run } => {
            let report = report::run_accuracy(
                run.dist.range,
                run.dist.skew,
                run.samples,
                run.dist.seed,
                &run.generators(),
            )?;
            emit_report(&report, run.output_dir.as_deref(), "accuracy", &run.dist)?;
        }
        Command::Suite { file } => {
            let suite = SuiteConfig::load(&file)?;
            run_suite(&suite)?;
        }
    }
    Ok(())
}

fn build_histogram(
    generator: GeneratorKind,
    range: u64,
    skew: f64,
    seed: u64,
    samples: u64,
    buckets: usize,
) -> Result<BucketHistogram> {
    anyhow::ensure!(buckets > 0, "buckets must be > 0");
    let mut gen = generator.build(range, skew, seed)?;
    let mut hist = BucketHistogram::new(range, buckets);
    for _ in 0..samples {
        hist.record(gen.next());
    }
    Ok(hist)
}

fn emit_report<T: serde::Serialize>(
    report: &report::Report<T>,
    dir: Option<&Path>,
    kind: &str,
    dist: &DistArgs,
) -> Result<()> {
    match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            let path =
                report::output_path(dir, kind, dist.range, dist.skew, Local::now(), "json");
            report.write_json(&path)?;
            tracing::info!(path = %path.display(), "{kind} report written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_suite(suite: &SuiteConfig) -> Result<()> {
    std::fs::create_dir_all(&suite.output_dir)
        .with_context(|| format!("creating {}", suite.output_dir.display()))?;
    tracing::info!(
        runs = suite.runs.len(),
        output_dir = %suite.output_dir.display(),
        "suite starting"
    );
    for (i, run) in suite.runs.iter().enumerate() {
        tracing::info!(index = i, kind = ?run.kind, range = run.range, skew = run.skew, "run");
        run_one(run, &suite.output_dir).with_context(|| format!("suite run {i}"))?;
    }
    Ok(())
}

fn run_one(run: &RunConfig, dir: &Path) -> Result<()> {
    let now = Local::now();
    let path = |name: &str, ext: &str| report::output_path(dir, name, run.range, run.skew, now, ext);
    match run.kind {
        RunKind::Perf => {
            let report =
                report::run_perf(run.range, run.skew, run.samples, run.seed, &run.generators)?;
            report.write_json(&path("perf", "json"))
        }
        RunKind::Accuracy => {
            let report =
                report::run_accuracy(run.range, run.skew, run.samples, run.seed, &run.generators)?;
            report.write_json(&path("accuracy", "json"))
        }
        RunKind::Histogram => {
            for &kind in &run.generators {
                let hist =
                    build_histogram(kind, run.range, run.skew, run.seed, run.samples, run.buckets)?;
                hist.write_csv_file(&path(&format!("histogram-{kind}"), "csv"))?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_report_args() {
        let args = Args::try_parse_from([
            "zipf-bench",
            "perf",
            "--range",
            "500",
            "--skew",
            "1.3",
            "--generators",
            "rji,base,rand-distr",
        ])
        .unwrap();
        match args.command {
            Command::Perf { run } => {
                assert_eq!(run.dist.range, 500);
                assert_eq!(run.generators().len(), 3);
            }
            _ => panic!("expected perf"),
        }
    }

    #[test]
    fn histogram_counts_every_draw() {
        let hist = build_histogram("condensed".parse().unwrap(), 100, 1.0, 1, 5_000, 10).unwrap();
        assert_eq!(hist.total(), 5_000);
        let rows = hist.rows();
        assert!(rows[0].cnt > rows[9].cnt);
    }

    #[test]
    fn suite_writes_one_file_per_output() {
        let dir = tempfile::tempdir().unwrap();
        let suite: SuiteConfig = toml::from_str(&format!(
            r#"
            output_dir = "{}"

            [[run]]
            kind = "perf"
            range = 100
            skew = 1.1
            samples = 1000

            [[run]]
            kind = "histogram"
            range = 100
            skew = 1.1
            samples = 1000
            buckets = 4
            generators = ["rji", "base"]
            "#,
            dir.path().join("out").display()
        ))
        .unwrap();
        run_suite(&suite).unwrap();
        let written = std::fs::read_dir(dir.path().join("out")).unwrap().count();
        assert_eq!(written, 3);
    }
}
