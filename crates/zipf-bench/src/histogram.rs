use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Fixed-width bucket counts over `[1, range]`.
pub struct BucketHistogram {
    range: u64,
    counts: Vec<u64>,
    total: u64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BucketRow {
    pub bucket_num: usize,
    pub cnt: u64,
    pub rel_freq: f64,
}

impl BucketHistogram {
    pub fn new(range: u64, buckets: usize) -> Self {
        assert!(buckets > 0, "bucket count must be > 0");
        Self {
            range,
            counts: vec![0; buckets],
            total: 0,
        }
    }

    /// Record one 1-based draw. Bucket is `(item - 1) * buckets / range`, so
    /// every bucket covers the same number of items (within one).
    #[inline]
    pub fn record(&mut self, item: u64) {
        let buckets = self.counts.len() as u128;
        let offset = item.saturating_sub(1) as u128;
        let idx = (offset * buckets / self.range as u128).min(buckets - 1);
        self.counts[idx as usize] += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn rows(&self) -> Vec<BucketRow> {
        self.counts
            .iter()
            .enumerate()
            .map(|(bucket_num, &cnt)| BucketRow {
                bucket_num,
                cnt,
                rel_freq: if self.total > 0 {
                    cnt as f64 / self.total as f64
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Write `bucket_num,cnt,rel_freq` rows with a header.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        for row in self.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}
