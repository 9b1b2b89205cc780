use crate::config::{check_params, SamplerConfig};
use crate::error::{Result, ZipfError};
use crate::harmonic::zipf_pmf_vector;
use crate::rng::Prng;
use crate::traits::ZipfSampler;

/// Probabilities are quantized to multiples of 2^-30.
pub const PRECISION_BITS: u32 = 30;
/// Sum of all quantized weights.
pub const TOTAL_WEIGHT: u32 = 1 << PRECISION_BITS;

const DIGITS: usize = 5;
const DIGIT_BITS: u32 = 6;
const DIGIT_MASK: u32 = (1 << DIGIT_BITS) - 1;

/// Largest range the table can hold: items are stored as `u32`.
pub const MAX_RANGE: i64 = u32::MAX as i64;

/// Base-64 digit `pos` (0 = most significant, bits 24..29) of a weight.
///
/// The top digit is left unmasked so that a single item holding all of
/// 2^30 becomes 64 entries in the first sub-table.
#[inline]
fn digit(weight: u32, pos: usize) -> u32 {
    let shifted = weight >> (PRECISION_BITS - DIGIT_BITS * (pos as u32 + 1));
    if pos == 0 {
        shifted
    } else {
        shifted & DIGIT_MASK
    }
}

/// Quantize the Zipf PMF over `[1, range]` to integers summing to exactly 2^30.
///
/// Each `p_k = k^(-s) / H(s, N)` is rounded to the nearest multiple of 2^-30;
/// the largest weight (first one on ties) then absorbs the signed rounding
/// drift. The unquantized PMF is dropped before returning.
///
/// When the drift is larger than the largest weight can absorb (near-uniform
/// PMFs over millions of items) it is spread one unit per item instead.
pub fn quantized_weights(range: u64, skew: f64) -> Result<Vec<u32>> {
    let degenerate = || ZipfError::DegenerateDistribution {
        range: range as i64,
        skew,
    };

    let pmf = zipf_pmf_vector(skew, range);
    let sum: f64 = pmf.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(degenerate());
    }

    let scale = TOTAL_WEIGHT as f64 / sum;
    let mut weights = Vec::with_capacity(pmf.len());
    let mut accum: i64 = 0;
    let mut max_index = 0;
    let mut max_weight = 0;
    for (i, p) in pmf.iter().enumerate() {
        let w = (p * scale + 0.5) as u32;
        accum += w as i64;
        if w > max_weight {
            max_weight = w;
            max_index = i;
        }
        weights.push(w);
    }
    drop(pmf);

    let drift = TOTAL_WEIGHT as i64 - accum;
    let corrected = weights[max_index] as i64 + drift;
    if (0..=TOTAL_WEIGHT as i64).contains(&corrected) {
        weights[max_index] = corrected as u32;
    } else {
        // Only reachable for near-uniform weights over huge ranges, where
        // every item rounds the same way; spread the drift one unit per item.
        spread_drift(&mut weights, drift);
    }
    Ok(weights)
}

fn spread_drift(weights: &mut [u32], mut drift: i64) {
    while drift != 0 {
        for w in weights.iter_mut() {
            if drift > 0 {
                *w += 1;
                drift -= 1;
            } else if drift < 0 && *w > 0 {
                *w -= 1;
                drift += 1;
            }
            if drift == 0 {
                break;
            }
        }
    }
}

/// Marsaglia–Tsang–Wang condensed lookup table.
///
/// Every weight is split into five base-64 digits; item `k` is repeated
/// `digit_i(m_k)` times in sub-table `i`. All five sub-tables live in one
/// contiguous allocation, addressed through `starts`. A 30-bit uniform `j`
/// selects a sub-table by comparing against the cumulative boundaries and
/// then indexes it by shifting out the lower digits.
#[derive(Debug, Clone)]
pub struct CondensedTable {
    items: Vec<u32>,
    /// Start offset of each sub-table within `items`.
    starts: [usize; DIGITS + 1],
    /// Cumulative boundaries `t1..t4`.
    bounds: [u32; DIGITS - 1],
}

impl CondensedTable {
    /// Build from weights summing to [`TOTAL_WEIGHT`]; entry `i` is item `i + 1`.
    ///
    /// Any other total would leave some 30-bit indices without a slot, so it
    /// is rejected with [`ZipfError::WeightSumMismatch`].
    pub fn from_weights(weights: &[u32]) -> Result<Self> {
        if weights.len() as u64 > MAX_RANGE as u64 {
            return Err(ZipfError::RangeTooLarge {
                range: weights.len() as i64,
                max: MAX_RANGE,
            });
        }
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total != TOTAL_WEIGHT as u64 {
            return Err(ZipfError::WeightSumMismatch {
                total,
                expected: TOTAL_WEIGHT as u64,
            });
        }

        let mut sizes = [0usize; DIGITS];
        for &w in weights {
            for (pos, size) in sizes.iter_mut().enumerate() {
                *size += digit(w, pos) as usize;
            }
        }

        let mut starts = [0usize; DIGITS + 1];
        for pos in 0..DIGITS {
            starts[pos + 1] = starts[pos] + sizes[pos];
        }

        let mut items = vec![0u32; starts[DIGITS]];
        let mut cursor = starts;
        for (i, &w) in weights.iter().enumerate() {
            let item = i as u32 + 1;
            for pos in 0..DIGITS {
                let n = digit(w, pos) as usize;
                items[cursor[pos]..cursor[pos] + n].fill(item);
                cursor[pos] += n;
            }
        }

        let mut bounds = [0u32; DIGITS - 1];
        let mut acc = 0u32;
        for (pos, bound) in bounds.iter_mut().enumerate() {
            let shift = PRECISION_BITS - DIGIT_BITS * (pos as u32 + 1);
            acc += (sizes[pos] as u32) << shift;
            *bound = acc;
        }

        Ok(Self {
            items,
            starts,
            bounds,
        })
    }

    /// Map a 30-bit uniform integer to an item in O(1).
    #[inline]
    pub fn lookup(&self, j: u32) -> u32 {
        let [t1, t2, t3, t4] = self.bounds;
        let (table, offset) = if j < t1 {
            (0, j >> 24)
        } else if j < t2 {
            (1, (j - t1) >> 18)
        } else if j < t3 {
            (2, (j - t2) >> 12)
        } else if j < t4 {
            (3, (j - t3) >> 6)
        } else {
            (4, j - t4)
        };
        self.items[self.starts[table] + offset as usize]
    }

    /// Number of entries in sub-table `pos` (0..5).
    pub fn sub_table_len(&self, pos: usize) -> usize {
        self.starts[pos + 1] - self.starts[pos]
    }

    /// Total entries across all sub-tables.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the weights the table encodes; 2^30 for a valid table.
    pub fn total_weight(&self) -> u64 {
        self.bounds[DIGITS - 2] as u64 + self.sub_table_len(DIGITS - 1) as u64
    }

    /// Cumulative sub-table boundaries `t1..t4`.
    pub fn bounds(&self) -> [u32; DIGITS - 1] {
        self.bounds
    }
}

/// Condensed-table sampler.
///
/// O(N) construction (harmonic normalizer, quantized PMF, table fill) buys
/// O(1) worst-case sampling with no rejection and no floating point per
/// draw. Table memory is proportional to the sum of the weights' digits.
#[derive(Debug, Clone)]
pub struct CondensedTableSampler {
    range: u64,
    skew: f64,
    table: CondensedTable,
    rng: Prng,
}

impl CondensedTableSampler {
    pub fn new(range: u64, skew: f64, seed: u64) -> Result<Self> {
        check_params(range, skew)?;
        if range > MAX_RANGE as u64 {
            return Err(ZipfError::RangeTooLarge {
                range: range as i64,
                max: MAX_RANGE,
            });
        }
        let weights = quantized_weights(range, skew)?;
        let table = CondensedTable::from_weights(&weights)?;

        tracing::debug!(
            range,
            skew,
            entries = table.len(),
            sub_tables = ?(0..DIGITS).map(|p| table.sub_table_len(p)).collect::<Vec<_>>(),
            "condensed table built"
        );

        Ok(Self {
            range,
            skew,
            table,
            rng: Prng::from_seed(seed),
        })
    }

    pub fn table(&self) -> &CondensedTable {
        &self.table
    }
}

impl ZipfSampler for CondensedTableSampler {
    fn from_config(config: &SamplerConfig) -> Result<Self> {
        let range = config.validate()?;
        Self::new(range, config.skew, config.seed)
    }

    fn sample(&mut self) -> u64 {
        let j = self.rng.next_bits(PRECISION_BITS) as u32;
        self.table.lookup(j) as u64
    }

    fn range(&self) -> u64 {
        self.range
    }

    fn skew(&self) -> f64 {
        self.skew
    }

    fn name(&self) -> &'static str {
        "condensed-table"
    }
}
