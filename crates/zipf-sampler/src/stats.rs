//! Goodness-of-fit measures between observed draw counts and the Zipf PMF.
//!
//! `counts[i]` is the number of draws equal to `i + 1`.

pub use crate::harmonic::zipf_pmf_vector;

fn empirical(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// `KL(empirical || expected)`, both smoothed by `1e-12` to avoid log(0).
pub fn kl_divergence(counts: &[u64], expected: &[f64]) -> f64 {
    const EPS: f64 = 1e-12;
    let p = empirical(counts);
    let p_sum: f64 = p.iter().map(|x| x + EPS).sum();
    let q_sum: f64 = expected.iter().map(|x| x + EPS).sum();
    p.iter()
        .zip(expected)
        .map(|(&pi, &qi)| {
            let pi = (pi + EPS) / p_sum;
            let qi = (qi + EPS) / q_sum;
            pi * (pi / qi).ln()
        })
        .sum()
}

/// Total variation distance `½ Σ |p_k - q_k|`.
pub fn total_variation(counts: &[u64], expected: &[f64]) -> f64 {
    let p = empirical(counts);
    0.5 * p
        .iter()
        .zip(expected)
        .map(|(a, b)| (a - b).abs())
        .sum::<f64>()
}

/// Largest absolute difference between the empirical and expected CDFs.
pub fn ks_statistic(counts: &[u64], expected: &[f64]) -> f64 {
    let p = empirical(counts);
    let mut cp = 0.0;
    let mut cq = 0.0;
    let mut max: f64 = 0.0;
    for (a, b) in p.iter().zip(expected) {
        cp += a;
        cq += b;
        max = max.max((cp - cq).abs());
    }
    max
}

/// Pearson chi-squared statistic and its degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquared {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
}

impl ChiSquared {
    /// Whether the fit passes at the level implied by the normal quantile `z`.
    pub fn passes(&self, z: f64) -> bool {
        self.statistic <= chi_squared_critical(self.degrees_of_freedom, z)
    }
}

/// Chi-squared statistic of `counts` against `expected` probabilities.
///
/// Consecutive cells are pooled until each pooled cell expects at least 5
/// draws; a short remainder at the tail is merged into the last full cell.
pub fn chi_squared(counts: &[u64], expected: &[f64]) -> ChiSquared {
    const MIN_EXPECTED: f64 = 5.0;
    let total: u64 = counts.iter().sum();
    let total = total as f64;

    let mut cells: Vec<(f64, f64)> = Vec::new();
    let mut observed = 0.0;
    let mut wanted = 0.0;
    for (&c, &p) in counts.iter().zip(expected) {
        observed += c as f64;
        wanted += p * total;
        if wanted >= MIN_EXPECTED {
            cells.push((observed, wanted));
            observed = 0.0;
            wanted = 0.0;
        }
    }
    if wanted > 0.0 || observed > 0.0 {
        match cells.last_mut() {
            Some(last) => {
                last.0 += observed;
                last.1 += wanted;
            }
            None => cells.push((observed, wanted)),
        }
    }

    let statistic = cells
        .iter()
        .filter(|(_, e)| *e > 0.0)
        .map(|(o, e)| (o - e) * (o - e) / e)
        .sum();
    ChiSquared {
        statistic,
        degrees_of_freedom: cells.len().saturating_sub(1),
    }
}

/// Upper critical value of the chi-squared distribution.
///
/// Wilson–Hilferty approximation; `z` is the standard-normal quantile of the
/// desired significance (3.09 for 0.001, 3.719 for 0.0001).
pub fn chi_squared_critical(df: usize, z: f64) -> f64 {
    if df == 0 {
        return 0.0;
    }
    let k = df as f64;
    let a = 2.0 / (9.0 * k);
    k * (1.0 - a + z * a.sqrt()).powi(3)
}
