//! Cancellation-free building blocks for the power-law closed forms.
//!
//! Both samplers that integrate `x^(-s)` end up evaluating
//! `(x^(1-s) - 1) / (1-s)` and its inverse. Written naively these lose every
//! significant digit as `s -> 1`; the helpers below switch to a short Taylor
//! series once the argument is small enough for it to be exact in `f64`.

/// Below this magnitude the Taylor branches are used.
pub const TAYLOR_THRESHOLD: f64 = 1e-8;

/// `ln(1 + x) / x`, continuous at `x = 0` where it equals 1.
#[inline]
pub fn log1p_ratio(x: f64) -> f64 {
    if x.abs() > TAYLOR_THRESHOLD {
        x.ln_1p() / x
    } else {
        1.0 - x * (0.5 - x * (1.0 / 3.0 - 0.25 * x))
    }
}

/// `(e^x - 1) / x`, continuous at `x = 0` where it equals 1.
#[inline]
pub fn expm1_ratio(x: f64) -> f64 {
    if x.abs() > TAYLOR_THRESHOLD {
        x.exp_m1() / x
    } else {
        1.0 + x * 0.5 * (1.0 + x * (1.0 / 3.0) * (1.0 + 0.25 * x))
    }
}

/// `(x^(1-s) - 1) / (1-s)` for `x > 0`; tends to `ln x` as `s -> 1`.
#[inline]
pub fn power_integral(x: f64, s: f64) -> f64 {
    let log_x = x.ln();
    expm1_ratio((1.0 - s) * log_x) * log_x
}

/// Inverse of [`power_integral`]: `(1 + (1-s)·y)^(1/(1-s))`.
///
/// The base is clamped at zero so that arguments past the pole map to 0
/// instead of NaN.
#[inline]
pub fn power_integral_inverse(y: f64, s: f64) -> f64 {
    let mut t = y * (1.0 - s);
    if t < -1.0 {
        t = -1.0;
    }
    (log1p_ratio(t) * y).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ratios_are_one_at_zero() {
        assert_eq!(log1p_ratio(0.0), 1.0);
        assert_eq!(expm1_ratio(0.0), 1.0);
    }

    #[test]
    fn taylor_branch_matches_direct_formula_near_threshold() {
        // Just above the threshold the direct formula is still accurate, so
        // both branches must agree on either side of the switch.
        for x in [2e-8, -2e-8, 5e-9, -5e-9] {
            assert_relative_eq!(log1p_ratio(x), 1.0 - x / 2.0, max_relative = 1e-15);
            assert_relative_eq!(expm1_ratio(x), 1.0 + x / 2.0, max_relative = 1e-15);
        }
    }

    #[test]
    fn direct_branch_away_from_zero() {
        assert_relative_eq!(log1p_ratio(0.5), 1.5f64.ln() / 0.5, max_relative = 1e-15);
        assert_relative_eq!(expm1_ratio(-0.3), ((-0.3f64).exp() - 1.0) / -0.3, max_relative = 1e-15);
    }

    #[test]
    fn power_integral_matches_closed_form_away_from_one() {
        for s in [0.5, 0.9, 1.2, 2.0, 3.5] {
            for x in [1.5, 2.5, 10.0, 1e6] {
                let direct = (f64::powf(x, 1.0 - s) - 1.0) / (1.0 - s);
                assert_relative_eq!(power_integral(x, s), direct, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn power_integral_tends_to_log_at_one() {
        for x in [1.5, 100.0, 1e7] {
            assert_relative_eq!(power_integral(x, 1.0), f64::ln(x), max_relative = 1e-15);
            let near = power_integral(x, 1.0 + 1e-7);
            assert!(near.is_finite());
            assert_relative_eq!(near, f64::ln(x), max_relative = 1e-5);
        }
    }

    #[test]
    fn inverse_round_trips() {
        for s in [0.3, 1.0 - 1e-7, 1.0, 1.0 + 1e-7, 1.7] {
            for x in [1.0, 1.5, 42.0, 1e5] {
                let y = power_integral(x, s);
                assert_relative_eq!(power_integral_inverse(y, s), x, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn inverse_clamps_past_pole() {
        // For s < 1 the integral is bounded below by -1/(1-s).
        let v = power_integral_inverse(-10.0, 0.5);
        assert_eq!(v, 0.0);
    }
}
