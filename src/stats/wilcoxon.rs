//! Wilcoxon signed-rank test for paired differences.
//!
//! Exact signed-rank distribution for small untied samples, tie-corrected
//! normal approximation otherwise.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{EvalError, Result};
use crate::stats::rank::{average_ranks, tie_correction};

/// Largest sample size for which the exact null distribution is enumerated.
const EXACT_LIMIT: usize = 25;

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// The difference distribution is shifted away from zero in either
    /// direction.
    #[default]
    TwoSided,
    /// The differences are shifted above zero.
    Greater,
    /// The differences are shifted below zero.
    Less,
}

/// Wilcoxon signed-rank test result.
#[derive(Debug, Clone, PartialEq)]
pub struct WilcoxonTest {
    /// Sum of the ranks of positive differences (W+).
    pub statistic: f64,
    /// P-value under the chosen alternative.
    pub p_value: f64,
    /// Number of non-zero differences entering the test.
    pub n_nonzero: usize,
    /// Z-score of the normal approximation; `None` when the exact
    /// distribution was used.
    pub z_score: Option<f64>,
}

impl WilcoxonTest {
    /// Check whether the null is rejected at the given significance level.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Perform the Wilcoxon signed-rank test on a vector of paired differences.
///
/// Zero differences are discarded; ranks of the absolute differences use
/// midranks for ties. For at most [`EXACT_LIMIT`] untied differences the
/// p-value comes from the exact null distribution of W+, otherwise from the
/// normal approximation with tie-corrected variance.
///
/// # Arguments
/// * `diffs` - Paired differences (reference minus candidate)
/// * `alternative` - Direction of the alternative hypothesis
///
/// # Returns
/// `WilcoxonTest` with the W+ statistic and p-value.
pub fn wilcoxon_signed_rank(diffs: &[f64], alternative: Alternative) -> Result<WilcoxonTest> {
    if diffs.is_empty() {
        return Err(EvalError::EmptyData);
    }
    if diffs.iter().any(|d| !d.is_finite()) {
        return Err(EvalError::InvalidParameter(
            "differences must be finite".to_string(),
        ));
    }

    let nonzero: Vec<f64> = diffs.iter().copied().filter(|&d| d != 0.0).collect();
    let n = nonzero.len();
    if n == 0 {
        return Err(EvalError::InsufficientData { needed: 1, got: 0 });
    }

    let abs: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let ranks = average_ranks(&abs);
    let w_plus: f64 = ranks
        .iter()
        .zip(&nonzero)
        .filter(|(_, &d)| d > 0.0)
        .map(|(&r, _)| r)
        .sum();

    let ties = tie_correction(&abs);

    if n <= EXACT_LIMIT && ties == 0.0 {
        let p_value = exact_p_value(w_plus, n, alternative);
        return Ok(WilcoxonTest {
            statistic: w_plus,
            p_value,
            n_nonzero: n,
            z_score: None,
        });
    }

    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ties / 48.0;
    if variance <= 0.0 {
        return Err(EvalError::ComputationError(
            "degenerate signed-rank variance".to_string(),
        ));
    }

    let z = (w_plus - mean) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).unwrap();
    let p_value = match alternative {
        Alternative::Greater => 1.0 - normal.cdf(z),
        Alternative::Less => normal.cdf(z),
        Alternative::TwoSided => (2.0 * (1.0 - normal.cdf(z.abs()))).min(1.0),
    };

    Ok(WilcoxonTest {
        statistic: w_plus,
        p_value,
        n_nonzero: n,
        z_score: Some(z),
    })
}

/// Exact p-value from the null distribution of W+ over n untied ranks.
///
/// Counts, for every achievable rank sum, the number of sign assignments
/// producing it; each of the 2^n assignments is equally likely under H0.
fn exact_p_value(w_plus: f64, n: usize, alternative: Alternative) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut ways = vec![0.0_f64; max_sum + 1];
    ways[0] = 1.0;
    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            ways[sum] += ways[sum - rank];
        }
    }

    let total = 2.0_f64.powi(n as i32);
    let w = w_plus.round() as usize;
    let upper_tail: f64 = ways[w..].iter().sum::<f64>() / total;
    let lower_tail: f64 = ways[..=w.min(max_sum)].iter().sum::<f64>() / total;

    match alternative {
        Alternative::Greater => upper_tail,
        Alternative::Less => lower_tail,
        Alternative::TwoSided => (2.0 * upper_tail.min(lower_tail)).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn all_positive_small_sample_exact() {
        // n = 5, every difference positive: W+ = 15, P(W+ >= 15) = 1/32.
        let diffs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let test = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();

        assert_relative_eq!(test.statistic, 15.0, epsilon = 1e-12);
        assert_relative_eq!(test.p_value, 1.0 / 32.0, epsilon = 1e-12);
        assert_eq!(test.n_nonzero, 5);
        assert!(test.z_score.is_none());
    }

    #[test]
    fn all_negative_greater_alternative() {
        // Shift is in the wrong direction: P(W+ >= 0) = 1.
        let diffs = [-1.0, -2.0, -3.0];
        let test = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();

        assert_relative_eq!(test.statistic, 0.0, epsilon = 1e-12);
        assert_relative_eq!(test.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn two_sided_doubles_the_smaller_tail() {
        let diffs = [1.0, 2.0, 3.0];
        let greater = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();
        let two_sided = wilcoxon_signed_rank(&diffs, Alternative::TwoSided).unwrap();

        // n = 3: P(W+ >= 6) = 1/8, two-sided = 2/8.
        assert_relative_eq!(greater.p_value, 0.125, epsilon = 1e-12);
        assert_relative_eq!(two_sided.p_value, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn zeros_are_discarded() {
        let diffs = [0.0, 1.0, 2.0, 0.0, 3.0];
        let test = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();
        assert_eq!(test.n_nonzero, 3);
        assert_relative_eq!(test.statistic, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn all_zero_differences_error() {
        let diffs = [0.0, 0.0];
        assert!(matches!(
            wilcoxon_signed_rank(&diffs, Alternative::Greater),
            Err(EvalError::InsufficientData { .. })
        ));
    }

    #[test]
    fn ties_switch_to_normal_approximation() {
        let diffs = [1.0, 1.0, -1.0, 2.0, 3.0];
        let test = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();
        assert!(test.z_score.is_some());
        assert!(test.p_value > 0.0 && test.p_value < 1.0);
    }

    #[test]
    fn large_sample_uses_normal_approximation() {
        let diffs: Vec<f64> = (1..=40).map(|i| i as f64 * 0.1).collect();
        let test = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();

        assert!(test.z_score.is_some());
        // Every difference positive: strongly significant.
        assert!(test.p_value < 1e-6);
        assert!(test.is_significant(0.05));
    }

    #[test]
    fn mixed_large_sample_matches_symmetry() {
        // Symmetric differences: two-sided p-value should be large.
        let diffs: Vec<f64> = (1..=30)
            .map(|i| if i % 2 == 0 { i as f64 } else { -(i as f64) - 0.5 })
            .collect();
        let test = wilcoxon_signed_rank(&diffs, Alternative::TwoSided).unwrap();
        assert!(test.p_value > 0.2);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        assert!(wilcoxon_signed_rank(&[1.0, f64::NAN], Alternative::Greater).is_err());
        assert!(wilcoxon_signed_rank(&[], Alternative::Greater).is_err());
    }

    #[test]
    fn exact_distribution_is_symmetric() {
        // P(W+ >= w) under Greater on +d equals P(W+ <= W_max - w) on -d.
        let diffs = [1.5, 2.5, 4.0, 5.5];
        let flipped: Vec<f64> = diffs.iter().map(|d| -d).collect();

        let up = wilcoxon_signed_rank(&diffs, Alternative::Greater).unwrap();
        let down = wilcoxon_signed_rank(&flipped, Alternative::Less).unwrap();
        assert_relative_eq!(up.p_value, down.p_value, epsilon = 1e-12);
    }
}
