//! Matched-pairs rank effect size.

use crate::stats::rank::ordinal_ranks;

/// Effect size r for a vector of paired differences.
///
/// Ranks the absolute differences ordinally, signs each rank by the sign of
/// its difference, and standardizes the positive-rank sum W against its mean
/// and variance under the null:
///
/// `Z = (W - n(n+1)/4) / sqrt(n(n+1)(2n+1)/24)`, `r = Z / sqrt(n)`.
///
/// Positive r means the differences lean positive. Returns NaN for empty
/// input.
pub fn matched_pairs_r(diffs: &[f64]) -> f64 {
    let n = diffs.len();
    if n == 0 {
        return f64::NAN;
    }

    let abs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = ordinal_ranks(&abs);

    // Zero differences carry sign zero and drop out of the positive sum.
    let w: f64 = ranks
        .iter()
        .zip(diffs)
        .filter(|(_, &d)| d > 0.0)
        .map(|(&r, _)| r)
        .sum();

    let nf = n as f64;
    let mean_w = nf * (nf + 1.0) / 4.0;
    let var_w = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0;

    let z = (w - mean_w) / var_w.sqrt();
    z / nf.sqrt()
}
