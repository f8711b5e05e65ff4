//! The significance pipeline: paired comparisons of AIDAN against its
//! reference methods over per-dataset mean SMAPE.

use crate::error::Result;
use crate::stats::{
    matched_pairs_r, median, percentile_ci, std_dev, wilcoxon_signed_rank, Alternative,
    BootstrapConfig,
};
use crate::table::{DatasetMean, ResultsTable, Strategy, PRIMARY_INSTANCES};

/// Method pairs tested, as (candidate, reference).
pub const METHOD_PAIRS: [(&str, &str); 2] = [("aidan", "baseline"), ("aidan", "naive")];

/// Rows with `test_size` at or below this are excluded from the pipeline.
pub const MIN_TEST_SIZE: f64 = 3.0;

/// Confidence level of the bootstrap interval.
pub const CI_LEVEL: f64 = 0.95;

/// Outcome of one paired comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodComparison {
    /// Pair label, e.g. "aidan vs baseline".
    pub pair: String,
    /// Wilcoxon W+ statistic.
    pub statistic: f64,
    /// One-sided p-value (candidate better than reference).
    pub p_value: f64,
    /// Matched-pairs effect size r.
    pub effect_size: f64,
    /// Lower bound of the bootstrap CI of the effect size.
    pub ci_low: f64,
    /// Upper bound of the bootstrap CI of the effect size.
    pub ci_high: f64,
    /// Number of paired `(dataset, strategy)` cells behind the comparison.
    pub n_pairs: usize,
}

/// Descriptive summary of one method's per-dataset mean SMAPE.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSummary {
    pub instance: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// Per-dataset mean SMAPE of the three primary methods, over rows with a
/// sufficiently large test window.
pub fn primary_means(table: &ResultsTable) -> Vec<DatasetMean> {
    table
        .with_instances(&PRIMARY_INSTANCES)
        .with_min_test_size(MIN_TEST_SIZE)
        .mean_by_dataset()
}

/// Paired differences `reference - candidate`, aligned by
/// `(dataset, strategy)`; positive values mean the candidate scored better.
///
/// Cells present for only one of the two instances are dropped.
pub fn paired_differences(
    means: &[DatasetMean],
    candidate: &str,
    reference: &str,
) -> Vec<f64> {
    let cell = |instance: &str| {
        means
            .iter()
            .filter(|m| m.instance == instance)
            .map(|m| ((m.dataset.clone(), m.strategy), m.smape))
            .collect::<std::collections::BTreeMap<(String, Strategy), f64>>()
    };

    let candidate_cells = cell(candidate);
    let reference_cells = cell(reference);

    candidate_cells
        .iter()
        .filter_map(|(key, &cand)| {
            reference_cells
                .get(key)
                .map(|&reference_score| reference_score - cand)
        })
        .collect()
}

/// Run the full comparison for both method pairs.
///
/// For each pair: one-sided Wilcoxon signed-rank test on the paired
/// differences, the matched-pairs effect size, and a percentile-bootstrap
/// confidence interval of the effect size.
pub fn compare_methods(
    table: &ResultsTable,
    config: &BootstrapConfig,
) -> Result<Vec<MethodComparison>> {
    let means = primary_means(table);

    let mut comparisons = Vec::with_capacity(METHOD_PAIRS.len());
    for (candidate, reference) in METHOD_PAIRS {
        let diffs = paired_differences(&means, candidate, reference);
        let test = wilcoxon_signed_rank(&diffs, Alternative::Greater)?;
        let effect = matched_pairs_r(&diffs);
        let ci = percentile_ci(&diffs, matched_pairs_r, CI_LEVEL, config)?;

        comparisons.push(MethodComparison {
            pair: format!("{candidate} vs {reference}"),
            statistic: test.statistic,
            p_value: test.p_value,
            effect_size: effect,
            ci_low: ci.lower,
            ci_high: ci.upper,
            n_pairs: diffs.len(),
        });
    }

    Ok(comparisons)
}

/// Descriptive statistics of the per-dataset mean SMAPE for each primary
/// method, in report column order.
pub fn summarize_methods(means: &[DatasetMean]) -> Vec<MethodSummary> {
    PRIMARY_INSTANCES
        .iter()
        .map(|&instance| {
            let values: Vec<f64> = means
                .iter()
                .filter(|m| m.instance == instance)
                .map(|m| m.smape)
                .collect();
            MethodSummary {
                instance: instance.to_string(),
                count: values.len(),
                mean: crate::stats::mean(&values),
                median: median(&values),
                std_dev: std_dev(&values),
            }
        })
        .collect()
}
