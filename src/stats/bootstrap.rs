//! Percentile bootstrap confidence intervals.
//!
//! Resamples an observed difference vector with replacement and takes
//! percentiles of the statistic's bootstrap distribution.

use rand::prelude::*;
use rand::SeedableRng;

use crate::error::{EvalError, Result};
use crate::stats::describe::nan_percentile;

/// Configuration for bootstrap interval estimation.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples to draw.
    pub n_samples: usize,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_samples: 5000,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Create a new bootstrap config with the given number of resamples.
    pub fn new(n_samples: usize) -> Self {
        Self {
            n_samples,
            ..Default::default()
        }
    }

    /// Set a random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A two-sided confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level, e.g. 0.95.
    pub level: f64,
}

/// Resample values with replacement into `out`.
fn resample(values: &[f64], out: &mut [f64], rng: &mut impl Rng) {
    let n = values.len();
    for slot in out.iter_mut() {
        *slot = values[rng.gen_range(0..n)];
    }
}

/// Percentile bootstrap confidence interval for an arbitrary statistic.
///
/// Draws `config.n_samples` resamples of `values` with replacement, applies
/// `statistic` to each, and returns the `(1 - level)/2` and `(1 + level)/2`
/// percentiles of the bootstrap distribution. Resamples where the statistic
/// is NaN are ignored at the percentile step.
///
/// # Arguments
/// * `values` - Observed values to resample
/// * `statistic` - Statistic evaluated on each resample
/// * `level` - Confidence level in (0, 1), e.g. 0.95
/// * `config` - Resample count and seed
pub fn percentile_ci<F>(
    values: &[f64],
    statistic: F,
    level: f64,
    config: &BootstrapConfig,
) -> Result<ConfidenceInterval>
where
    F: Fn(&[f64]) -> f64,
{
    if values.is_empty() {
        return Err(EvalError::EmptyData);
    }
    if !(0.0..1.0).contains(&level) || level == 0.0 {
        return Err(EvalError::InvalidParameter(format!(
            "confidence level must be in (0, 1), got {level}"
        )));
    }
    if config.n_samples == 0 {
        return Err(EvalError::InvalidParameter(
            "bootstrap needs at least one resample".to_string(),
        ));
    }

    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut sample = vec![0.0; values.len()];
    let mut boot_stats = Vec::with_capacity(config.n_samples);
    for _ in 0..config.n_samples {
        resample(values, &mut sample, &mut rng);
        boot_stats.push(statistic(&sample));
    }

    let alpha = (1.0 - level) / 2.0;
    Ok(ConfidenceInterval {
        lower: nan_percentile(&boot_stats, 100.0 * alpha),
        upper: nan_percentile(&boot_stats, 100.0 * (1.0 - alpha)),
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::describe::mean;
    use approx::assert_relative_eq;

    #[test]
    fn config_defaults_and_builder() {
        let config = BootstrapConfig::default();
        assert_eq!(config.n_samples, 5000);
        assert!(config.seed.is_none());

        let config = BootstrapConfig::new(500).with_seed(42);
        assert_eq!(config.n_samples, 500);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn resample_preserves_length_and_support() {
        let values = [1.0, 2.0, 3.0];
        let mut out = [0.0; 3];
        let mut rng = StdRng::seed_from_u64(7);
        resample(&values, &mut out, &mut rng);
        assert!(out.iter().all(|v| values.contains(v)));
    }

    #[test]
    fn ci_brackets_the_mean() {
        let values: Vec<f64> = (0..40).map(|i| 5.0 + (i % 7) as f64 * 0.5).collect();
        let config = BootstrapConfig::new(2000).with_seed(42);
        let ci = percentile_ci(&values, mean, 0.95, &config).unwrap();

        assert!(ci.lower <= ci.upper);
        let observed = mean(&values);
        assert!(ci.lower <= observed && observed <= ci.upper);
        assert_relative_eq!(ci.level, 0.95, epsilon = 1e-12);
    }

    #[test]
    fn ci_is_reproducible_with_seed() {
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let config = BootstrapConfig::new(500).with_seed(123);

        let a = percentile_ci(&values, mean, 0.95, &config).unwrap();
        let b = percentile_ci(&values, mean, 0.95, &config).unwrap();
        assert_relative_eq!(a.lower, b.lower, epsilon = 1e-12);
        assert_relative_eq!(a.upper, b.upper, epsilon = 1e-12);
    }

    #[test]
    fn constant_input_collapses_the_interval() {
        let values = [4.0; 12];
        let config = BootstrapConfig::new(200).with_seed(1);
        let ci = percentile_ci(&values, mean, 0.95, &config).unwrap();
        assert_relative_eq!(ci.lower, 4.0, epsilon = 1e-12);
        assert_relative_eq!(ci.upper, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_inputs_error() {
        let config = BootstrapConfig::new(100);
        assert!(percentile_ci(&[], mean, 0.95, &config).is_err());
        assert!(percentile_ci(&[1.0], mean, 1.5, &config).is_err());
        assert!(percentile_ci(&[1.0], mean, 0.95, &BootstrapConfig::new(0)).is_err());
    }
}
