//! In-memory results table with the filtering, aggregation, and pivoting
//! operations the reports are built from.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EvalError, Result};

/// Method identifiers compared in the significance pipeline, in the fixed
/// column order used throughout the reports.
pub const PRIMARY_INSTANCES: [&str; 3] = ["aidan", "baseline", "naive"];

/// Classical reference methods drawn as horizontal lines in the methods
/// figure.
pub const REFERENCE_INSTANCES: [&str; 3] = ["arima", "arima-garch", "ses"];

/// Evaluation strategy under which a result row was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// Rolling-origin evaluation (`ro`).
    RollingOrigin,
    /// Direct steps-ahead evaluation (`sa`).
    StepsAhead,
}

impl Strategy {
    /// The code used in the results table.
    pub fn code(&self) -> &'static str {
        match self {
            Strategy::RollingOrigin => "ro",
            Strategy::StepsAhead => "sa",
        }
    }

    /// Human-readable label used in figure row titles.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::RollingOrigin => "Rolling Origin",
            Strategy::StepsAhead => "Steps Ahead",
        }
    }
}

impl FromStr for Strategy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s.trim() {
            "ro" => Ok(Strategy::RollingOrigin),
            "sa" => Ok(Strategy::StepsAhead),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Experimental factor a variation run is grouped by in the methods figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    /// Data-augmentation scheme.
    Augment,
    /// Denoising/preprocessing scheme.
    Preprocess,
    /// Model family.
    Model,
}

impl Factor {
    /// Column name in the results table.
    pub fn column(&self) -> &'static str {
        match self {
            Factor::Augment => "augment",
            Factor::Preprocess => "preprocess",
            Factor::Model => "model",
        }
    }

    /// Short tag shown in the corner of the corresponding figure panel.
    pub fn tag(&self) -> &'static str {
        match self {
            Factor::Augment => "DA",
            Factor::Preprocess => "DN",
            Factor::Model => "ML",
        }
    }
}

/// Display name for a method instance. The three primary methods carry the
/// capitalization used in the paper; anything else is shown as-is.
pub fn display_name(instance: &str) -> &str {
    match instance {
        "aidan" => "AIDAN",
        "baseline" => "Baseline",
        "naive" => "Naive",
        other => other,
    }
}

/// One row of the results table: the SMAPE of one method instance on one
/// dataset under one evaluation strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub dataset: String,
    pub strategy: Strategy,
    pub instance: String,
    /// Symmetric mean absolute percentage error, in percent.
    pub smape: f64,
    /// Number of test observations behind this score.
    pub test_size: f64,
    /// Data-augmentation level, where the run is a variation experiment.
    pub augment: Option<String>,
    /// Preprocessing level, where the run is a variation experiment.
    pub preprocess: Option<String>,
    /// Model family, where the run is a variation experiment.
    pub model: Option<String>,
}

impl RunRecord {
    fn factor_level(&self, factor: Factor) -> Option<&str> {
        match factor {
            Factor::Augment => self.augment.as_deref(),
            Factor::Preprocess => self.preprocess.as_deref(),
            Factor::Model => self.model.as_deref(),
        }
    }
}

/// Mean SMAPE of one instance on one `(dataset, strategy)` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMean {
    pub dataset: String,
    pub strategy: Strategy,
    pub instance: String,
    pub smape: f64,
}

/// Mean SMAPE of all variation runs sharing one factor level.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorMean {
    pub level: String,
    pub smape: f64,
}

/// Mean SMAPE of the classical reference methods under one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceMeans {
    pub arima: Option<f64>,
    pub arima_garch: Option<f64>,
    pub ses: Option<f64>,
}

/// Dataset-by-instance pivot of mean SMAPE for one strategy.
///
/// Rows are sorted by dataset; columns are always `aidan`, `baseline`,
/// `naive`. A cell is `None` when the instance has no score on the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub strategy: Strategy,
    pub datasets: Vec<String>,
    pub rows: Vec<[Option<f64>; 3]>,
}

impl PivotTable {
    /// Build the pivot from per-dataset means, keeping only the given
    /// strategy.
    pub fn from_means(means: &[DatasetMean], strategy: Strategy) -> Self {
        let mut cells: BTreeMap<String, [Option<f64>; 3]> = BTreeMap::new();
        for m in means.iter().filter(|m| m.strategy == strategy) {
            let Some(col) = PRIMARY_INSTANCES.iter().position(|i| *i == m.instance) else {
                continue;
            };
            cells.entry(m.dataset.clone()).or_default()[col] = Some(m.smape);
        }

        let (datasets, rows) = cells.into_iter().unzip();
        PivotTable {
            strategy,
            datasets,
            rows,
        }
    }
}

/// The full results table loaded from the archive.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    records: Vec<RunRecord>,
}

impl ResultsTable {
    pub fn new(records: Vec<RunRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Keep only rows whose instance is in the given set.
    pub fn with_instances(&self, instances: &[&str]) -> Self {
        self.filtered(|r| instances.contains(&r.instance.as_str()))
    }

    /// Drop rows whose instance is in the given set.
    pub fn without_instances(&self, instances: &[&str]) -> Self {
        self.filtered(|r| !instances.contains(&r.instance.as_str()))
    }

    /// Keep only rows with `test_size` strictly greater than the threshold.
    pub fn with_min_test_size(&self, threshold: f64) -> Self {
        self.filtered(|r| r.test_size > threshold)
    }

    fn filtered(&self, predicate: impl Fn(&RunRecord) -> bool) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Average SMAPE per `(dataset, strategy, instance)`, in deterministic
    /// key order.
    pub fn mean_by_dataset(&self) -> Vec<DatasetMean> {
        let mut groups: BTreeMap<(String, Strategy, String), (f64, usize)> = BTreeMap::new();
        for r in &self.records {
            let entry = groups
                .entry((r.dataset.clone(), r.strategy, r.instance.clone()))
                .or_insert((0.0, 0));
            entry.0 += r.smape;
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|((dataset, strategy, instance), (sum, count))| DatasetMean {
                dataset,
                strategy,
                instance,
                smape: sum / count as f64,
            })
            .collect()
    }

    /// Average SMAPE per level of one experimental factor, for one strategy.
    ///
    /// Rows without a value for the factor are skipped. Levels come back in
    /// lexical order; presentation reordering belongs to the figure code.
    pub fn mean_by_factor(&self, strategy: Strategy, factor: Factor) -> Vec<FactorMean> {
        let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for r in self.records.iter().filter(|r| r.strategy == strategy) {
            let Some(level) = r.factor_level(factor) else {
                continue;
            };
            let entry = groups.entry(level.to_string()).or_insert((0.0, 0));
            entry.0 += r.smape;
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|(level, (sum, count))| FactorMean {
                level,
                smape: sum / count as f64,
            })
            .collect()
    }

    /// Mean SMAPE of the classical reference methods under one strategy,
    /// over rows with a non-empty test window.
    pub fn reference_means(&self, strategy: Strategy) -> ReferenceMeans {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for r in self.records.iter().filter(|r| {
            r.strategy == strategy
                && r.test_size > 0.0
                && REFERENCE_INSTANCES.contains(&r.instance.as_str())
        }) {
            let entry = sums.entry(r.instance.as_str()).or_insert((0.0, 0));
            entry.0 += r.smape;
            entry.1 += 1;
        }

        let mean_of = |name: &str| {
            sums.get(name)
                .map(|(sum, count)| sum / *count as f64)
        };
        ReferenceMeans {
            arima: mean_of("arima"),
            arima_garch: mean_of("arima-garch"),
            ses: mean_of("ses"),
        }
    }

    /// SMAPE values of one instance across all rows, in table order.
    pub fn smape_of(&self, instance: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.instance == instance)
            .map(|r| r.smape)
            .collect()
    }

    /// Validate the table is usable: non-empty and with finite scores.
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(EvalError::EmptyData);
        }
        for r in &self.records {
            if !r.smape.is_finite() {
                return Err(EvalError::ComputationError(format!(
                    "non-finite smape for instance '{}' on dataset '{}'",
                    r.instance, r.dataset
                )));
            }
        }
        Ok(())
    }
}
