//! CSV report writers.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::compare::{compare_methods, primary_means, summarize_methods, MethodComparison};
use crate::error::Result;
use crate::stats::BootstrapConfig;
use crate::table::{PivotTable, ResultsTable, Strategy, PRIMARY_INSTANCES};

/// File name of the significance table.
pub const COMPARISON_FILE: &str = "wilcoxon_test.csv";

/// File name of the per-instance descriptive summary.
pub const SUMMARY_FILE: &str = "smape_summary.csv";

/// File name of the pivot table for one strategy.
pub fn pivot_file(strategy: Strategy) -> String {
    format!("smape_results_{}.csv", strategy.code())
}

#[derive(Serialize)]
struct ComparisonRow<'a> {
    pair: &'a str,
    wilcox_stat: f64,
    p_value: f64,
    effect_size: f64,
    #[serde(rename = "CI_95_low")]
    ci_95_low: f64,
    #[serde(rename = "CI_95_high")]
    ci_95_high: f64,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    instance: &'a str,
    count: usize,
    mean: f64,
    median: f64,
    std: f64,
}

/// Write the significance table.
pub fn write_comparison_csv<P: AsRef<Path>>(
    path: P,
    comparisons: &[MethodComparison],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for c in comparisons {
        writer.serialize(ComparisonRow {
            pair: &c.pair,
            wilcox_stat: c.statistic,
            p_value: c.p_value,
            effect_size: c.effect_size,
            ci_95_low: c.ci_low,
            ci_95_high: c.ci_high,
        })?;
    }
    writer.flush()?;
    info!("significance table saved: {}", path.as_ref().display());
    Ok(())
}

/// Write one strategy's dataset-by-instance pivot table.
pub fn write_pivot_csv<P: AsRef<Path>>(path: P, pivot: &PivotTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;

    let mut header = vec!["dataset"];
    header.extend(PRIMARY_INSTANCES);
    writer.write_record(&header)?;

    for (dataset, row) in pivot.datasets.iter().zip(&pivot.rows) {
        let mut record = vec![dataset.clone()];
        record.extend(
            row.iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("pivot table saved: {}", path.as_ref().display());
    Ok(())
}

/// Write the per-instance descriptive summary.
pub fn write_summary_csv<P: AsRef<Path>>(
    path: P,
    summaries: &[crate::compare::MethodSummary],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for s in summaries {
        writer.serialize(SummaryRow {
            instance: &s.instance,
            count: s.count,
            mean: s.mean,
            median: s.median,
            std: s.std_dev,
        })?;
    }
    writer.flush()?;
    info!("method summary saved: {}", path.as_ref().display());
    Ok(())
}

/// Produce every CSV report into `out_dir`.
///
/// Writes the significance table, one pivot table per strategy, and the
/// descriptive summary.
pub fn write_reports<P: AsRef<Path>>(
    table: &ResultsTable,
    out_dir: P,
    config: &BootstrapConfig,
) -> Result<()> {
    let out_dir = out_dir.as_ref();

    let comparisons = compare_methods(table, config)?;
    write_comparison_csv(out_dir.join(COMPARISON_FILE), &comparisons)?;

    let means = primary_means(table);
    for strategy in [Strategy::RollingOrigin, Strategy::StepsAhead] {
        let pivot = PivotTable::from_means(&means, strategy);
        write_pivot_csv(out_dir.join(pivot_file(strategy)), &pivot)?;
    }

    write_summary_csv(out_dir.join(SUMMARY_FILE), &summarize_methods(&means))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DatasetMean;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("aidan-eval-report-tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn comparison_csv_has_expected_header() {
        let path = temp_path("wilcoxon.csv");
        let comparisons = vec![MethodComparison {
            pair: "aidan vs baseline".to_string(),
            statistic: 120.0,
            p_value: 0.004,
            effect_size: 0.61,
            ci_low: 0.33,
            ci_high: 0.82,
            n_pairs: 16,
        }];
        write_comparison_csv(&path, &comparisons).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        let mut lines = body.lines();
        assert_eq!(
            lines.next().unwrap(),
            "pair,wilcox_stat,p_value,effect_size,CI_95_low,CI_95_high"
        );
        assert!(lines.next().unwrap().starts_with("aidan vs baseline,120.0,0.004"));
    }

    #[test]
    fn pivot_csv_leaves_missing_cells_empty() {
        let path = temp_path("pivot.csv");
        let means = vec![
            DatasetMean {
                dataset: "m3".to_string(),
                strategy: Strategy::RollingOrigin,
                instance: "aidan".to_string(),
                smape: 11.5,
            },
            DatasetMean {
                dataset: "m3".to_string(),
                strategy: Strategy::RollingOrigin,
                instance: "naive".to_string(),
                smape: 19.0,
            },
        ];
        let pivot = PivotTable::from_means(&means, Strategy::RollingOrigin);
        write_pivot_csv(&path, &pivot).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        let mut lines = body.lines();
        assert_eq!(lines.next().unwrap(), "dataset,aidan,baseline,naive");
        assert_eq!(lines.next().unwrap(), "m3,11.5,,19");
    }
}
