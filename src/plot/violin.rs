//! Horizontal violin plot of log-SMAPE per method.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use tracing::info;

use crate::error::Result;
use crate::plot::{log_smape_values, method_palette, GaussianKde};
use crate::stats::median;
use crate::table::ResultsTable;

/// Default file name of the violin figure.
pub const VIOLIN_FIGURE: &str = "fig_smape_violin.svg";

/// Half-width of a violin at its densest point, in category units.
const VIOLIN_WIDTH: f64 = 0.4;

/// Profile resolution along the value axis.
const PROFILE_POINTS: usize = 200;

/// Grid extension past the data extremes, in bandwidths.
const CUT: f64 = 2.0;

struct Violin {
    label: &'static str,
    color: RGBColor,
    /// Vertical center of the violin.
    center: f64,
    outline: Vec<(f64, f64)>,
    median: f64,
}

/// Render the violin figure for the three primary methods.
///
/// Violins are drawn top to bottom in the order AIDAN, Baseline, Naive, each
/// mirrored around its category line and annotated with its median.
pub fn render_violin(table: &ResultsTable, path: &Path) -> Result<()> {
    let palette = method_palette();
    let mut violins: Vec<Violin> = Vec::new();

    for (i, (instance, label, color)) in palette.into_iter().enumerate() {
        let values = log_smape_values(table, instance);
        let Some(kde) = GaussianKde::fit(&values) else {
            info!("not enough data for '{}' violin; skipping", label);
            continue;
        };

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - CUT * kde.bandwidth();
        let hi =
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + CUT * kde.bandwidth();
        let step = (hi - lo) / (PROFILE_POINTS - 1) as f64;

        let profile: Vec<(f64, f64)> = (0..PROFILE_POINTS)
            .map(|k| {
                let x = lo + k as f64 * step;
                (x, kde.density(x))
            })
            .collect();
        let peak = profile.iter().map(|p| p.1).fold(0.0, f64::max);
        if peak <= 0.0 {
            continue;
        }

        // First method sits at the top of an ascending y-axis.
        let center = (palette.len() - 1 - i) as f64;
        let mut outline: Vec<(f64, f64)> = profile
            .iter()
            .map(|&(x, d)| (x, center + VIOLIN_WIDTH * d / peak))
            .collect();
        outline.extend(
            profile
                .iter()
                .rev()
                .map(|&(x, d)| (x, center - VIOLIN_WIDTH * d / peak)),
        );

        violins.push(Violin {
            label,
            color,
            center,
            outline,
            median: median(&values),
        });
    }

    if violins.is_empty() {
        info!("no drawable violin data; skipping {}", path.display());
        return Ok(());
    }

    let x_min = violins
        .iter()
        .flat_map(|v| v.outline.iter().map(|p| p.0).chain([v.median - 0.6]))
        .fold(f64::INFINITY, f64::min);
    let x_max = violins
        .iter()
        .flat_map(|v| v.outline.iter().map(|p| p.0))
        .fold(f64::NEG_INFINITY, f64::max);

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<(f64, &'static str)> = violins.iter().map(|v| (v.center, v.label)).collect();
    let y_fmt = move |y: &f64| {
        labels
            .iter()
            .find(|(center, _)| (y - center).abs() < 0.01)
            .map(|(_, label)| label.to_string())
            .unwrap_or_default()
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .x_label_area_size(55)
        .y_label_area_size(100)
        .build_cartesian_2d(x_min..x_max, -0.6..2.6_f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("log(SMAPE)")
        .axis_desc_style(("sans-serif", 20).into_font().style(FontStyle::Bold))
        .label_style(("sans-serif", 20))
        .y_labels(3)
        .y_label_formatter(&y_fmt)
        .draw()?;

    let median_style = TextStyle::from(("sans-serif", 18).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Left, VPos::Center));

    for violin in &violins {
        chart.draw_series(std::iter::once(Polygon::new(
            violin.outline.clone(),
            violin.color.filled(),
        )))?;

        let mut closed = violin.outline.clone();
        if let Some(&first) = closed.first() {
            closed.push(first);
        }
        chart.draw_series(std::iter::once(PathElement::new(
            closed,
            BLACK.stroke_width(1),
        )))?;

        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2}", violin.median),
            (violin.median - 0.45, violin.center + 0.1),
            median_style.clone(),
        )))?;
    }

    root.present()?;
    info!("violin figure saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{RunRecord, Strategy};
    use std::fs;

    fn table_with_instances() -> ResultsTable {
        let mut records = Vec::new();
        for instance in ["aidan", "baseline", "naive"] {
            for i in 0..40 {
                records.push(RunRecord {
                    dataset: format!("d{i}"),
                    strategy: Strategy::RollingOrigin,
                    instance: instance.to_string(),
                    smape: 5.0 + (i % 11) as f64,
                    test_size: 10.0,
                    augment: None,
                    preprocess: None,
                    model: None,
                });
            }
        }
        ResultsTable::new(records)
    }

    fn temp_figure(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("aidan-eval-violin-tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn renders_all_three_violins() {
        let path = temp_figure("violin.svg");
        render_violin(&table_with_instances(), &path).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("<svg"));
        for label in ["AIDAN", "Baseline", "Naive"] {
            assert!(body.contains(label), "missing label {label}");
        }
    }

    #[test]
    fn empty_table_skips_without_output() {
        let path = temp_figure("violin-empty.svg");
        let _ = fs::remove_file(&path);
        render_violin(&ResultsTable::default(), &path).unwrap();
        assert!(!path.exists());
    }
}
