//! Fitted normal density curves over log-SMAPE, one per method.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontStyle;
use tracing::info;

use crate::error::Result;
use crate::plot::{log_smape_values, method_palette, normal_pdf};
use crate::stats::{mean, population_std};
use crate::table::ResultsTable;

/// Default file name of the density figure.
pub const DENSITY_FIGURE: &str = "fig_smape_density.svg";

/// Number of grid points per curve.
const CURVE_POINTS: usize = 1000;

/// Left clip of the evaluation grid; scores below exp(-2) SMAPE carry no
/// visual information at figure scale.
const X_CLIP: f64 = -2.0;

/// Render the density figure for the three primary methods.
///
/// Each method's log-SMAPE distribution is summarized by the normal density
/// fitted to its mean and standard deviation, evaluated on a grid spanning
/// the observed range.
pub fn render_density(table: &ResultsTable, path: &Path) -> Result<()> {
    let mut curves: Vec<(&str, RGBColor, Vec<(f64, f64)>)> = Vec::new();
    for (instance, label, color) in method_palette() {
        let values = log_smape_values(table, instance);
        if values.len() < 2 {
            info!("not enough data for '{}' density curve; skipping", label);
            continue;
        }

        let mu = mean(&values);
        let sigma = population_std(&values);
        if sigma <= 0.0 {
            info!("no spread in '{}' scores; skipping curve", label);
            continue;
        }

        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = (hi - lo) / (CURVE_POINTS - 1) as f64;
        let points: Vec<(f64, f64)> = (0..CURVE_POINTS)
            .map(|i| lo + i as f64 * step)
            .filter(|&x| x >= X_CLIP)
            .map(|x| (x, normal_pdf(x, mu, sigma)))
            .collect();
        if !points.is_empty() {
            curves.push((label, color, points));
        }
    }

    if curves.is_empty() {
        info!("no drawable density data; skipping {}", path.display());
        return Ok(());
    }

    let x_min = curves
        .iter()
        .flat_map(|(_, _, pts)| pts.iter().map(|p| p.0))
        .fold(f64::INFINITY, f64::min);
    let x_max = curves
        .iter()
        .flat_map(|(_, _, pts)| pts.iter().map(|p| p.0))
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = curves
        .iter()
        .flat_map(|(_, _, pts)| pts.iter().map(|p| p.1))
        .fold(0.0, f64::max);

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .x_label_area_size(55)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.08)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("log(SMAPE)")
        .y_desc("Density")
        .axis_desc_style(("sans-serif", 20).into_font().style(FontStyle::Bold))
        .label_style(("sans-serif", 20))
        .draw()?;

    for (label, color, points) in &curves {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(3),
            ))?
            .label(*label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
    }

    chart
        .configure_series_labels()
        .border_style(TRANSPARENT)
        .background_style(TRANSPARENT)
        .label_font(("sans-serif", 20))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    info!("density figure saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{RunRecord, Strategy};
    use std::fs;

    fn record(instance: &str, smape: f64) -> RunRecord {
        RunRecord {
            dataset: "d".to_string(),
            strategy: Strategy::RollingOrigin,
            instance: instance.to_string(),
            smape,
            test_size: 10.0,
            augment: None,
            preprocess: None,
            model: None,
        }
    }

    fn spread_table() -> ResultsTable {
        let mut records = Vec::new();
        for i in 0..30 {
            records.push(record("aidan", 8.0 + (i % 7) as f64));
            records.push(record("baseline", 11.0 + (i % 5) as f64));
            records.push(record("naive", 15.0 + (i % 9) as f64));
        }
        ResultsTable::new(records)
    }

    fn temp_figure(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("aidan-eval-density-tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn renders_a_non_empty_svg() {
        let path = temp_figure("density.svg");
        render_density(&spread_table(), &path).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("<svg"));
        assert!(body.contains("log(SMAPE)"));
    }

    #[test]
    fn empty_table_skips_without_output() {
        let path = temp_figure("density-empty.svg");
        let _ = fs::remove_file(&path);
        render_density(&ResultsTable::default(), &path).unwrap();
        assert!(!path.exists());
    }
}
