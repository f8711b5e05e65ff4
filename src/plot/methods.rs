//! Per-factor mean SMAPE bar panels with classical reference lines.
//!
//! A 2x3 grid: rows are evaluation strategies, columns are the experimental
//! factors (data augmentation, denoising, model family).

use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use tracing::info;

use crate::error::Result;
use crate::plot::{summer_ramp, ARIMA_COLOR, ARIMA_GARCH_COLOR, SES_COLOR};
use crate::table::{
    Factor, FactorMean, ReferenceMeans, ResultsTable, Strategy, PRIMARY_INSTANCES,
    REFERENCE_INSTANCES,
};

/// Default file name of the methods figure.
pub const METHODS_FIGURE: &str = "fig_smape_methods.svg";

/// Shared y-axis ceiling across all panels, in SMAPE percent.
const Y_MAX: f64 = 30.0;

/// Render the methods figure.
pub fn render_methods(table: &ResultsTable, path: &Path) -> Result<()> {
    let named: Vec<&str> = PRIMARY_INSTANCES
        .iter()
        .chain(REFERENCE_INSTANCES.iter())
        .copied()
        .collect();
    let variations = table.without_instances(&named);
    if variations.is_empty() {
        info!("no variation runs; skipping {}", path.display());
        return Ok(());
    }

    let root = SVGBackend::new(path, (1800, 1300)).into_drawing_area();
    root.fill(&WHITE)?;
    let (grid, legend) = root.split_vertically(1200);
    let cells = grid.split_evenly((2, 3));

    for (row, strategy) in [Strategy::RollingOrigin, Strategy::StepsAhead]
        .into_iter()
        .enumerate()
    {
        let refs = table.reference_means(strategy);
        for (col, factor) in [Factor::Augment, Factor::Preprocess, Factor::Model]
            .into_iter()
            .enumerate()
        {
            let mut levels = variations.mean_by_factor(strategy, factor);
            match factor {
                Factor::Augment => levels = format_augment(levels),
                Factor::Model => levels = format_model(levels),
                Factor::Preprocess => {}
            }
            draw_panel(
                &cells[row * 3 + col],
                strategy,
                factor,
                &levels,
                &refs,
                col == 0,
            )?;
        }
    }

    draw_reference_legend(&legend)?;
    root.present()?;
    info!("methods figure saved: {}", path.display());
    Ok(())
}

/// Put the no-augmentation level first and give the levels display casing.
fn format_augment(levels: Vec<FactorMean>) -> Vec<FactorMean> {
    let (none, rest): (Vec<_>, Vec<_>) = levels.into_iter().partition(|l| l.level == "none");
    let mut out: Vec<FactorMean> = none
        .into_iter()
        .map(|l| FactorMean {
            level: "No DA".to_string(),
            smape: l.smape,
        })
        .collect();
    out.extend(rest.into_iter().map(|l| FactorMean {
        level: capitalize(&l.level),
        smape: l.smape,
    }));
    out
}

/// Model families are shown upper-cased.
fn format_model(levels: Vec<FactorMean>) -> Vec<FactorMean> {
    levels
        .into_iter()
        .map(|l| FactorMean {
            level: l.level.to_uppercase(),
            smape: l.smape,
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

type Cell<'a> = DrawingArea<SVGBackend<'a>, plotters::coord::Shift>;

fn draw_panel(
    area: &Cell<'_>,
    strategy: Strategy,
    factor: Factor,
    levels: &[FactorMean],
    refs: &ReferenceMeans,
    first_col: bool,
) -> Result<()> {
    if levels.is_empty() {
        info!(
            "no '{}' levels for strategy '{}'; leaving panel empty",
            factor.column(),
            strategy
        );
        return Ok(());
    }

    if first_col {
        area.draw(&Text::new(
            format!("{}:", strategy.label()),
            (15, 18),
            ("sans-serif", 26).into_font().style(FontStyle::Bold),
        ))?;
    }

    let n = levels.len();
    let x_lo = -0.6;
    let x_hi = n as f64 - 0.4;

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .margin_top(55)
        .x_label_area_size(60)
        .y_label_area_size(if first_col { 95 } else { 60 })
        .build_cartesian_2d(x_lo..x_hi, 0.0..Y_MAX)?;

    let level_names: Vec<String> = levels.iter().map(|l| l.level.clone()).collect();
    let x_fmt = |x: &f64| {
        let nearest = x.round();
        if (x - nearest).abs() < 0.01 && nearest >= 0.0 {
            level_names
                .get(nearest as usize)
                .cloned()
                .unwrap_or_default()
        } else {
            String::new()
        }
    };

    let y_fmt = |y: &f64| format!("{}", *y as i64);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .axis_desc_style(("sans-serif", 22))
        .y_labels(7)
        .y_label_formatter(&y_fmt)
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .label_style(("sans-serif", 18));
    if first_col {
        mesh.y_desc("SMAPE (%)");
    }
    mesh.draw()?;

    let v_min = levels.iter().map(|l| l.smape).fold(f64::INFINITY, f64::min);
    let v_max = levels
        .iter()
        .map(|l| l.smape)
        .fold(f64::NEG_INFINITY, f64::max);
    let best = levels
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.smape.total_cmp(&b.1.smape))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let value_style = TextStyle::from(("sans-serif", 17).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (i, level) in levels.iter().enumerate() {
        let t = if v_max > v_min {
            (level.smape - v_min) / (v_max - v_min)
        } else {
            0.5
        };
        let x0 = i as f64 - 0.35;
        let x1 = i as f64 + 0.35;
        let top = level.smape.min(Y_MAX);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x0, 0.0), (x1, top)],
            summer_ramp(t).filled(),
        )))?;
        if i == best {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x0, 0.0), (x1, top)],
                BLACK.stroke_width(3),
            )))?;
        }
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2}", level.smape),
            (i as f64, (level.smape + 0.8).min(Y_MAX)),
            value_style.clone(),
        )))?;
    }

    // Panel tag in the top center, matching the factor column.
    let tag_style = TextStyle::from(("sans-serif", 32).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(std::iter::once(Text::new(
        factor.tag().to_string(),
        ((x_lo + x_hi) / 2.0, Y_MAX - 0.5),
        tag_style,
    )))?;

    for (value, color) in [
        (refs.arima, ARIMA_COLOR),
        (refs.arima_garch, ARIMA_GARCH_COLOR),
        (refs.ses, SES_COLOR),
    ] {
        let Some(v) = value else { continue };
        if v > Y_MAX {
            continue;
        }
        chart.draw_series(DashedLineSeries::new(
            [(x_lo, v), (x_hi, v)],
            10,
            6,
            color.stroke_width(3),
        ))?;
    }

    Ok(())
}

/// Shared legend strip for the reference lines.
fn draw_reference_legend(area: &Cell<'_>) -> Result<()> {
    let entries = [
        ("ARIMA", ARIMA_COLOR),
        ("ARIMA-GARCH", ARIMA_GARCH_COLOR),
        ("Exponential Smoothing", SES_COLOR),
    ];
    let text_style = ("sans-serif", 24).into_font();

    let mut x = 440;
    let y = 50;
    for (label, color) in entries {
        for dash in 0..3 {
            area.draw(&PathElement::new(
                vec![(x + dash * 16, y), (x + dash * 16 + 10, y)],
                color.stroke_width(3),
            ))?;
        }
        area.draw(&Text::new(label, (x + 58, y - 12), text_style.clone()))?;
        x += 70 + 13 * label.len() as i32;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RunRecord;
    use std::fs;

    fn variation(
        strategy: Strategy,
        augment: &str,
        preprocess: &str,
        model: &str,
        smape: f64,
    ) -> RunRecord {
        RunRecord {
            dataset: "d".to_string(),
            strategy,
            instance: format!("{augment}-{preprocess}-{model}"),
            smape,
            test_size: 10.0,
            augment: Some(augment.to_string()),
            preprocess: Some(preprocess.to_string()),
            model: Some(model.to_string()),
        }
    }

    fn reference(strategy: Strategy, instance: &str, smape: f64) -> RunRecord {
        RunRecord {
            dataset: "d".to_string(),
            strategy,
            instance: instance.to_string(),
            smape,
            test_size: 10.0,
            augment: None,
            preprocess: None,
            model: None,
        }
    }

    fn full_table() -> ResultsTable {
        let mut records = Vec::new();
        for strategy in [Strategy::RollingOrigin, Strategy::StepsAhead] {
            for (augment, smape) in [("none", 18.0), ("jitter", 14.0), ("scaling", 16.0)] {
                for (preprocess, offset) in [("raw", 0.0), ("wavelet", -2.0)] {
                    for (model, bump) in [("lstm", 0.0), ("gru", 1.0)] {
                        records.push(variation(
                            strategy,
                            augment,
                            preprocess,
                            model,
                            smape + offset + bump,
                        ));
                    }
                }
            }
            records.push(reference(strategy, "arima", 22.0));
            records.push(reference(strategy, "arima-garch", 24.0));
            records.push(reference(strategy, "ses", 20.0));
        }
        ResultsTable::new(records)
    }

    fn temp_figure(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("aidan-eval-methods-tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn format_augment_puts_no_da_first() {
        let levels = vec![
            FactorMean {
                level: "jitter".to_string(),
                smape: 14.0,
            },
            FactorMean {
                level: "none".to_string(),
                smape: 18.0,
            },
        ];
        let formatted = format_augment(levels);
        assert_eq!(formatted[0].level, "No DA");
        assert_eq!(formatted[1].level, "Jitter");
    }

    #[test]
    fn format_model_uppercases() {
        let levels = vec![FactorMean {
            level: "lstm".to_string(),
            smape: 10.0,
        }];
        assert_eq!(format_model(levels)[0].level, "LSTM");
    }

    #[test]
    fn renders_grid_with_tags_and_row_titles() {
        let path = temp_figure("methods.svg");
        render_methods(&full_table(), &path).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        for needle in [
            "DA",
            "DN",
            "ML",
            "Rolling Origin:",
            "Steps Ahead:",
            "SMAPE (%)",
            "ARIMA-GARCH",
            "Exponential Smoothing",
            "No DA",
            "LSTM",
        ] {
            assert!(body.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn table_without_variations_skips_output() {
        let path = temp_figure("methods-empty.svg");
        let _ = fs::remove_file(&path);
        let table = ResultsTable::new(vec![reference(Strategy::RollingOrigin, "aidan", 10.0)]);
        render_methods(&table, &path).unwrap();
        assert!(!path.exists());
    }
}
