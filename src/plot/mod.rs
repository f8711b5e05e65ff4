//! Figure rendering for the evaluation report.
//!
//! All figures are drawn with plotters onto SVG backends.

pub mod density;
pub mod methods;
pub mod violin;

use plotters::style::RGBColor;

use crate::table::ResultsTable;

/// Method palette, in the fixed drawing order AIDAN, Baseline, Naive.
pub const AIDAN_COLOR: RGBColor = RGBColor(0x4E, 0x79, 0xA7);
pub const BASELINE_COLOR: RGBColor = RGBColor(0xF2, 0x8E, 0x2B);
pub const NAIVE_COLOR: RGBColor = RGBColor(0x59, 0xA1, 0x4F);

/// Reference-line palette for the methods figure.
pub const ARIMA_COLOR: RGBColor = RGBColor(0xD6, 0x27, 0x28);
pub const ARIMA_GARCH_COLOR: RGBColor = RGBColor(0xFF, 0x7F, 0x0E);
pub const SES_COLOR: RGBColor = RGBColor(0x8C, 0x56, 0x4B);

/// SMAPE scores at or below this are dropped by the log transform.
pub const SMAPE_FLOOR: f64 = 0.05;

/// The three primary methods with display names and colors, in drawing
/// order.
pub fn method_palette() -> [(&'static str, &'static str, RGBColor); 3] {
    [
        ("aidan", "AIDAN", AIDAN_COLOR),
        ("baseline", "Baseline", BASELINE_COLOR),
        ("naive", "Naive", NAIVE_COLOR),
    ]
}

/// Log-transformed SMAPE scores of one instance across all rows.
///
/// Scores at or below [`SMAPE_FLOOR`] are undefined under the transform and
/// are dropped.
pub fn log_smape_values(table: &ResultsTable, instance: &str) -> Vec<f64> {
    table
        .smape_of(instance)
        .into_iter()
        .filter(|&s| s > SMAPE_FLOOR)
        .map(f64::ln)
        .filter(|v| v.is_finite())
        .collect()
}

/// Normal probability density at `x`.
pub(crate) fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / ((2.0 * std::f64::consts::PI).sqrt() * std)
}

/// Green-to-yellow color ramp over `t` in [0, 1], used for the bar colors of
/// the methods figure.
pub(crate) fn summer_ramp(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    RGBColor(
        (255.0 * t).round() as u8,
        (127.5 + 127.5 * t).round() as u8,
        102,
    )
}

/// Gaussian kernel density estimate with Scott's bandwidth.
#[derive(Debug, Clone)]
pub(crate) struct GaussianKde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit a KDE to the given values. `None` when there are fewer than two
    /// values or no spread to estimate a bandwidth from.
    pub(crate) fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let std = crate::stats::population_std(values);
        if !(std > 0.0) {
            return None;
        }
        let bandwidth = std * (values.len() as f64).powf(-0.2);
        Some(Self {
            points: values.to_vec(),
            bandwidth,
        })
    }

    /// Estimated density at `x`.
    pub(crate) fn density(&self, x: f64) -> f64 {
        let sum: f64 = self
            .points
            .iter()
            .map(|&p| normal_pdf(x, p, self.bandwidth))
            .sum();
        sum / self.points.len() as f64
    }

    /// Kernel bandwidth, also used to extend the evaluation grid past the
    /// data extremes.
    pub(crate) fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}
