//! CLI argument parsing for aidan-eval.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aidan-eval")]
#[command(version)]
#[command(about = "Statistical comparison and figures for the AIDAN forecasting experiments", long_about = None)]
pub struct Cli {
    /// Zip archive holding the combined results table
    #[arg(long = "archive", value_name = "PATH", default_value = "combined_results.zip")]
    pub archive: PathBuf,

    /// Directory reports and figures are written to (created if missing)
    #[arg(long = "out-dir", value_name = "DIR", default_value = "figures")]
    pub out_dir: PathBuf,

    /// Number of bootstrap resamples behind the confidence intervals
    #[arg(long = "boot-samples", value_name = "N", default_value_t = 5000)]
    pub boot_samples: usize,

    /// Seed for the bootstrap RNG; omit for a fresh entropy seed
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Write the significance table, pivot tables, and method summary
    Report,
    /// Render the log-SMAPE density figure
    Density,
    /// Render the log-SMAPE violin figure
    Violin,
    /// Render the per-factor methods figure
    Methods,
    /// Produce every report and figure
    All,
}
