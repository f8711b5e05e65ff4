//! # aidan-eval
//!
//! Statistical comparison and figure generation for the AIDAN forecasting
//! experiments. Loads a zipped table of per-dataset SMAPE scores, compares
//! the proposed method against its baseline and naive references with a
//! Wilcoxon signed-rank test, a matched-pairs effect size, and bootstrap
//! confidence intervals, and renders the paper's density, violin, and
//! per-factor figures.

pub mod archive;
pub mod cli;
pub mod compare;
pub mod error;
pub mod plot;
pub mod report;
pub mod stats;
pub mod table;

pub use error::{EvalError, Result};

pub mod prelude {
    pub use crate::archive::{load_results, read_results};
    pub use crate::compare::{compare_methods, primary_means, MethodComparison};
    pub use crate::error::{EvalError, Result};
    pub use crate::stats::{
        matched_pairs_r, percentile_ci, wilcoxon_signed_rank, Alternative, BootstrapConfig,
        WilcoxonTest,
    };
    pub use crate::table::{ResultsTable, RunRecord, Strategy};
}
