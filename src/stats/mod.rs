//! Statistical routines for the method comparisons.

pub mod bootstrap;
pub mod describe;
pub mod effect_size;
pub mod rank;
pub mod wilcoxon;

pub use bootstrap::{percentile_ci, BootstrapConfig, ConfidenceInterval};
pub use describe::{mean, median, nan_percentile, population_std, std_dev};
pub use effect_size::matched_pairs_r;
pub use rank::{average_ranks, ordinal_ranks, tie_correction};
pub use wilcoxon::{wilcoxon_signed_rank, Alternative, WilcoxonTest};
