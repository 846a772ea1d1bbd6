//! Run configuration types.
//!
//! These are derived from CLI flags (plus defaults) and handed to the pipeline,
//! so the core never reads flags or environment variables itself.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Tolerance factor used by the reference workflow (`√2`).
pub const ACCEPTED_FACTOR: f64 = std::f64::consts::SQRT_2;

/// What a batch classification does when a point's x is missing from a
/// selected curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingXPolicy {
    /// Abort the whole batch with the first `NotFound` (in input order).
    #[default]
    #[value(name = "fail")]
    #[serde(rename = "fail")]
    FailFast,
    /// Record the point as unclassified and continue.
    Skip,
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub train_path: PathBuf,
    pub ideal_path: PathBuf,
    /// Test points; `None` for selection-only runs.
    pub test_path: Option<PathBuf>,

    pub out_dir: PathBuf,
    /// Write `training.db`, `ideal.db` and `mapping.db`.
    pub write_db: bool,

    pub tolerance_factor: f64,
    pub missing_x: MissingXPolicy,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}
