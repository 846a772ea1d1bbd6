//! Shared selection/classification workflow.
//!
//! Keeping this in one place avoids duplicating the core workflow between
//! subcommands:
//! CSV load -> best-fit selection -> tolerance -> classification
//!
//! The app layer then focuses on presentation and outputs.

use crate::domain::{ClassificationResult, FittedCurve, MissingXPolicy, Point, RunConfig};
use crate::error::AppError;
use crate::fit::loss::SquaredError;
use crate::fit::selection::{CandidateScore, rank_candidates, select_ideal_curves};
use crate::io::ingest::{CurveSet, load_curve_set, load_points};

/// Number of ranked candidates kept per training curve for reporting.
const RANKING_DEPTH: usize = 3;

/// Outputs of the selection stage.
#[derive(Debug, Clone)]
pub struct Selection {
    pub training: CurveSet,
    pub ideal: CurveSet,
    /// One fit per training curve, in training-column order.
    pub fitted: Vec<FittedCurve>,
    /// Best few candidates per training curve (same order as `fitted`).
    pub rankings: Vec<Vec<CandidateScore>>,
}

/// Load training/candidate tables and select an ideal curve per training curve.
pub fn run_selection(config: &RunConfig) -> Result<Selection, AppError> {
    let training = load_curve_set(&config.train_path)?;
    let ideal = load_curve_set(&config.ideal_path)?;

    let fitted = select_ideal_curves(
        &training.curves,
        &ideal.curves,
        &SquaredError,
        config.tolerance_factor,
    )?;

    let rankings = training
        .iter()
        .map(|t| -> Result<Vec<CandidateScore>, AppError> {
            let mut ranked = rank_candidates(t, &ideal.curves, &SquaredError)?;
            ranked.truncate(RANKING_DEPTH);
            Ok(ranked)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Selection {
        training,
        ideal,
        fitted,
        rankings,
    })
}

/// Load the test points for a run, in file order.
pub fn load_test_points(config: &RunConfig) -> Result<Vec<Point>, AppError> {
    let Some(path) = &config.test_path else {
        return Ok(Vec::new());
    };
    load_points(path)
}

/// Classify `points` against the fitted curves under `policy`.
pub fn classify<'a>(
    points: &[Point],
    fitted: &'a [FittedCurve],
    policy: MissingXPolicy,
) -> Result<Vec<ClassificationResult<'a>>, AppError> {
    Ok(crate::fit::classify::classify_points(points, fitted, policy)?)
}
