//! Best-fit selection of candidate ("ideal") curves.
//!
//! For each training curve we score every candidate with a [`LossFunction`] and
//! keep the lowest. Selection rules:
//!
//! 1. A candidate replaces the current best only if its loss is strictly lower,
//!    so exact ties keep the first candidate in input order.
//! 2. An empty candidate set is an error, never a half-built fit.
//! 3. Loss failures (misaligned curves) abort the selection.

use rayon::prelude::*;

use crate::domain::{Curve, DEFAULT_TOLERANCE_FACTOR, FittedCurve};
use crate::error::CurveError;
use crate::fit::loss::LossFunction;

/// Loss of one candidate against a training curve (for diagnostics).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Position in the candidate slice.
    pub idx: usize,
    pub name: String,
    pub loss: f64,
}

/// Select the candidate with minimum loss against `training`.
///
/// The returned fit uses [`DEFAULT_TOLERANCE_FACTOR`]; callers that want a
/// different band set it on the result.
pub fn minimise_loss<L>(
    training: &Curve,
    candidates: &[Curve],
    loss: &L,
) -> Result<FittedCurve, CurveError>
where
    L: LossFunction + ?Sized,
{
    let best = candidates
        .iter()
        .try_fold(None::<(&Curve, f64)>, |best, candidate| {
            let score = loss.loss(training, candidate)?;
            Ok::<_, CurveError>(match best {
                Some((_, best_score)) if score < best_score => Some((candidate, score)),
                Some(kept) => Some(kept),
                None => Some((candidate, score)),
            })
        })?;

    let (winner, error) = best.ok_or(CurveError::EmptyCandidateSet)?;
    tracing::debug!(
        training = training.name(),
        ideal = winner.name(),
        error,
        "selected best-fit candidate"
    );

    FittedCurve::new(winner.clone(), training.clone(), error, DEFAULT_TOLERANCE_FACTOR)
}

/// Run [`minimise_loss`] for every training curve and apply `tolerance_factor`.
///
/// Training curves are independent, so they are fitted in parallel. Output order
/// matches `training`; if several fits fail, the error of the first one (in input
/// order) is returned.
pub fn select_ideal_curves<L>(
    training: &[Curve],
    candidates: &[Curve],
    loss: &L,
    tolerance_factor: f64,
) -> Result<Vec<FittedCurve>, CurveError>
where
    L: LossFunction + Sync + ?Sized,
{
    let fits: Vec<Result<FittedCurve, CurveError>> = training
        .par_iter()
        .map(|t| minimise_loss(t, candidates, loss)?.with_tolerance_factor(tolerance_factor))
        .collect();

    let fits = fits.into_iter().collect::<Result<Vec<_>, _>>()?;
    tracing::info!(
        training = training.len(),
        candidates = candidates.len(),
        tolerance_factor,
        "selected ideal curves"
    );
    Ok(fits)
}

/// Every candidate's loss against `training`, ascending.
///
/// The sort is stable, so the head of the list is always the candidate
/// [`minimise_loss`] picks.
pub fn rank_candidates<L>(
    training: &Curve,
    candidates: &[Curve],
    loss: &L,
) -> Result<Vec<CandidateScore>, CurveError>
where
    L: LossFunction + ?Sized,
{
    let mut scores = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| -> Result<CandidateScore, CurveError> {
            Ok(CandidateScore {
                idx,
                name: c.name().to_string(),
                loss: loss.loss(training, c)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    scores.sort_by(|a, b| a.loss.total_cmp(&b.loss));
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use crate::fit::loss::SquaredError;

    fn curve(name: &str, ys: &[f64]) -> Curve {
        let samples = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| Point::new(i as f64 + 1.0, y))
            .collect();
        Curve::new(name, samples).unwrap()
    }

    fn training() -> Curve {
        curve("y1", &[5.0, 6.0, 7.0])
    }

    fn candidates() -> Vec<Curve> {
        vec![
            curve("c1", &[7.0, 8.0, 9.0]), // loss 12
            curve("c2", &[6.0, 7.0, 8.0]), // loss 3
            curve("c3", &[7.0, 8.0, 7.0]), // loss 8
        ]
    }

    #[test]
    fn picks_minimum_loss_candidate() {
        let fit = minimise_loss(&training(), &candidates(), &SquaredError).unwrap();
        assert_eq!(fit.name(), "c2");
        assert_eq!(fit.error(), 3.0);
        assert_eq!(fit.training().name(), "y1");
        assert_eq!(fit.tolerance_factor(), DEFAULT_TOLERANCE_FACTOR);
    }

    #[test]
    fn ties_keep_first_candidate() {
        let cands = vec![
            curve("up", &[6.0, 7.0, 8.0]),
            curve("down", &[4.0, 5.0, 6.0]),
            curve("far", &[9.0, 9.0, 9.0]),
        ];
        for _ in 0..3 {
            let fit = minimise_loss(&training(), &cands, &SquaredError).unwrap();
            assert_eq!(fit.name(), "up");
        }
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let err = minimise_loss(&training(), &[], &SquaredError).unwrap_err();
        assert_eq!(err, CurveError::EmptyCandidateSet);
    }

    #[test]
    fn misaligned_candidate_aborts_selection() {
        let mut cands = candidates();
        cands.push(curve("short", &[5.0, 6.0]));
        let err = minimise_loss(&training(), &cands, &SquaredError).unwrap_err();
        assert!(matches!(err, CurveError::ShapeMismatch { .. }));
    }

    #[test]
    fn batch_selection_preserves_order_and_applies_factor() {
        let train = vec![training(), curve("y2", &[7.0, 8.0, 9.5])];
        let fits = select_ideal_curves(&train, &candidates(), &SquaredError, 2.0).unwrap();

        assert_eq!(fits.len(), 2);
        assert_eq!(fits[0].training().name(), "y1");
        assert_eq!(fits[0].name(), "c2");
        assert_eq!(fits[1].training().name(), "y2");
        assert_eq!(fits[1].name(), "c1");
        assert!(fits.iter().all(|f| f.tolerance_factor() == 2.0));
        // c1 vs y2: deviations 0, 0, 0.5 -> tolerance 2 * 0.5.
        assert_eq!(fits[1].tolerance(), 1.0);
    }

    #[test]
    fn ranking_head_matches_selection() {
        let ranked = rank_candidates(&training(), &candidates(), &SquaredError).unwrap();
        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["c2", "c3", "c1"]);
        assert_eq!(ranked[0].idx, 1);
    }
}
