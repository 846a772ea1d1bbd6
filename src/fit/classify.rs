//! Classification of observed points against fitted curves.
//!
//! A point `(x, y)` matches a fitted curve when
//!
//! ```text
//! |selected(x) - y| < tolerance
//! ```
//!
//! (strict). Among all matches the closest wins; ties keep the first fitted
//! curve in input order. A selected curve without a sample at exactly `x` is a
//! data inconsistency and fails the whole call with [`CurveError::NotFound`];
//! "no curve within tolerance" is an ordinary unmatched result.

use rayon::prelude::*;

use crate::domain::{ClassificationResult, FittedCurve, Match, MissingXPolicy, Point};
use crate::error::CurveError;

/// Classify one point against `fitted`.
pub fn find_classification<'a>(
    point: Point,
    fitted: &'a [FittedCurve],
) -> Result<ClassificationResult<'a>, CurveError> {
    let best = fitted.iter().try_fold(None::<Match<'a>>, |best, curve| {
        let y = curve.selected().lookup_y(point.x)?;
        let distance = (y - point.y).abs();

        if distance >= curve.tolerance() {
            return Ok::<_, CurveError>(best);
        }
        Ok(match best {
            Some(kept) if kept.distance <= distance => Some(kept),
            _ => Some(Match { curve, distance }),
        })
    })?;

    Ok(ClassificationResult {
        point,
        matched: best,
    })
}

/// Classify every point, in parallel.
///
/// Output order matches `points`. How a missing x is handled is up to `policy`:
/// [`MissingXPolicy::FailFast`] returns the first failure in input order,
/// [`MissingXPolicy::Skip`] records the point as unclassified.
pub fn classify_points<'a>(
    points: &[Point],
    fitted: &'a [FittedCurve],
    policy: MissingXPolicy,
) -> Result<Vec<ClassificationResult<'a>>, CurveError> {
    let outcomes: Vec<(Point, Result<ClassificationResult<'a>, CurveError>)> = points
        .par_iter()
        .map(|&p| (p, find_classification(p, fitted)))
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut skipped = 0usize;
    for (point, outcome) in outcomes {
        match (outcome, policy) {
            (Ok(result), _) => results.push(result),
            (Err(err @ CurveError::NotFound { .. }), MissingXPolicy::Skip) => {
                tracing::warn!(x = point.x, y = point.y, %err, "point left unclassified");
                skipped += 1;
                results.push(ClassificationResult::unmatched(point));
            }
            (Err(err), _) => return Err(err),
        }
    }

    let matched = results.iter().filter(|r| r.is_match()).count();
    tracing::info!(
        points = points.len(),
        matched,
        skipped,
        "classified test points"
    );
    Ok(results)
}
