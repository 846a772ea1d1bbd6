//! Classification outcomes.

use crate::domain::curve::Point;
use crate::domain::fitted::FittedCurve;

/// A point fell inside the tolerance band of `curve`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub curve: &'a FittedCurve,
    /// `|curve(x) - y|`, strictly below `curve.tolerance()`.
    pub distance: f64,
}

/// Result of classifying one observed point.
///
/// The matched curve and its distance travel together, so a result either has
/// both or neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult<'a> {
    pub point: Point,
    pub matched: Option<Match<'a>>,
}

impl<'a> ClassificationResult<'a> {
    pub fn unmatched(point: Point) -> Self {
        Self {
            point,
            matched: None,
        }
    }

    pub fn matched(point: Point, curve: &'a FittedCurve, distance: f64) -> Self {
        Self {
            point,
            matched: Some(Match { curve, distance }),
        }
    }

    pub fn matched_curve(&self) -> Option<&'a FittedCurve> {
        self.matched.map(|m| m.curve)
    }

    pub fn distance(&self) -> Option<f64> {
        self.matched.map(|m| m.distance)
    }

    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}
