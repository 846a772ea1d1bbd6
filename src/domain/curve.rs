//! Sampled curves.
//!
//! A [`Curve`] is a named, x-sorted sequence of [`Point`]s. Curves compared by
//! the engine are expected to share one discretization: lookups use exact
//! floating-point equality and subtraction requires identical x-values in the
//! same order. Nothing here interpolates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// A single `(x, y)` sample or observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A named curve with strictly increasing, finite x-values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    name: String,
    samples: Vec<Point>,
}

impl Curve {
    /// Build a curve, validating the sample sequence.
    ///
    /// Rejects empty sequences, non-finite coordinates and x-values that are not
    /// strictly increasing (which also rules out duplicates).
    pub fn new(name: impl Into<String>, samples: Vec<Point>) -> Result<Self, CurveError> {
        let name = name.into();
        let invalid = |reason: String| CurveError::InvalidCurve {
            name: name.clone(),
            reason,
        };

        if samples.is_empty() {
            return Err(invalid("no samples".to_string()));
        }
        if let Some(p) = samples.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(invalid(format!("non-finite sample ({}, {})", p.x, p.y)));
        }
        if let Some(w) = samples.windows(2).find(|w| w[1].x <= w[0].x) {
            return Err(invalid(format!(
                "x-values must be strictly increasing (found {} after {})",
                w[1].x, w[0].x
            )));
        }

        Ok(Self { name, samples })
    }

    /// Build a curve from parallel x/y columns.
    pub fn from_columns(name: impl Into<String>, xs: &[f64], ys: &[f64]) -> Result<Self, CurveError> {
        let name = name.into();
        if xs.len() != ys.len() {
            return Err(CurveError::InvalidCurve {
                name,
                reason: format!("{} x-values but {} y-values", xs.len(), ys.len()),
            });
        }
        let samples = xs.iter().zip(ys).map(|(&x, &y)| Point { x, y }).collect();
        Self::new(name, samples)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[Point] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the curve has no samples (never true after construction).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate the samples in stored (x-ascending) order.
    ///
    /// Each call starts a fresh pass.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Point>> {
        self.samples.iter().copied()
    }

    /// The y-value of the sample whose x equals `x` exactly.
    pub fn lookup_y(&self, x: f64) -> Result<f64, CurveError> {
        // Samples are finite and strictly increasing, so only a NaN probe can
        // fail to compare; treat it as "not here".
        self.samples
            .binary_search_by(|p| p.x.partial_cmp(&x).unwrap_or(Ordering::Less))
            .map(|idx| self.samples[idx].y)
            .map_err(|_| CurveError::NotFound {
                curve: self.name.clone(),
                x,
            })
    }

    /// Pointwise `self - other` as `(x, Δy)` samples.
    ///
    /// Both curves must have the same sample count and identical x-values.
    pub fn difference(&self, other: &Curve) -> Result<Vec<Point>, CurveError> {
        if self.len() != other.len() {
            return Err(self.mismatch(
                other,
                format!("{} samples vs {} samples", self.len(), other.len()),
            ));
        }

        self.samples
            .iter()
            .zip(&other.samples)
            .map(|(a, b)| {
                if a.x == b.x {
                    Ok(Point { x: a.x, y: a.y - b.y })
                } else {
                    Err(self.mismatch(other, format!("x={} aligned with x={}", a.x, b.x)))
                }
            })
            .collect()
    }

    /// Smallest and largest x.
    pub fn x_range(&self) -> (f64, f64) {
        // Non-empty by construction.
        let first = self.samples[0].x;
        let last = self.samples[self.samples.len() - 1].x;
        (first, last)
    }

    /// Smallest and largest y.
    pub fn y_range(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)))
    }

    fn mismatch(&self, other: &Curve, detail: String) -> CurveError {
        CurveError::ShapeMismatch {
            left: self.name.clone(),
            right: other.name.clone(),
            detail,
        }
    }
}

impl<'a> IntoIterator for &'a Curve {
    type Item = Point;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Point>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(name: &str, pts: &[(f64, f64)]) -> Curve {
        Curve::new(name, pts.iter().copied().map(Point::from).collect()).unwrap()
    }

    #[test]
    fn lookup_is_exact() {
        let c = curve("y1", &[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        assert_eq!(c.lookup_y(2.0).unwrap(), 6.0);
        assert_eq!(c.lookup_y(3.0).unwrap(), 7.0);

        let err = c.lookup_y(2.5).unwrap_err();
        assert_eq!(
            err,
            CurveError::NotFound {
                curve: "y1".to_string(),
                x: 2.5
            }
        );
        assert!(c.lookup_y(f64::NAN).is_err());
        // No nearest-neighbour fallback, even for tiny offsets.
        assert!(c.lookup_y(2.0 + 1e-12).is_err());
    }

    #[test]
    fn difference_is_pointwise() {
        let a = curve("a", &[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        let b = curve("b", &[(1.0, 7.0), (2.0, 8.0), (3.0, 9.0)]);
        let d = a.difference(&b).unwrap();
        assert_eq!(d, vec![Point::new(1.0, -2.0), Point::new(2.0, -2.0), Point::new(3.0, -2.0)]);
    }

    #[test]
    fn difference_rejects_misaligned_curves() {
        let a = curve("a", &[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        let shorter = curve("b", &[(1.0, 7.0), (2.0, 8.0)]);
        let shifted = curve("c", &[(1.0, 7.0), (2.5, 8.0), (3.0, 9.0)]);

        assert!(matches!(a.difference(&shorter), Err(CurveError::ShapeMismatch { .. })));
        assert!(matches!(a.difference(&shifted), Err(CurveError::ShapeMismatch { .. })));
    }

    #[test]
    fn construction_validates_samples() {
        assert!(Curve::new("empty", vec![]).is_err());
        assert!(Curve::new("dup", vec![Point::new(1.0, 0.0), Point::new(1.0, 1.0)]).is_err());
        assert!(Curve::new("desc", vec![Point::new(2.0, 0.0), Point::new(1.0, 1.0)]).is_err());
        assert!(Curve::new("nan", vec![Point::new(1.0, f64::NAN)]).is_err());
        assert!(Curve::from_columns("cols", &[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn iteration_is_restartable() {
        let c = curve("y1", &[(1.0, 5.0), (2.0, 6.0)]);
        let first: Vec<Point> = c.iter().collect();
        let second: Vec<Point> = (&c).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(c.x_range(), (1.0, 2.0));
        assert_eq!(c.y_range(), (5.0, 6.0));
    }
}
