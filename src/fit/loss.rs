//! Loss functions used to rank candidate curves.
//!
//! The only criterion shipped is the total squared deviation:
//!
//! ```text
//! loss(a, b) = Σ_i (a.y_i - b.y_i)^2
//! ```
//!
//! The sum is deliberately **not** normalized by the sample count or by the
//! magnitude of the curves. All candidates in one selection share the training
//! curve's discretization, so raw magnitudes are directly comparable, and the
//! workflow this reproduces ranks by the raw sum.
//!
//! Summation runs in stored sample order so that a given pair of curves always
//! produces the same bits, regardless of how selections are scheduled.

use crate::domain::Curve;
use crate::error::CurveError;

/// Scores how far `candidate` is from `target` (lower is better).
///
/// Implemented for [`SquaredError`] and for any
/// `Fn(&Curve, &Curve) -> Result<f64, CurveError>`.
pub trait LossFunction {
    fn loss(&self, target: &Curve, candidate: &Curve) -> Result<f64, CurveError>;
}

/// Total squared deviation between two aligned curves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredError;

impl LossFunction for SquaredError {
    fn loss(&self, target: &Curve, candidate: &Curve) -> Result<f64, CurveError> {
        squared_error(target, candidate)
    }
}

impl<F> LossFunction for F
where
    F: Fn(&Curve, &Curve) -> Result<f64, CurveError>,
{
    fn loss(&self, target: &Curve, candidate: &Curve) -> Result<f64, CurveError> {
        self(target, candidate)
    }
}

/// `Σ (a.y - b.y)^2` over aligned samples.
///
/// Fails with [`CurveError::ShapeMismatch`] when the curves are not sampled on
/// the same x-values.
pub fn squared_error(a: &Curve, b: &Curve) -> Result<f64, CurveError> {
    let deltas = a.difference(b)?;
    Ok(deltas.iter().map(|d| d.y * d.y).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use proptest::prelude::*;

    fn curve(name: &str, ys: &[f64]) -> Curve {
        let samples = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| Point::new(i as f64 + 1.0, y))
            .collect();
        Curve::new(name, samples).unwrap()
    }

    #[test]
    fn squared_error_of_known_pair() {
        let a = curve("a", &[5.0, 6.0, 7.0]);
        let b = curve("b", &[7.0, 8.0, 9.0]);

        assert_eq!(squared_error(&a, &b).unwrap(), 12.0);
        assert_eq!(squared_error(&b, &a).unwrap(), 12.0);
        assert_eq!(squared_error(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn squared_error_is_not_normalized() {
        // Same per-sample deviation, twice the samples -> twice the loss.
        let short = (curve("a", &[0.0, 0.0]), curve("b", &[1.0, 1.0]));
        let long = (curve("a", &[0.0; 4]), curve("b", &[1.0; 4]));
        assert_eq!(squared_error(&short.0, &short.1).unwrap(), 2.0);
        assert_eq!(squared_error(&long.0, &long.1).unwrap(), 4.0);
    }

    #[test]
    fn misaligned_curves_fail() {
        let a = curve("a", &[1.0, 2.0, 3.0]);
        let b = curve("b", &[1.0, 2.0]);
        assert!(matches!(SquaredError.loss(&a, &b), Err(CurveError::ShapeMismatch { .. })));
    }

    #[test]
    fn closures_are_loss_functions() {
        let a = curve("a", &[1.0, 2.0]);
        let b = curve("b", &[2.0, 4.0]);
        let abs_sum = |x: &Curve, y: &Curve| -> Result<f64, CurveError> {
            Ok(x.difference(y)?.iter().map(|d| d.y.abs()).sum())
        };
        assert_eq!(abs_sum.loss(&a, &b).unwrap(), 3.0);
    }

    proptest! {
        #[test]
        fn squared_error_is_commutative(
            pairs in prop::collection::vec((-1.0e6f64..1.0e6, -1.0e6f64..1.0e6), 1..64)
        ) {
            let (ya, yb): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let a = curve("a", &ya);
            let b = curve("b", &yb);
            prop_assert_eq!(squared_error(&a, &b).unwrap(), squared_error(&b, &a).unwrap());
        }

        #[test]
        fn squared_error_of_self_is_zero(ys in prop::collection::vec(-1.0e6f64..1.0e6, 1..64)) {
            let a = curve("a", &ys);
            prop_assert_eq!(squared_error(&a, &a).unwrap(), 0.0);
        }
    }
}
