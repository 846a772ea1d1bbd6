//! Fitted curves and their tolerance band.
//!
//! A [`FittedCurve`] is the candidate chosen for one training curve, together
//! with that training curve and the winning loss. The tolerance used for
//! classification is derived on demand:
//!
//! ```text
//! tolerance = tolerance_factor * max_x |selected(x) - training(x)|
//! ```
//!
//! unless it has been forced to a fixed value with
//! [`FittedCurve::force_tolerance`].

use crate::domain::curve::Curve;
use crate::error::CurveError;

/// Factor applied to the maximum deviation when none is configured.
pub const DEFAULT_TOLERANCE_FACTOR: f64 = 1.0;

/// The selected candidate for a training curve.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    selected: Curve,
    training: Curve,
    error: f64,
    max_deviation: f64,
    tolerance_factor: f64,
    forced_tolerance: Option<f64>,
}

impl FittedCurve {
    /// Bind a selected candidate to its training curve.
    ///
    /// Fails with [`CurveError::ShapeMismatch`] if the two curves are not sampled
    /// on the same x-values, and with [`CurveError::InvalidTolerance`] for a
    /// negative or non-finite factor.
    pub fn new(
        selected: Curve,
        training: Curve,
        error: f64,
        tolerance_factor: f64,
    ) -> Result<Self, CurveError> {
        validate_non_negative(tolerance_factor)?;

        // Both curves are immutable, so the deviation can be settled once.
        let max_deviation = training
            .difference(&selected)?
            .iter()
            .map(|d| d.y.abs())
            .fold(0.0, f64::max);

        Ok(Self {
            selected,
            training,
            error,
            max_deviation,
            tolerance_factor,
            forced_tolerance: None,
        })
    }

    /// Builder-style variant of [`FittedCurve::set_tolerance_factor`].
    pub fn with_tolerance_factor(mut self, factor: f64) -> Result<Self, CurveError> {
        self.set_tolerance_factor(factor)?;
        Ok(self)
    }

    /// The selected (ideal) curve.
    pub fn selected(&self) -> &Curve {
        &self.selected
    }

    /// The training curve the selection was made for.
    pub fn training(&self) -> &Curve {
        &self.training
    }

    /// Name of the selected curve.
    pub fn name(&self) -> &str {
        self.selected.name()
    }

    /// Total squared deviation between training and selected curve.
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn tolerance_factor(&self) -> f64 {
        self.tolerance_factor
    }

    /// Largest absolute pointwise deviation between selected and training curve.
    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }

    /// Set the factor and drop any forced tolerance.
    pub fn set_tolerance_factor(&mut self, factor: f64) -> Result<(), CurveError> {
        validate_non_negative(factor)?;
        self.tolerance_factor = factor;
        self.forced_tolerance = None;
        Ok(())
    }

    /// Pin the tolerance to `tolerance`, bypassing `factor * max_deviation`.
    ///
    /// The derived computation is skipped until the factor is written again
    /// via [`FittedCurve::set_tolerance_factor`]. Intended for tests and for
    /// callers that already know the band they want.
    pub fn force_tolerance(&mut self, tolerance: f64) -> Result<(), CurveError> {
        validate_non_negative(tolerance)?;
        self.forced_tolerance = Some(tolerance);
        Ok(())
    }

    pub fn is_tolerance_forced(&self) -> bool {
        self.forced_tolerance.is_some()
    }

    /// Admissible absolute deviation for a point to classify under this curve.
    pub fn tolerance(&self) -> f64 {
        match self.forced_tolerance {
            Some(t) => t,
            None => self.tolerance_factor * self.max_deviation,
        }
    }

    /// `(x, lower, upper)` of the tolerance band along the selected curve.
    pub fn band(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let tol = self.tolerance();
        self.selected.iter().map(move |p| (p.x, p.y - tol, p.y + tol))
    }
}

fn validate_non_negative(value: f64) -> Result<(), CurveError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CurveError::InvalidTolerance(value))
    }
}
