//! Error types.
//!
//! Two layers:
//!
//! - [`CurveError`]: failures of the selection/classification engine. These are
//!   data-consistency problems (missing x, misaligned curves, empty candidate set)
//!   and are always returned to the immediate caller.
//! - [`AppError`]: what the binary reports. Carries a process exit code next to a
//!   human-readable message.

use thiserror::Error;

/// Failures raised by the curve engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// No sample of `curve` has exactly this x-value.
    #[error("x={x} is not a sample of curve `{curve}`")]
    NotFound { curve: String, x: f64 },

    /// `minimise_loss` was given nothing to choose from.
    #[error("cannot select a best fit from an empty candidate set")]
    EmptyCandidateSet,

    /// Two curves do not share the same x-values in the same order.
    #[error("curves `{left}` and `{right}` are not aligned: {detail}")]
    ShapeMismatch {
        left: String,
        right: String,
        detail: String,
    },

    /// A curve failed construction-time validation.
    #[error("invalid curve `{name}`: {reason}")]
    InvalidCurve { name: String, reason: String },

    /// Tolerance factors and forced tolerances must be finite and non-negative.
    #[error("invalid tolerance value {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),
}

impl CurveError {
    /// Exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            CurveError::InvalidCurve { .. } | CurveError::InvalidTolerance(_) => 2,
            CurveError::EmptyCandidateSet => 3,
            CurveError::ShapeMismatch { .. } => 4,
            CurveError::NotFound { .. } => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_errors_keep_their_exit_codes() {
        let err: AppError = CurveError::EmptyCandidateSet.into();
        assert_eq!(err.exit_code(), 3);

        let err: AppError = CurveError::NotFound {
            curve: "y7".to_string(),
            x: 2.5,
        }
        .into();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("y7"));
    }
}
