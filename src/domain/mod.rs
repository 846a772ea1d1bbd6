//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sampled curves and points (`Curve`, `Point`)
//! - selection output (`FittedCurve`) and its tolerance band
//! - classification output (`ClassificationResult`, `Match`)
//! - run configuration (`RunConfig`, `MissingXPolicy`)

pub mod classification;
pub mod curve;
pub mod fitted;
pub mod types;

pub use classification::*;
pub use curve::*;
pub use fitted::*;
pub use types::*;
