//! Selection and classification.
//!
//! Responsibilities:
//!
//! - score candidate curves against a training curve (`loss`)
//! - pick the best candidate per training curve (`selection`)
//! - classify observed points against the picked curves (`classify`)

pub mod classify;
pub mod loss;
pub mod selection;

pub use classify::*;
pub use loss::*;
pub use selection::*;
