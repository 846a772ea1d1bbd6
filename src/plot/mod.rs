//! Terminal plots of fits and classified points.

pub mod ascii;

pub use ascii::*;
