//! `ideal-curves` library crate.
//!
//! Picks, for each training curve, the candidate curve with the lowest total
//! squared deviation, then classifies observed points against the picked curves
//! within a per-curve tolerance band.
//!
//! The binary (`ideal`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the engine (`domain`, `fit`) stays free of CSV/SQLite/terminal concerns

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod plot;
pub mod report;
