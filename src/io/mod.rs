//! Input/output collaborators around the engine.
//!
//! - CSV ingest of curve tables (`ingest`)
//! - classification/fit exports (CSV/JSON) (`export`)
//! - SQLite persistence (`sqlite`)

pub mod export;
pub mod ingest;
pub mod sqlite;

pub use export::*;
pub use ingest::*;
pub use sqlite::*;
