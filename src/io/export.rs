//! Export classification results and fitted curves.
//!
//! - `mapping.csv`: one row per test point (same columns as the SQLite mapping table)
//! - `fits.json`: one entry per training curve with the selected ideal curve and
//!   its tolerance

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClassificationResult, FittedCurve};
use crate::error::AppError;

/// Delta written for points without a classification.
pub const UNMATCHED_DELTA: f64 = -1.0;

/// Ideal-function label written for points without a classification.
pub const UNMATCHED_LABEL: &str = "-";

/// Flat, persisted form of a [`ClassificationResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    #[serde(rename = "X (test func)")]
    pub x: f64,
    #[serde(rename = "Y (test func)")]
    pub y: f64,
    /// Distance to the matched curve, or [`UNMATCHED_DELTA`].
    #[serde(rename = "Delta Y (test func)")]
    pub delta_y: f64,
    /// Matched curve name with `y` replaced by `N` (`y42` -> `N42`), or
    /// [`UNMATCHED_LABEL`].
    #[serde(rename = "No. of ideal func")]
    pub ideal_func: String,
}

impl ClassificationRecord {
    pub fn from_result(result: &ClassificationResult<'_>) -> Self {
        let (delta_y, ideal_func) = match result.matched {
            Some(m) => (m.distance, m.curve.name().replace('y', "N")),
            None => (UNMATCHED_DELTA, UNMATCHED_LABEL.to_string()),
        };
        Self {
            x: result.point.x,
            y: result.point.y,
            delta_y,
            ideal_func,
        }
    }
}

/// Map every result to its record, preserving order.
pub fn to_records(results: &[ClassificationResult<'_>]) -> Vec<ClassificationRecord> {
    results.iter().map(ClassificationRecord::from_result).collect()
}

/// One selection, as written to `fits.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub training: String,
    pub ideal: String,
    pub squared_error: f64,
    pub max_deviation: f64,
    pub tolerance_factor: f64,
    pub tolerance: f64,
}

impl From<&FittedCurve> for FitSummary {
    fn from(fit: &FittedCurve) -> Self {
        Self {
            training: fit.training().name().to_string(),
            ideal: fit.name().to_string(),
            squared_error: fit.error(),
            max_deviation: fit.max_deviation(),
            tolerance_factor: fit.tolerance_factor(),
            tolerance: fit.tolerance(),
        }
    }
}

/// The `fits.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitsFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub fits: Vec<FitSummary>,
}

/// Write classification records to a CSV file.
pub fn write_mapping_csv(path: &Path, records: &[ClassificationRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV '{}': {e}", path.display())))?;

    Ok(())
}

/// Write the selected curves to a JSON file.
pub fn write_fits_json(path: &Path, fitted: &[FittedCurve]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fits JSON '{}': {e}", path.display())))?;

    let doc = FitsFile {
        tool: "ideal".to_string(),
        generated_at: Utc::now(),
        fits: fitted.iter().map(FitSummary::from).collect(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write fits JSON: {e}")))?;

    Ok(())
}

/// Read a fits JSON file written by [`write_fits_json`].
pub fn read_fits_json(path: &Path) -> Result<FitsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fits JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fits JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, Point};

    fn fitted() -> FittedCurve {
        let ideal = Curve::from_columns("y42", &[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let train = Curve::from_columns("y1", &[1.0, 2.0], &[1.5, 2.0]).unwrap();
        FittedCurve::new(ideal, train, 0.25, 2.0).unwrap()
    }

    #[test]
    fn records_rename_and_use_sentinels() {
        let fit = fitted();
        let hit = ClassificationResult::matched(Point::new(1.0, 1.2), &fit, 0.2);
        let miss = ClassificationResult::unmatched(Point::new(2.0, 9.0));

        let records = to_records(&[hit, miss]);
        assert_eq!(records[0].ideal_func, "N42");
        assert_eq!(records[0].delta_y, 0.2);
        assert_eq!(records[1].ideal_func, UNMATCHED_LABEL);
        assert_eq!(records[1].delta_y, UNMATCHED_DELTA);
    }

    #[test]
    fn mapping_csv_uses_table_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.csv");
        let fit = fitted();
        let records = to_records(&[ClassificationResult::matched(Point::new(1.0, 1.2), &fit, 0.2)]);

        write_mapping_csv(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("X (test func),Y (test func),Delta Y (test func),No. of ideal func")
        );
        assert_eq!(lines.next(), Some("1.0,1.2,0.2,N42"));
    }

    #[test]
    fn fits_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fits.json");
        write_fits_json(&path, &[fitted()]).unwrap();

        let doc = read_fits_json(&path).unwrap();
        assert_eq!(doc.tool, "ideal");
        assert_eq!(doc.fits.len(), 1);
        assert_eq!(doc.fits[0].ideal, "y42");
        assert_eq!(doc.fits[0].tolerance, 1.0);
    }
}
