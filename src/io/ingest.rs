//! CSV ingest.
//!
//! Turns a table whose first column is `x` and whose remaining columns are
//! y-values into a [`CurveSet`]: one [`Curve`] per y-column, all sharing the
//! same x-axis.
//!
//! Design goals:
//! - **Strict schema**: the first header must be `x`, every cell must be a
//!   finite number (clear errors + exit code 2)
//! - **Deterministic behavior**: rows are sorted by x, duplicates are rejected
//! - **Separation of concerns**: no selection logic here

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::{Curve, Point};
use crate::error::AppError;

/// Curves parsed from one CSV, plus the raw table for archival.
#[derive(Debug, Clone)]
pub struct CurveSet {
    pub source: PathBuf,
    /// Original (trimmed) headers, `x` first.
    pub headers: Vec<String>,
    /// Shared x-axis, ascending.
    pub x: Vec<f64>,
    pub curves: Vec<Curve>,
}

impl CurveSet {
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.name() == name)
    }

    /// Rows of the raw table: `x` followed by each curve's y, in header order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.x.iter().enumerate().map(move |(i, &x)| {
            std::iter::once(x)
                .chain(self.curves.iter().map(move |c| c.samples()[i].y))
                .collect()
        })
    }
}

impl<'a> IntoIterator for &'a CurveSet {
    type Item = &'a Curve;
    type IntoIter = std::slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// Load a curve table from disk.
pub fn load_curve_set(path: &Path) -> Result<CurveSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let set = read_curve_set(file, path)?;
    tracing::info!(
        path = %path.display(),
        curves = set.len(),
        rows = set.x.len(),
        "loaded curve table"
    );
    Ok(set)
}

/// Parse a curve table from any reader; `source` is used for messages only.
pub fn read_curve_set<R: Read>(reader: R, source: &Path) -> Result<CurveSet, AppError> {
    let (headers, mut rows) = read_table(reader, source)?;

    rows.sort_by(|a, b| a[0].total_cmp(&b[0]));
    if let Some(w) = rows.windows(2).find(|w| w[0][0] == w[1][0]) {
        return Err(AppError::new(
            2,
            format!("'{}': duplicate x-value {}.", source.display(), w[0][0]),
        ));
    }

    let x: Vec<f64> = rows.iter().map(|r| r[0]).collect();
    let curves = headers[1..]
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let samples = rows
                .iter()
                .map(|r| Point { x: r[0], y: r[col + 1] })
                .collect();
            Curve::new(name.clone(), samples).map_err(AppError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CurveSet {
        source: source.to_path_buf(),
        headers,
        x,
        curves,
    })
}

/// Load observed points from disk.
pub fn load_points(path: &Path) -> Result<Vec<Point>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let points = read_points(file, path)?;
    tracing::info!(path = %path.display(), points = points.len(), "loaded test points");
    Ok(points)
}

/// Parse an `x,y` table of observed points.
///
/// Unlike [`read_curve_set`], rows are independent observations: file order is
/// kept and repeated x-values are allowed. Only the first y column is read.
pub fn read_points<R: Read>(reader: R, source: &Path) -> Result<Vec<Point>, AppError> {
    let (_, rows) = read_table(reader, source)?;
    Ok(rows.iter().map(|r| Point { x: r[0], y: r[1] }).collect())
}

/// Headers plus numeric rows in file order.
fn read_table<R: Read>(reader: R, source: &Path) -> Result<(Vec<String>, Vec<Vec<f64>>), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{}': {e}", source.display())))?
        .iter()
        .map(normalize_header_name)
        .collect();

    match headers.first() {
        Some(h) if h.eq_ignore_ascii_case("x") => {}
        _ => {
            return Err(AppError::new(
                2,
                format!("'{}': first column must be `x`.", source.display()),
            ));
        }
    }
    if headers.len() < 2 {
        return Err(AppError::new(
            2,
            format!("'{}': expected at least one y column after `x`.", source.display()),
        ));
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::new(2, format!("'{}' line {line}: CSV parse error: {e}", source.display()))
        })?;
        let row = parse_row(&record, &headers)
            .map_err(|msg| AppError::new(2, format!("'{}' line {line}: {msg}", source.display())))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::new(3, format!("'{}' has no data rows.", source.display())));
    }

    Ok((headers, rows))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_row(record: &StringRecord, headers: &[String]) -> Result<Vec<f64>, String> {
    if record.len() != headers.len() {
        return Err(format!(
            "expected {} fields, found {}",
            headers.len(),
            record.len()
        ));
    }
    record
        .iter()
        .zip(headers)
        .map(|(cell, name)| parse_f64(cell).ok_or_else(|| format!("invalid `{name}` value '{cell}'")))
        .collect()
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<CurveSet, AppError> {
        read_curve_set(csv.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn columns_become_curves() {
        let set = read("x,y1,y2\n1,5,7\n2,6,8\n3,7,9\n").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.headers, ["x", "y1", "y2"]);
        assert_eq!(set.get("y2").unwrap().lookup_y(2.0).unwrap(), 8.0);
        assert_eq!(set.rows().nth(1).unwrap(), vec![2.0, 6.0, 8.0]);
    }

    #[test]
    fn rows_are_sorted_by_x() {
        let set = read("x,y\n3,30\n-1,-10\n2,20\n").unwrap();
        assert_eq!(set.x, [-1.0, 2.0, 3.0]);
        assert_eq!(set.curves[0].samples()[0], Point::new(-1.0, -10.0));
    }

    #[test]
    fn points_keep_file_order_and_repeated_x() {
        let pts = read_points("x,y\n3,0.9\n2,2.05\n2,7.0\n1,50\n".as_bytes(), Path::new("test.csv"))
            .unwrap();
        assert_eq!(
            pts,
            [
                Point::new(3.0, 0.9),
                Point::new(2.0, 2.05),
                Point::new(2.0, 7.0),
                Point::new(1.0, 50.0),
            ]
        );
    }

    #[test]
    fn points_share_the_table_schema() {
        let read = |csv: &str| read_points(csv.as_bytes(), Path::new("test.csv"));
        assert!(read("t,y\n1,2\n").is_err());
        assert_eq!(read("x,y\n").unwrap_err().exit_code(), 3);

        let err = read("x,y\n1,2\n2,nan\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn bom_and_whitespace_are_tolerated() {
        let set = read("\u{feff}x , y1\n 1 , 2 \n").unwrap();
        assert_eq!(set.curves[0].name(), "y1");
    }

    #[test]
    fn schema_violations_are_reported() {
        assert!(read("t,y1\n1,2\n").is_err());
        assert!(read("x\n1\n").is_err());
        assert_eq!(read("x,y1\n").unwrap_err().exit_code(), 3);

        let err = read("x,y1\n1,2\n2,abc\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");

        let err = read("x,y1\n1,2\n1,3\n").unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }
}
