//! SQLite persistence.
//!
//! Two kinds of tables are written:
//!
//! - raw curve tables (`training`, `ideal`), one REAL column per CSV column,
//!   named `<Capitalized header><suffix>` (e.g. `Y1 (training func)`)
//! - the `mapping` table with one row per classified test point
//!
//! Tables are replaced on every write so re-running a workflow is idempotent.

use std::path::Path;

use rusqlite::{Connection, params, params_from_iter};

use crate::error::AppError;
use crate::io::export::ClassificationRecord;
use crate::io::ingest::CurveSet;

/// Name of the classification table.
pub const MAPPING_TABLE: &str = "mapping";

const MAPPING_COLUMNS: [&str; 4] = [
    "X (test func)",
    "Y (test func)",
    "Delta Y (test func)",
    "No. of ideal func",
];

/// Replace `table` in `db_path` with the raw contents of `set`.
pub fn write_curve_table(
    db_path: &Path,
    table: &str,
    set: &CurveSet,
    suffix: &str,
) -> Result<(), AppError> {
    let mut conn = open(db_path)?;
    let tx = conn.transaction().map_err(|e| storage_error(db_path, e))?;

    let columns: Vec<String> = set
        .headers
        .iter()
        .map(|h| quote_ident(&format!("{}{suffix}", capitalize(h))))
        .collect();
    let column_defs: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| if i == 0 { format!("{c} REAL PRIMARY KEY") } else { format!("{c} REAL") })
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table_q}; CREATE TABLE {table_q} ({defs});",
        table_q = quote_ident(table),
        defs = column_defs.join(", "),
    ))
    .map_err(|e| storage_error(db_path, e))?;

    {
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({placeholders})",
                quote_ident(table),
                columns.join(", "),
            ))
            .map_err(|e| storage_error(db_path, e))?;
        for row in set.rows() {
            stmt.execute(params_from_iter(row.iter()))
                .map_err(|e| storage_error(db_path, e))?;
        }
    }

    tx.commit().map_err(|e| storage_error(db_path, e))?;
    tracing::debug!(db = %db_path.display(), table, rows = set.x.len(), "wrote curve table");
    Ok(())
}

/// Replace the mapping table in `db_path` with `records`.
pub fn write_mapping_table(db_path: &Path, records: &[ClassificationRecord]) -> Result<(), AppError> {
    let mut conn = open(db_path)?;
    let tx = conn.transaction().map_err(|e| storage_error(db_path, e))?;

    let [x, y, delta, name] = MAPPING_COLUMNS.map(quote_ident);
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table}; \
         CREATE TABLE {table} ({x} REAL, {y} REAL, {delta} REAL, {name} VARCHAR(50));",
        table = quote_ident(MAPPING_TABLE),
    ))
    .map_err(|e| storage_error(db_path, e))?;

    {
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO {} ({x}, {y}, {delta}, {name}) VALUES (?1, ?2, ?3, ?4)",
                quote_ident(MAPPING_TABLE),
            ))
            .map_err(|e| storage_error(db_path, e))?;
        for r in records {
            stmt.execute(params![r.x, r.y, r.delta_y, r.ideal_func])
                .map_err(|e| storage_error(db_path, e))?;
        }
    }

    tx.commit().map_err(|e| storage_error(db_path, e))?;
    tracing::debug!(db = %db_path.display(), rows = records.len(), "wrote mapping table");
    Ok(())
}

/// Read the mapping table back, in insertion order.
pub fn read_mapping_table(db_path: &Path) -> Result<Vec<ClassificationRecord>, AppError> {
    let conn = open(db_path)?;
    let [x, y, delta, name] = MAPPING_COLUMNS.map(quote_ident);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {x}, {y}, {delta}, {name} FROM {} ORDER BY rowid",
            quote_ident(MAPPING_TABLE)
        ))
        .map_err(|e| storage_error(db_path, e))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ClassificationRecord {
                x: row.get(0)?,
                y: row.get(1)?,
                delta_y: row.get(2)?,
                ideal_func: row.get(3)?,
            })
        })
        .map_err(|e| storage_error(db_path, e))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| storage_error(db_path, e))
}

fn open(db_path: &Path) -> Result<Connection, AppError> {
    Connection::open(db_path).map_err(|e| storage_error(db_path, e))
}

fn storage_error(db_path: &Path, e: rusqlite::Error) -> AppError {
    AppError::new(6, format!("SQLite error on '{}': {e}", db_path.display()))
}

/// `x` -> `X`, `y1` -> `Y1`, `ABC` -> `Abc`.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_curve_set;

    #[test]
    fn capitalize_matches_column_convention() {
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize("y12"), "Y12");
        assert_eq!(capitalize("ABC"), "Abc");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn curve_table_has_suffixed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("training.db");
        let set = read_curve_set("x,y1,y2\n1,5,7\n2,6,8\n".as_bytes(), Path::new("t.csv")).unwrap();

        write_curve_table(&db, "training", &set, " (training func)").unwrap();
        // A second write replaces rather than appends.
        write_curve_table(&db, "training", &set, " (training func)").unwrap();

        let conn = Connection::open(&db).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM training", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);

        let y2: f64 = conn
            .query_row(
                "SELECT \"Y2 (training func)\" FROM training WHERE \"X (training func)\" = 2.0",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(y2, 8.0);
    }

    #[test]
    fn mapping_table_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("mapping.db");
        let records = vec![
            ClassificationRecord {
                x: 1.0,
                y: 2.0,
                delta_y: 0.1,
                ideal_func: "N3".to_string(),
            },
            ClassificationRecord {
                x: 2.0,
                y: 9.0,
                delta_y: -1.0,
                ideal_func: "-".to_string(),
            },
        ];

        write_mapping_table(&db, &records).unwrap();
        assert_eq!(read_mapping_table(&db).unwrap(), records);
    }
}
