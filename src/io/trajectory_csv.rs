//! Trajectory CSV export.
//!
//! One row per tick with header `x,y,value,timestamp`.

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::sim::TrajectoryRow;

/// Write trajectory rows to a CSV file.
pub fn export_trajectory_csv(rows: &[TrajectoryRow], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_trajectory_csv(rows, file)?;
    debug!("[IO] wrote {} trajectory rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write trajectory rows as CSV to any writer.
pub fn write_trajectory_csv<W: Write>(rows: &[TrajectoryRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv_writer.write_record(["x", "y", "value", "timestamp"])?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read trajectory rows from a CSV file.
pub fn load_trajectory_csv(path: &Path) -> Result<Vec<TrajectoryRow>> {
    let file = std::fs::File::open(path)?;
    read_trajectory_csv(file)
}

/// Read trajectory rows from CSV.
pub fn read_trajectory_csv<R: Read>(reader: R) -> Result<Vec<TrajectoryRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<TrajectoryRow> {
        vec![
            TrajectoryRow {
                x: 1.0,
                y: 2.0,
                value: -60.5,
                timestamp: 0.0,
            },
            TrajectoryRow {
                x: 2.5,
                y: 2.0,
                value: -61.0,
                timestamp: 0.5,
            },
        ]
    }

    #[test]
    fn test_header_and_rows() {
        let mut buf = Vec::new();
        write_trajectory_csv(&rows(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y,value,timestamp"));
        assert_eq!(lines.next(), Some("1.0,2.0,-60.5,0.0"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_empty_trajectory_still_has_header() {
        let mut buf = Vec::new();
        write_trajectory_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "x,y,value,timestamp");
    }

    #[test]
    fn test_file_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        export_trajectory_csv(&rows(), &path).unwrap();

        let loaded = load_trajectory_csv(&path).unwrap();
        assert_eq!(loaded, rows());
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let err = export_trajectory_csv(&rows(), Path::new("/nonexistent/dir/t.csv")).unwrap_err();
        assert!(matches!(err, crate::error::KshetraError::Io(_)));
    }
}
