//! CSV point import
//!
//! Reads a headerless CSV whose first two columns are x and y. Rows that do
//! not parse are skipped and reported; they never abort the load.

mod options;

use std::io::Read;
use std::path::Path;

use glam::DVec2;

pub use options::ImportOptions;

/// Errors that can occur while loading points
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to open '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to read CSV: {0}")]
    Csv(String),
}

/// A row that was skipped because it did not hold two numbers
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the input
    pub line: u64,
    /// Raw (trimmed) fields of the row
    pub fields: Vec<String>,
    /// Why the row was rejected
    pub reason: String,
}

/// Points read from a CSV, in row order
#[derive(Debug, Clone, Default)]
pub struct PointLoad {
    /// Valid points
    pub points: Vec<DVec2>,
    /// Rows that were skipped
    pub skipped: Vec<SkippedRow>,
}

/// Load points from a CSV file
pub fn load_points(path: impl AsRef<Path>, options: &ImportOptions) -> Result<PointLoad, ImportError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let load = load_points_from_reader(file, options)?;
    tracing::debug!(
        "Loaded {} points from {} ({} rows skipped)",
        load.points.len(),
        path.display(),
        load.skipped.len()
    );
    Ok(load)
}

/// Load points from any reader holding CSV text
pub fn load_points_from_reader(
    reader: impl Read,
    options: &ImportOptions,
) -> Result<PointLoad, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut load = PointLoad::default();

    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| ImportError::Csv(e.to_string()))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        match parse_point(&record, options) {
            Ok(point) => load.points.push(point),
            Err(reason) => {
                let fields: Vec<String> = record.iter().map(str::to_string).collect();
                tracing::warn!("Skipping invalid row {}: {:?} ({})", line, fields, reason);
                load.skipped.push(SkippedRow {
                    line,
                    fields,
                    reason,
                });
            }
        }
    }

    Ok(load)
}

/// Parse the x and y columns of one record
fn parse_point(record: &csv::StringRecord, options: &ImportOptions) -> Result<DVec2, String> {
    let field = |column: usize| -> Result<f64, String> {
        let text = record
            .get(column)
            .ok_or_else(|| format!("missing column {}", column))?;
        text.parse::<f64>()
            .map_err(|e| format!("column {}: {} ({:?})", column, e, text))
    };

    Ok(DVec2::new(field(options.x_column)?, field(options.y_column)?))
}
