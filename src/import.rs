//! Record file ingestion
//!
//! Reads dated health records from CSV (wide format: a `date` column plus one
//! column per metric) or JSON files. Rows with unparseable dates and cells
//! with non-numeric or negative values are skipped with a warning and tallied
//! in the [`ImportReport`] instead of failing the whole import.

use crate::models::HealthRecord;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Record file ingestion errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unsupported file format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    ParseError { format: String, reason: String },

    /// Required column missing from a CSV header
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of an import: the usable records plus skip tallies
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Successfully parsed records
    pub records: Vec<HealthRecord>,

    /// Rows dropped because their date could not be parsed
    pub skipped_dates: usize,

    /// Cells dropped because their value was non-numeric or negative
    pub skipped_values: usize,
}

impl ImportReport {
    /// True when anything was dropped during the import
    pub fn has_skips(&self) -> bool {
        self.skipped_dates > 0 || self.skipped_values > 0
    }
}

/// Import records from a file, dispatching on the extension
pub fn import_records<P: AsRef<Path>>(path: P) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => import_csv(path),
        "json" => import_json(path),
        other => Err(ImportError::UnsupportedFormat {
            format: other.to_string(),
        }),
    }
}

/// Import records from a wide-format CSV file.
///
/// The header must contain a date column (`date`, `day` or `data`); every
/// other column is treated as a metric name. Empty cells contribute nothing.
pub fn import_csv<P: AsRef<Path>>(path: P) -> Result<ImportReport, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path.as_ref())
        .map_err(|e| ImportError::ParseError {
            format: "csv".to_string(),
            reason: e.to_string(),
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::ParseError {
            format: "csv".to_string(),
            reason: e.to_string(),
        })?
        .iter()
        .map(normalize_column_name)
        .collect();

    let date_column = headers
        .iter()
        .position(|h| matches!(h.as_str(), "date" | "day" | "data"))
        .ok_or_else(|| ImportError::MissingColumn {
            column: "date".to_string(),
        })?;

    let mut report = ImportReport::default();

    for (row_index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| ImportError::ParseError {
            format: "csv".to_string(),
            reason: e.to_string(),
        })?;

        let date_field = row.get(date_column).unwrap_or("");
        let date = match parse_day(date_field) {
            Some(date) => date,
            None => {
                warn!(row = row_index + 1, value = date_field, "Skipping row with unparseable date");
                report.skipped_dates += 1;
                continue;
            }
        };

        let mut metrics = BTreeMap::new();
        for (column, field) in row.iter().enumerate() {
            if column == date_column || field.is_empty() {
                continue;
            }
            let Some(name) = headers.get(column) else {
                continue;
            };
            match parse_value(field) {
                Some(value) => {
                    metrics
                        .entry(name.clone())
                        .and_modify(|total: &mut Decimal| *total += value)
                        .or_insert(value);
                }
                None => {
                    warn!(
                        row = row_index + 1,
                        metric = name.as_str(),
                        value = field,
                        "Skipping non-numeric or negative value"
                    );
                    report.skipped_values += 1;
                }
            }
        }

        if !metrics.is_empty() {
            report.records.push(HealthRecord {
                date,
                metrics,
                source: None,
            });
        }
    }

    Ok(report)
}

/// Wire shape of a JSON record: the date stays a string so unparseable
/// values can be skipped instead of failing deserialization
#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    #[serde(default)]
    metrics: BTreeMap<String, Decimal>,
    #[serde(default)]
    source: Option<String>,
}

/// Import records from a JSON array of `{date, metrics, source}` objects
pub fn import_json<P: AsRef<Path>>(path: P) -> Result<ImportReport, ImportError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let raw_records: Vec<RawRecord> =
        serde_json::from_str(&content).map_err(|e| ImportError::ParseError {
            format: "json".to_string(),
            reason: e.to_string(),
        })?;

    let mut report = ImportReport::default();

    for raw in raw_records {
        let date = match parse_day(&raw.date) {
            Some(date) => date,
            None => {
                warn!(value = raw.date.as_str(), "Skipping record with unparseable date");
                report.skipped_dates += 1;
                continue;
            }
        };

        let mut metrics = BTreeMap::new();
        for (name, value) in raw.metrics {
            if value < Decimal::ZERO {
                warn!(metric = name.as_str(), %value, "Skipping negative value");
                report.skipped_values += 1;
                continue;
            }
            metrics.insert(name, value);
        }

        report.records.push(HealthRecord {
            date,
            metrics,
            source: raw.source,
        });
    }

    Ok(report)
}

/// Parse a calendar day, trying common date and datetime layouts
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    for format in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.fZ",
    ];
    for format in &datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }

    None
}

fn parse_value(field: &str) -> Option<Decimal> {
    let value = Decimal::from_str(field.trim()).ok()?;
    if value < Decimal::ZERO {
        return None;
    }
    Some(value)
}

fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}
