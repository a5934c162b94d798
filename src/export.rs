//! Week export for downstream charting
//!
//! Writes aggregated day buckets to CSV (one row per day, a column per
//! metric seen in the window) or pretty-printed JSON.

use crate::models::DayBucket;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Export day buckets to CSV format
pub fn export_week_csv<P: AsRef<Path>>(
    buckets: &[DayBucket],
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;

    // Union of metric names across the window, sorted for a stable header
    let metric_names: BTreeSet<&str> = buckets
        .iter()
        .flat_map(|b| b.totals.keys().map(String::as_str))
        .collect();

    write!(file, "date,label,percent")?;
    for name in &metric_names {
        write!(file, ",{}", name)?;
    }
    writeln!(file)?;

    for bucket in buckets {
        write!(
            file,
            "{},{},{}",
            bucket.date.format("%Y-%m-%d"),
            bucket.label,
            bucket.normalized_percent
        )?;
        for name in &metric_names {
            match bucket.totals.get(*name) {
                Some(value) => write!(file, ",{}", value)?,
                None => write!(file, ",")?,
            }
        }
        writeln!(file)?;
    }

    Ok(())
}

/// Export any serializable data structure to pretty JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}
