//! Unified error hierarchy for weeklens
//!
//! The aggregation core itself never fails; errors only arise at the IO
//! boundary (record files, exports, configuration).

use crate::export::ExportError;
use crate::import::ImportError;
use thiserror::Error;

/// Top-level error type for all weeklens operations
#[derive(Debug, Error)]
pub enum WeekLensError {
    /// Record file ingestion errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for weeklens operations
pub type Result<T> = std::result::Result<T, WeekLensError>;

impl WeekLensError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WeekLensError::Import(ImportError::FileNotFound { .. }) => ErrorSeverity::Warning,
            WeekLensError::Validation(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WeekLensError::Import(ImportError::FileNotFound { path }) => {
                format!("Could not find record file: {}", path.display())
            }
            WeekLensError::Import(ImportError::UnsupportedFormat { format }) => {
                format!(
                    "Unsupported record file format: {}. Use .csv or .json.",
                    format
                )
            }
            WeekLensError::Configuration(reason) => {
                format!("Configuration problem: {}. Check your config file.", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
