// Library interface for the weeklens modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod goal;
pub mod import;
pub mod locale;
pub mod logging;
pub mod models;
pub mod week;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{Result, WeekLensError};
pub use goal::{normalize_goal, GoalEvaluator};
pub use import::{import_records, ImportReport};
pub use locale::{LocaleWeekdays, WeekdayLabels};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use models::{DayBucket, GoalProgress, HealthRecord};
pub use week::{TrendDirection, WeekAggregator, WeekConfig, WeekSummary, WINDOW_DAYS};
