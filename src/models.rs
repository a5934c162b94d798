use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical metric names used across the health tracking system
pub mod metric {
    pub const STEPS: &str = "steps";
    pub const CALORIES: &str = "calories";
    pub const WATER_ML: &str = "water_ml";
    pub const SLEEP_HOURS: &str = "sleep_hours";
    pub const ACTIVE_MINUTES: &str = "active_minutes";
    pub const HEART_RATE_BPM: &str = "heart_rate_bpm";
}

/// A single dated health record as supplied by the data-fetching layer.
///
/// Records are unordered and may carry any subset of metrics. Two records
/// on the same day are NOT pre-merged; the weekly aggregator sums them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Calendar day the record belongs to
    pub date: NaiveDate,

    /// Metric name to non-negative value (e.g. "steps" -> 9000)
    pub metrics: BTreeMap<String, Decimal>,

    /// Originating device or app, when known
    pub source: Option<String>,
}

impl HealthRecord {
    /// Create a record with a single metric value
    pub fn single(date: NaiveDate, metric: impl Into<String>, value: Decimal) -> Self {
        let mut metrics = BTreeMap::new();
        metrics.insert(metric.into(), value);
        HealthRecord {
            date,
            metrics,
            source: None,
        }
    }
}

/// One slot of the 7-day aggregation window, ready for chart rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Position in the window: 0 = six days ago, 6 = today
    pub day_index: usize,

    /// Calendar date this bucket represents
    pub date: NaiveDate,

    /// Locale-appropriate weekday name
    pub label: String,

    /// Summed metric values for the day; empty when no records matched
    pub totals: BTreeMap<String, Decimal>,

    /// Primary-metric total as a clamped percentage of the ceiling
    pub normalized_percent: u8,
}

impl DayBucket {
    /// Summed value for a metric, zero when absent
    pub fn total(&self, metric: &str) -> Decimal {
        self.totals.get(metric).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Progress toward a fixed numeric goal, recomputed on every call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// The value achieved so far
    pub current_value: Decimal,

    /// The target value (non-positive goals always yield 0%)
    pub goal_value: Decimal,

    /// Clamped progress percentage, 0..=100
    pub percent: u8,
}

impl GoalProgress {
    /// True when the goal has been met or exceeded
    pub fn achieved(&self) -> bool {
        self.percent >= 100
    }

    /// Remaining amount toward the goal, zero once achieved
    pub fn remaining(&self) -> Decimal {
        (self.goal_value - self.current_value).max(Decimal::ZERO)
    }
}

/// Display unit for a known metric name
pub fn metric_unit(name: &str) -> &'static str {
    match name {
        metric::STEPS => "steps",
        metric::CALORIES => "kcal",
        metric::WATER_ML => "ml",
        metric::SLEEP_HOURS => "h",
        metric::ACTIVE_MINUTES => "min",
        metric::HEART_RATE_BPM => "bpm",
        _ => "",
    }
}

/// Default chart ceiling (the visual "100%" bar height) for a known metric
pub fn default_ceiling(name: &str) -> Option<Decimal> {
    match name {
        metric::STEPS => Some(dec!(12000)),
        metric::CALORIES => Some(dec!(3000)),
        metric::WATER_ML => Some(dec!(2500)),
        metric::SLEEP_HOURS => Some(dec!(10)),
        metric::ACTIVE_MINUTES => Some(dec!(90)),
        _ => None,
    }
}

/// Default daily goal for a known metric
pub fn default_goal(name: &str) -> Option<Decimal> {
    match name {
        metric::STEPS => Some(dec!(10000)),
        metric::CALORIES => Some(dec!(2500)),
        metric::WATER_ML => Some(dec!(2000)),
        metric::SLEEP_HOURS => Some(dec!(8)),
        metric::ACTIVE_MINUTES => Some(dec!(60)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record_constructor() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let record = HealthRecord::single(date, metric::STEPS, dec!(9000));
        assert_eq!(record.metrics.len(), 1);
        assert_eq!(record.metrics[metric::STEPS], dec!(9000));
        assert!(record.source.is_none());
    }

    #[test]
    fn test_bucket_total_missing_metric_is_zero() {
        let bucket = DayBucket {
            day_index: 0,
            date: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
            label: "Sun".to_string(),
            totals: BTreeMap::new(),
            normalized_percent: 0,
        };
        assert_eq!(bucket.total(metric::STEPS), Decimal::ZERO);
    }

    #[test]
    fn test_goal_progress_remaining() {
        let progress = GoalProgress {
            current_value: dec!(7500),
            goal_value: dec!(10000),
            percent: 75,
        };
        assert!(!progress.achieved());
        assert_eq!(progress.remaining(), dec!(2500));

        let done = GoalProgress {
            current_value: dec!(12000),
            goal_value: dec!(10000),
            percent: 100,
        };
        assert!(done.achieved());
        assert_eq!(done.remaining(), Decimal::ZERO);
    }

    #[test]
    fn test_metric_registry_defaults() {
        assert_eq!(default_ceiling(metric::STEPS), Some(dec!(12000)));
        assert_eq!(default_goal(metric::WATER_ML), Some(dec!(2000)));
        assert_eq!(metric_unit(metric::SLEEP_HOURS), "h");
        assert_eq!(default_ceiling("unknown_metric"), None);
    }
}
