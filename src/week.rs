use crate::locale::WeekdayLabels;
use crate::models::{DayBucket, HealthRecord};
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of day slots in the aggregation window
pub const WINDOW_DAYS: usize = 7;

/// Weekly aggregation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekConfig {
    /// Metric driving each bucket's normalized percentage
    pub primary_metric: String,

    /// Value that maps to a full bar. Non-positive ceilings yield 0% for
    /// every day rather than erroring.
    pub ceiling: Decimal,
}

impl WeekConfig {
    /// Configuration for a known metric using its registry ceiling
    pub fn for_metric(name: &str) -> Option<Self> {
        crate::models::default_ceiling(name).map(|ceiling| WeekConfig {
            primary_metric: name.to_string(),
            ceiling,
        })
    }
}

impl Default for WeekConfig {
    fn default() -> Self {
        WeekConfig {
            primary_metric: crate::models::metric::STEPS.to_string(),
            ceiling: Decimal::from(12000),
        }
    }
}

/// Summary figures for one aggregated window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    /// Metric the summary was computed for
    pub primary_metric: String,

    /// Sum of the primary metric across all 7 days
    pub total: Decimal,

    /// Total divided by 7
    pub daily_average: Decimal,

    /// Days with at least one contributing record
    pub active_days: usize,

    /// Date with the highest primary total, None when the week is empty
    pub best_day: Option<NaiveDate>,
}

/// Direction of change between two aggregation windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Stable,
    Decreasing,
}

/// Trailing-7-day aggregation engine
pub struct WeekAggregator {
    config: WeekConfig,
}

impl WeekAggregator {
    pub fn new(config: WeekConfig) -> Self {
        WeekAggregator { config }
    }

    pub fn config(&self) -> &WeekConfig {
        &self.config
    }

    /// Bucket records into the trailing 7 calendar days ending at `today`.
    ///
    /// Always returns exactly 7 buckets in chronological order, day 6 being
    /// `today`. Records outside the window are silently dropped; days with
    /// no records keep empty totals and 0%. Pure: never mutates `records`,
    /// identical inputs yield identical output.
    pub fn aggregate(
        &self,
        records: &[HealthRecord],
        today: NaiveDate,
        labels: &dyn WeekdayLabels,
    ) -> [DayBucket; WINDOW_DAYS] {
        let start = today
            .checked_sub_days(chrono::Days::new(WINDOW_DAYS as u64 - 1))
            .unwrap_or(today);

        let mut buckets: [DayBucket; WINDOW_DAYS] = std::array::from_fn(|i| {
            let date = start
                .checked_add_days(chrono::Days::new(i as u64))
                .unwrap_or(start);
            DayBucket {
                day_index: i,
                date,
                label: labels.label(date),
                totals: BTreeMap::new(),
                normalized_percent: 0,
            }
        });

        for record in records {
            let offset = (record.date - start).num_days();
            if !(0..WINDOW_DAYS as i64).contains(&offset) {
                continue;
            }
            let totals = &mut buckets[offset as usize].totals;
            for (name, value) in &record.metrics {
                totals
                    .entry(name.clone())
                    .and_modify(|total| *total += *value)
                    .or_insert(*value);
            }
        }

        for bucket in &mut buckets {
            let total = bucket.total(&self.config.primary_metric);
            bucket.normalized_percent = percent_of(total, self.config.ceiling);
        }

        buckets
    }

    /// Summarize the primary metric over an aggregated window
    pub fn summarize(&self, buckets: &[DayBucket; WINDOW_DAYS]) -> WeekSummary {
        let total: Decimal = buckets
            .iter()
            .map(|b| b.total(&self.config.primary_metric))
            .sum();

        let active_days = buckets.iter().filter(|b| !b.totals.is_empty()).count();

        let best_day = buckets
            .iter()
            .map(|b| (b.date, b.total(&self.config.primary_metric)))
            .filter(|(_, v)| *v > Decimal::ZERO)
            .max_by_key(|(_, v)| *v)
            .map(|(date, _)| date);

        WeekSummary {
            primary_metric: self.config.primary_metric.clone(),
            total,
            daily_average: total / Decimal::from(WINDOW_DAYS as u64),
            active_days,
            best_day,
        }
    }

    /// Compare this window's primary total against the preceding 7 days
    pub fn week_over_week(&self, records: &[HealthRecord], today: NaiveDate) -> TrendDirection {
        let current = self.window_total(records, today);
        let previous_end = today
            .checked_sub_days(chrono::Days::new(WINDOW_DAYS as u64))
            .unwrap_or(today);
        let previous = self.window_total(records, previous_end);
        determine_trend(previous, current)
    }

    fn window_total(&self, records: &[HealthRecord], end: NaiveDate) -> Decimal {
        let start = end
            .checked_sub_days(chrono::Days::new(WINDOW_DAYS as u64 - 1))
            .unwrap_or(end);
        records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .filter_map(|r| r.metrics.get(&self.config.primary_metric))
            .copied()
            .sum()
    }
}

impl Default for WeekAggregator {
    fn default() -> Self {
        Self::new(WeekConfig::default())
    }
}

/// Clamped percentage of `value` against `ceiling`, rounded half away from
/// zero. Non-positive ceilings map to 0.
pub fn percent_of(value: Decimal, ceiling: Decimal) -> u8 {
    if ceiling <= Decimal::ZERO {
        return 0;
    }
    let percent = (value / ceiling * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    percent
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

/// Trend direction between two values with a 5% stability band
fn determine_trend(start: Decimal, end: Decimal) -> TrendDirection {
    let change_threshold = Decimal::new(5, 2);
    let percent_change = (end - start) / start.abs().max(Decimal::ONE);

    if percent_change > change_threshold {
        TrendDirection::Increasing
    } else if percent_change < -change_threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}
