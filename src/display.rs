//! Terminal rendering of aggregated weeks and goal progress

use crate::models::{metric_unit, DayBucket, GoalProgress};
use crate::week::{TrendDirection, WeekSummary};
use colored::*;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Day")]
    label: String,

    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "Total")]
    total: String,

    #[tabled(rename = "%")]
    percent: String,

    #[tabled(rename = "Chart")]
    bar: String,
}

/// Render the 7-day window as a terminal table
pub fn week_table(buckets: &[DayBucket], primary_metric: &str) -> String {
    let unit = metric_unit(primary_metric);

    let rows: Vec<WeekRow> = buckets
        .iter()
        .map(|bucket| WeekRow {
            label: bucket.label.clone(),
            date: bucket.date.format("%Y-%m-%d").to_string(),
            total: if unit.is_empty() {
                bucket.total(primary_metric).to_string()
            } else {
                format!("{} {}", bucket.total(primary_metric), unit)
            },
            percent: format!("{}%", bucket.normalized_percent),
            bar: percent_bar(bucket.normalized_percent),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Ten-segment bar for a 0..=100 percentage
pub fn percent_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize + 5) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// One-line colored goal progress summary
pub fn goal_line(metric: &str, progress: &GoalProgress) -> String {
    let unit = metric_unit(metric);
    let amounts = if unit.is_empty() {
        format!("{} / {}", progress.current_value, progress.goal_value)
    } else {
        format!(
            "{} / {} {}",
            progress.current_value, progress.goal_value, unit
        )
    };

    let percent = format!("{}%", progress.percent);
    let percent = if progress.achieved() {
        percent.green().bold()
    } else if progress.percent >= 50 {
        percent.yellow()
    } else {
        percent.red()
    };

    format!("{}: {} ({})", metric.bold(), amounts, percent)
}

/// Multi-line colored week summary with the week-over-week trend
pub fn summary_lines(summary: &WeekSummary, trend: &TrendDirection) -> String {
    let unit = metric_unit(&summary.primary_metric);
    let suffix = if unit.is_empty() {
        String::new()
    } else {
        format!(" {}", unit)
    };

    let trend_text = match trend {
        TrendDirection::Increasing => "up vs last week".green(),
        TrendDirection::Stable => "steady vs last week".normal(),
        TrendDirection::Decreasing => "down vs last week".red(),
    };

    let mut lines = vec![
        format!(
            "Total {}: {}{} ({})",
            summary.primary_metric.bold(),
            summary.total,
            suffix,
            trend_text
        ),
        format!("Daily average: {:.1}{}", summary.daily_average, suffix),
        format!("Active days: {}/7", summary.active_days),
    ];
    if let Some(best) = summary.best_day {
        lines.push(format!("Best day: {}", best.format("%Y-%m-%d")));
    }
    lines.join("\n")
}
