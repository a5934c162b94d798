use chrono::NaiveDate;
use rust_decimal_macros::dec;
use weeklens::{export, import, models, week};

/// Integration tests that exercise the complete file-to-chart workflows

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::io::Write;
    use weeklens::locale::{LabelStyle, LocaleWeekdays};
    use weeklens::models::{metric, HealthRecord};
    use weeklens::week::{TrendDirection, WeekAggregator, WeekConfig};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn steps_aggregator() -> WeekAggregator {
        WeekAggregator::new(WeekConfig {
            primary_metric: metric::STEPS.to_string(),
            ceiling: dec!(12000),
        })
    }

    fn write_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// CSV file through aggregation to the chart-ready window
    #[test]
    fn test_csv_to_week_workflow() {
        let file = write_file(
            "date,steps,water_ml\n\
             2024-06-09,4000,1200\n\
             2024-06-12,6000,1500\n\
             2024-06-15,9000,2100\n\
             2024-06-01,99999,9999\n",
            ".csv",
        );

        let report = import::import_records(file.path()).unwrap();
        assert_eq!(report.records.len(), 4);

        let aggregator = steps_aggregator();
        let labels = LocaleWeekdays::from_tag("en");
        let buckets = aggregator.aggregate(&report.records, day(2024, 6, 15), &labels);

        // the 2024-06-01 record is outside the window
        assert_eq!(buckets[0].total(metric::STEPS), dec!(4000));
        assert_eq!(buckets[3].total(metric::STEPS), dec!(6000));
        assert_eq!(buckets[6].total(metric::STEPS), dec!(9000));
        assert_eq!(buckets[6].total(metric::WATER_ML), dec!(2100));
        assert_eq!(buckets[6].normalized_percent, 75);

        let summary = aggregator.summarize(&buckets);
        assert_eq!(summary.total, dec!(19000));
        assert_eq!(summary.active_days, 3);
        assert_eq!(summary.best_day, Some(day(2024, 6, 15)));
    }

    /// JSON records with duplicates on one day are summed, not merged
    #[test]
    fn test_json_duplicate_day_workflow() {
        let file = write_file(
            r#"[
                {"date": "2024-06-15", "metrics": {"steps": 5000}, "source": "watch"},
                {"date": "2024-06-15", "metrics": {"steps": 4000}, "source": "phone"}
            ]"#,
            ".json",
        );

        let report = import::import_records(file.path()).unwrap();
        let buckets = steps_aggregator().aggregate(
            &report.records,
            day(2024, 6, 15),
            &LocaleWeekdays::from_tag("en"),
        );

        assert_eq!(buckets[6].total(metric::STEPS), dec!(9000));
        assert_eq!(buckets[6].normalized_percent, 75);
    }

    /// Aggregate and export back out, checking the exported window parses
    #[test]
    fn test_aggregate_then_export_workflow() {
        let records = vec![
            HealthRecord::single(day(2024, 6, 14), metric::STEPS, dec!(11000)),
            HealthRecord::single(day(2024, 6, 15), metric::STEPS, dec!(3000)),
        ];
        let buckets = steps_aggregator().aggregate(
            &records,
            day(2024, 6, 15),
            &LocaleWeekdays::from_tag("en"),
        );

        let json_file = tempfile::NamedTempFile::new().unwrap();
        export::export_json(&buckets.to_vec(), json_file.path()).unwrap();
        let parsed: Vec<models::DayBucket> =
            serde_json::from_str(&std::fs::read_to_string(json_file.path()).unwrap()).unwrap();
        assert_eq!(parsed.len(), week::WINDOW_DAYS);
        assert_eq!(parsed[5].normalized_percent, 92);

        let csv_file = tempfile::NamedTempFile::new().unwrap();
        export::export_week_csv(&buckets, csv_file.path()).unwrap();
        let content = std::fs::read_to_string(csv_file.path()).unwrap();
        assert!(content.starts_with("date,label,percent,steps"));
        assert_eq!(content.lines().count(), 8);
    }

    /// Portuguese labels flow through the whole pipeline
    #[test]
    fn test_portuguese_week_labels() {
        let labels = LocaleWeekdays::from_tag("pt-BR").with_style(LabelStyle::Long);
        let buckets = steps_aggregator().aggregate(&[], day(2024, 6, 15), &labels);

        assert_eq!(buckets[6].label, "Sábado");
        assert_eq!(buckets[0].label, "Domingo");
    }

    /// Week-over-week trend computed from the same record set used for
    /// the window
    #[test]
    fn test_trend_workflow() {
        let mut records = Vec::new();
        for d in 2..=8 {
            records.push(HealthRecord::single(
                day(2024, 6, d),
                metric::STEPS,
                dec!(9000),
            ));
        }
        for d in 9..=15 {
            records.push(HealthRecord::single(
                day(2024, 6, d),
                metric::STEPS,
                dec!(4000),
            ));
        }

        let aggregator = steps_aggregator();
        assert_eq!(
            aggregator.week_over_week(&records, day(2024, 6, 15)),
            TrendDirection::Decreasing
        );
    }

    /// Relative record file names resolve against the configured data_dir
    #[test]
    fn test_record_file_resolved_against_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("records.csv"),
            "date,steps\n2024-06-15,7000\n",
        )
        .unwrap();

        let mut config = weeklens::AppConfig::default();
        config
            .set_value("data_dir", dir.path().to_str().unwrap())
            .unwrap();

        let resolved = config.resolve_record_path(std::path::Path::new("records.csv"));
        assert!(resolved.starts_with(dir.path()));

        let report = import::import_records(&resolved).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].metrics[metric::STEPS], dec!(7000));

        // absolute paths bypass data_dir
        let absolute = dir.path().join("records.csv");
        assert_eq!(config.resolve_record_path(&absolute), absolute);
    }

    /// Dirty input degrades to skips instead of failing the workflow
    #[test]
    fn test_dirty_file_degrades_gracefully() {
        let file = write_file(
            "date,steps\n\
             garbage,1000\n\
             2024-06-15,not_a_number\n\
             2024-06-15,8000\n",
            ".csv",
        );

        let report = import::import_records(file.path()).unwrap();
        assert!(report.has_skips());
        assert_eq!(report.skipped_dates, 1);
        assert_eq!(report.skipped_values, 1);

        let buckets = steps_aggregator().aggregate(
            &report.records,
            day(2024, 6, 15),
            &LocaleWeekdays::from_tag("en"),
        );
        assert_eq!(buckets[6].total(metric::STEPS), dec!(8000));
    }
}
