use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;

use weeklens::{
    config::AppConfig,
    display,
    error::WeekLensError,
    goal::GoalEvaluator,
    import,
    locale::LocaleWeekdays,
    logging::{self, LogConfig, LogFormat, LogLevel},
    week::{WeekAggregator, WeekConfig},
};

/// weeklens - Weekly Health Metric Aggregation CLI
///
/// Buckets dated health records (steps, water, sleep, ...) into the trailing
/// 7 calendar days and reports chart-ready percentages and goal progress.
#[derive(Parser)]
#[command(name = "weeklens")]
#[command(version = "0.1.0")]
#[command(about = "Weekly health metric aggregation", long_about = None)]
struct Cli {
    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a record file into the trailing 7-day window
    Week {
        /// Record file (CSV or JSON)
        #[arg(short = 'f', long)]
        file: PathBuf,

        /// Metric driving the bar percentages
        #[arg(short, long, default_value = "steps")]
        metric: String,

        /// Value that fills a bar (defaults to the configured ceiling)
        #[arg(short, long)]
        ceiling: Option<Decimal>,

        /// Anchor date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        today: Option<String>,

        /// Locale tag for weekday labels (e.g. en, pt-BR)
        #[arg(short, long)]
        locale: Option<String>,

        /// Export the window to this file instead of printing a table
        /// (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show progress toward a daily goal
    Goal {
        /// Metric name (resolves the configured goal)
        #[arg(short, long, default_value = "steps")]
        metric: String,

        /// Current value
        #[arg(short, long)]
        current: Decimal,

        /// Goal value (defaults to the configured goal for the metric)
        #[arg(short, long)]
        goal: Option<Decimal>,
    },

    /// Inspect or change configuration
    Config {
        /// List all configuration entries
        #[arg(short, long)]
        list: bool,

        /// Set a value (key=value, e.g. goal.steps=8000)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a value by key
        #[arg(short, long)]
        get: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        format: cli.log_format,
        ..LogConfig::default()
    };
    logging::init_logging(&log_config)?;

    match cli.command {
        Commands::Week {
            file,
            metric,
            ceiling,
            today,
            locale,
            output,
        } => run_week(file, metric, ceiling, today, locale, output),
        Commands::Goal {
            metric,
            current,
            goal,
        } => run_goal(metric, current, goal),
        Commands::Config { list, set, get } => run_config(list, set, get),
    }
}

fn run_week(
    file: PathBuf,
    metric: String,
    ceiling: Option<Decimal>,
    today: Option<String>,
    locale: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let app_config = AppConfig::load_or_default();

    let ceiling = match ceiling.or_else(|| app_config.ceiling_for(&metric)) {
        Some(value) => value,
        None => fail(WeekLensError::Configuration(format!(
            "no ceiling known for metric '{}', pass --ceiling",
            metric
        ))),
    };

    let today = match today {
        Some(raw) => match import::parse_day(&raw) {
            Some(date) => date,
            None => fail(WeekLensError::Validation(format!(
                "unparseable anchor date: {}",
                raw
            ))),
        },
        None => Local::now().date_naive(),
    };

    let file = app_config.resolve_record_path(&file);
    let report = match import::import_records(&file) {
        Ok(report) => report,
        Err(e) => fail(e.into()),
    };
    if report.has_skips() {
        eprintln!(
            "{}",
            format!(
                "Skipped {} row(s) with bad dates and {} bad value(s)",
                report.skipped_dates, report.skipped_values
            )
            .dimmed()
        );
    }

    let labels =
        LocaleWeekdays::from_tag(locale.as_deref().unwrap_or(&app_config.settings.locale));
    let aggregator = WeekAggregator::new(WeekConfig {
        primary_metric: metric.clone(),
        ceiling,
    });
    let buckets = aggregator.aggregate(&report.records, today, &labels);

    if let Some(path) = output {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let result = match extension.as_str() {
            "csv" => weeklens::export::export_week_csv(&buckets, &path),
            "json" => weeklens::export::export_json(&buckets.to_vec(), &path),
            other => fail(WeekLensError::Validation(format!(
                "unsupported output format: {}",
                other
            ))),
        };
        if let Err(e) = result {
            fail(e.into());
        }
        println!("{}", format!("Week written to {}", path.display()).green());
        return Ok(());
    }

    println!("{}", display::week_table(&buckets, &metric));

    let summary = aggregator.summarize(&buckets);
    let trend = aggregator.week_over_week(&report.records, today);
    println!("{}", display::summary_lines(&summary, &trend));

    let evaluator = GoalEvaluator::with_overrides(app_config.goals.clone());
    let today_total = buckets[buckets.len() - 1].total(&metric);
    if let Some(progress) = evaluator.progress(&metric, today_total) {
        println!("Today: {}", display::goal_line(&metric, &progress));
    }

    Ok(())
}

fn run_goal(metric: String, current: Decimal, goal: Option<Decimal>) -> Result<()> {
    let app_config = AppConfig::load_or_default();
    let evaluator = GoalEvaluator::with_overrides(app_config.goals.clone());

    let progress = match goal {
        Some(goal) => weeklens::normalize_goal(current, goal),
        None => match evaluator.progress(&metric, current) {
            Some(progress) => progress,
            None => fail(WeekLensError::Configuration(format!(
                "no goal known for metric '{}', pass --goal",
                metric
            ))),
        },
    };

    println!("{}", display::goal_line(&metric, &progress));
    Ok(())
}

fn run_config(list: bool, set: Option<String>, get: Option<String>) -> Result<()> {
    let mut app_config = AppConfig::load_or_default();

    if list {
        for (key, value) in app_config.list_values() {
            println!("{} = {}", key.bold(), value);
        }
    } else if let Some(assignment) = set {
        let Some((key, value)) = assignment.split_once('=') else {
            fail(WeekLensError::Validation(format!(
                "expected key=value, got: {}",
                assignment
            )));
        };
        app_config.set_value(key.trim(), value.trim())?;
        app_config.save()?;
        println!("{}", format!("Set {} = {}", key.trim(), value.trim()).green());
    } else if let Some(key) = get {
        match app_config.get_value(&key) {
            Some(value) => println!("{}", value),
            None => fail(WeekLensError::Configuration(format!(
                "unknown configuration key: {}",
                key
            ))),
        }
    } else {
        println!("Use --list, --get <key> or --set <key=value>");
    }

    Ok(())
}

/// Log an error at its severity, print the user-facing message and exit
fn fail(error: WeekLensError) -> ! {
    match error.severity().to_tracing_level() {
        tracing::Level::WARN => tracing::warn!(%error, "command failed"),
        _ => tracing::error!(%error, "command failed"),
    }
    eprintln!("{}", error.user_message().red());
    std::process::exit(1);
}
