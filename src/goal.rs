use crate::models::{default_goal, GoalProgress};
use crate::week::percent_of;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Compute clamped progress toward a fixed goal.
///
/// Non-positive goals yield 0% instead of dividing by zero; negative current
/// values yield 0%; over-achievement is clamped to 100%.
pub fn normalize_goal(current_value: Decimal, goal_value: Decimal) -> GoalProgress {
    let percent = if goal_value <= Decimal::ZERO {
        0
    } else {
        percent_of(current_value, goal_value)
    };

    GoalProgress {
        current_value,
        goal_value,
        percent,
    }
}

/// Resolves per-metric goals, preferring configured overrides over the
/// built-in registry defaults
#[derive(Debug, Clone, Default)]
pub struct GoalEvaluator {
    overrides: HashMap<String, Decimal>,
}

impl GoalEvaluator {
    pub fn new() -> Self {
        GoalEvaluator::default()
    }

    pub fn with_overrides(overrides: HashMap<String, Decimal>) -> Self {
        GoalEvaluator { overrides }
    }

    /// Goal for a metric, None when neither an override nor a registry
    /// default exists
    pub fn goal_for(&self, metric: &str) -> Option<Decimal> {
        self.overrides
            .get(metric)
            .copied()
            .or_else(|| default_goal(metric))
    }

    /// Progress of `current` toward the metric's goal
    pub fn progress(&self, metric: &str, current: Decimal) -> Option<GoalProgress> {
        self.goal_for(metric)
            .map(|goal| normalize_goal(current, goal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metric;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basic_progress() {
        let progress = normalize_goal(dec!(7500), dec!(10000));
        assert_eq!(progress.percent, 75);
        assert!(!progress.achieved());
    }

    #[test]
    fn test_over_achievement_is_clamped() {
        let progress = normalize_goal(dec!(15000), dec!(10000));
        assert_eq!(progress.percent, 100);
        assert!(progress.achieved());
    }

    #[test]
    fn test_negative_current_is_clamped_to_zero() {
        let progress = normalize_goal(dec!(-5), dec!(10000));
        assert_eq!(progress.percent, 0);
    }

    #[test]
    fn test_zero_goal_is_safe() {
        let progress = normalize_goal(dec!(500), Decimal::ZERO);
        assert_eq!(progress.percent, 0);

        let negative_goal = normalize_goal(dec!(500), dec!(-100));
        assert_eq!(negative_goal.percent, 0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 1250 / 10000 = 12.5% -> 13
        assert_eq!(normalize_goal(dec!(1250), dec!(10000)).percent, 13);
    }

    #[test]
    fn test_evaluator_prefers_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(metric::STEPS.to_string(), dec!(8000));
        let evaluator = GoalEvaluator::with_overrides(overrides);

        assert_eq!(evaluator.goal_for(metric::STEPS), Some(dec!(8000)));
        // registry default still applies for other metrics
        assert_eq!(evaluator.goal_for(metric::WATER_ML), Some(dec!(2000)));
        assert_eq!(evaluator.goal_for("unknown_metric"), None);

        let progress = evaluator.progress(metric::STEPS, dec!(4000)).unwrap();
        assert_eq!(progress.percent, 50);
    }
}
