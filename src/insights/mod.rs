//! MoodMeal Insights Engine
//!
//! Read-only analysis of one user's meal and mood history.
//!
//! ## Architecture
//!
//! - **calendar**: Per-day buckets with mean mood intensity
//! - **correlation**: Food-to-mood outcome counts and top-food ranking
//! - **trend**: Mean pre/post intensity over a recent window
//! - **achievements**: Streaks, balanced days, food discovery
//! - **engine**: One store fetch per report, then a pure routine
//!
//! ## Data Flow
//!
//! 1. Caller supplies a verified `UserId`
//! 2. `InsightsEngine` fetches a snapshot from the injected `MealStore`
//! 3. The matching routine reduces it to a serializable report
//!
//! The correlation analyzer is the only routine that calls another one (the
//! trend calculator).

pub mod achievements;
pub mod calendar;
pub mod clock;
pub mod correlation;
pub mod day;
mod engine;
mod error;
pub mod pairing;
pub mod trend;

pub use achievements::{AchievementSummary, Achievements};
pub use calendar::{CalendarDay, CalendarMeal, CalendarQuery, CalendarReport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use correlation::{CorrelationSettings, FoodMoodStats, PatternReport};
pub use day::LocalDay;
pub use engine::InsightsEngine;
pub use error::{InsightError, InsightResult};
pub use trend::WeeklyTrend;

use serde::Deserialize;

/// Longest accepted trend lookback, in days
pub const MAX_TREND_WINDOW_DAYS: i64 = 3650;

/// Tunables of the analysis routines
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    /// Lookback of the weekly trend, in days
    #[serde(default = "default_trend_window_days")]
    pub trend_window_days: i64,

    /// Length of the top mood-boosting foods list
    #[serde(default = "default_top_foods_limit")]
    pub top_foods_limit: usize,

    /// Minimum times a food must be logged (with a valid pair) to be ranked
    #[serde(default = "default_min_food_occurrences")]
    pub min_food_occurrences: u32,

    /// Distinct foods a day needs to count as balanced
    #[serde(default = "default_balanced_min_foods")]
    pub balanced_min_foods: usize,

    /// Offset east of UTC, in minutes, that defines a day for streaks
    #[serde(default)]
    pub streak_utc_offset_minutes: i32,
}

fn default_trend_window_days() -> i64 {
    7
}

fn default_top_foods_limit() -> usize {
    10
}

fn default_min_food_occurrences() -> u32 {
    2
}

fn default_balanced_min_foods() -> usize {
    3
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            trend_window_days: default_trend_window_days(),
            top_foods_limit: default_top_foods_limit(),
            min_food_occurrences: default_min_food_occurrences(),
            balanced_min_foods: default_balanced_min_foods(),
            streak_utc_offset_minutes: 0,
        }
    }
}

impl InsightsConfig {
    pub fn correlation_settings(&self) -> CorrelationSettings {
        CorrelationSettings {
            min_occurrences: self.min_food_occurrences,
            limit: self.top_foods_limit,
            trend_window: chrono::Duration::days(
                self.trend_window_days.clamp(0, MAX_TREND_WINDOW_DAYS),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_report_contract() {
        let settings = InsightsConfig::default().correlation_settings();
        assert_eq!(settings.min_occurrences, 2);
        assert_eq!(settings.limit, 10);
        assert_eq!(settings.trend_window, chrono::Duration::days(7));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: InsightsConfig = toml::from_str("streak_utc_offset_minutes = -300").unwrap();
        assert_eq!(config.streak_utc_offset_minutes, -300);
        assert_eq!(config.balanced_min_foods, 3);
        assert_eq!(config.trend_window_days, 7);
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let config: InsightsConfig = toml::from_str("trend_window_days = 1000000000").unwrap();
        let settings = config.correlation_settings();
        assert_eq!(settings.trend_window, chrono::Duration::days(MAX_TREND_WINDOW_DAYS));
    }
}
