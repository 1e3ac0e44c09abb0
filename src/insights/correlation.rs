//! Correlation Analyzer
//!
//! Tallies, per normalized food token, how often eating it went with a mood
//! improvement, decline or no change, then ranks the foods seen often enough
//! by improvement count.

use crate::insights::pairing::{MoodOutcome, MoodPair};
use crate::insights::trend::{weekly_trend, WeeklyTrend};
use crate::store::MealRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Mood outcome counts for one food
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodMoodStats {
    pub food: String,
    pub count: u32,
    pub mood_improvement: u32,
    pub mood_decline: u32,
    pub mood_stable: u32,
}

impl FoodMoodStats {
    fn new(food: &str) -> Self {
        Self {
            food: food.to_string(),
            count: 0,
            mood_improvement: 0,
            mood_decline: 0,
            mood_stable: 0,
        }
    }

    fn record(&mut self, outcome: MoodOutcome) {
        self.count += 1;
        match outcome {
            MoodOutcome::Improved => self.mood_improvement += 1,
            MoodOutcome::Declined => self.mood_decline += 1,
            MoodOutcome::Stable => self.mood_stable += 1,
        }
    }
}

/// Ranking and window parameters
#[derive(Debug, Clone, Copy)]
pub struct CorrelationSettings {
    /// Foods seen fewer times are not ranked
    pub min_occurrences: u32,
    /// Length of the ranked list
    pub limit: usize,
    /// Lookback of the trend sub-report
    pub trend_window: Duration,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            limit: 10,
            trend_window: Duration::days(7),
        }
    }
}

/// Pattern report body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub top_mood_boosting_foods: Vec<FoodMoodStats>,
    pub weekly_trend: WeeklyTrend,
    pub total_meals_logged: usize,
}

/// Per-food outcome counts in first-seen order
///
/// Meals without a valid pre/post pair are skipped. A food repeated within
/// one meal is counted once per occurrence.
pub fn tally(meals: &[MealRecord]) -> Vec<FoodMoodStats> {
    let mut stats: Vec<FoodMoodStats> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meal in meals {
        let Some(pair) = MoodPair::from_meal(meal) else {
            continue;
        };
        let outcome = pair.outcome();

        for food in meal.foods.iter() {
            let slot = match index.get(food) {
                Some(&slot) => slot,
                None => {
                    stats.push(FoodMoodStats::new(food));
                    index.insert(food.to_string(), stats.len() - 1);
                    stats.len() - 1
                }
            };
            stats[slot].record(outcome);
        }
    }

    stats
}

/// Drop rare foods, order by improvements (ties keep first-seen order), truncate
pub fn rank(mut stats: Vec<FoodMoodStats>, min_occurrences: u32, limit: usize) -> Vec<FoodMoodStats> {
    stats.retain(|s| s.count >= min_occurrences);
    // sort_by is stable
    stats.sort_by(|a, b| b.mood_improvement.cmp(&a.mood_improvement));
    stats.truncate(limit);
    stats
}

/// Full pattern report over a user's history
pub fn analyze(
    meals: &[MealRecord],
    now: DateTime<Utc>,
    settings: &CorrelationSettings,
) -> PatternReport {
    let top = rank(tally(meals), settings.min_occurrences, settings.limit);

    PatternReport {
        top_mood_boosting_foods: top,
        weekly_trend: weekly_trend(meals, now, settings.trend_window),
        total_meals_logged: meals.len(),
    }
}
