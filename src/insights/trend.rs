//! Trend Calculator
//!
//! Mean pre- and post-meal intensity over a recent window and the delta
//! between them. Meals count toward the averages only when they have a valid
//! pre/post pair; `totalMeals` counts every meal in the window.

use crate::insights::pairing::{round2, MoodPair};
use crate::store::MealRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Mood trend over a recent window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrend {
    pub total_meals: usize,
    pub avg_mood_before: f64,
    pub avg_mood_after: f64,
    pub mood_improvement: f64,
}

impl WeeklyTrend {
    fn empty(total_meals: usize) -> Self {
        Self {
            total_meals,
            avg_mood_before: 0.0,
            avg_mood_after: 0.0,
            mood_improvement: 0.0,
        }
    }
}

/// Trend over meals with `timestamp >= now - window`
///
/// With no valid pairs the three averages are 0, never NaN.
pub fn weekly_trend(meals: &[MealRecord], now: DateTime<Utc>, window: Duration) -> WeeklyTrend {
    // A window reaching past the representable range keeps every meal
    let cutoff = now.checked_sub_signed(window);
    let recent: Vec<&MealRecord> = meals
        .iter()
        .filter(|m| cutoff.map_or(true, |c| m.timestamp >= c))
        .collect();

    let (before_sum, after_sum, count) = recent
        .iter()
        .filter_map(|meal| MoodPair::from_meal(meal))
        .fold((0i64, 0i64, 0u32), |(before, after, n), pair| {
            (before + i64::from(pair.pre), after + i64::from(pair.post), n + 1)
        });

    if count == 0 {
        return WeeklyTrend::empty(recent.len());
    }

    let avg_before = before_sum as f64 / f64::from(count);
    let avg_after = after_sum as f64 / f64::from(count);

    WeeklyTrend {
        total_meals: recent.len(),
        avg_mood_before: round2(avg_before),
        avg_mood_after: round2(avg_after),
        mood_improvement: round2(avg_after - avg_before),
    }
}
