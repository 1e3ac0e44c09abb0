//! Achievement Engine
//!
//! Gamified metrics over the full meal history, which must arrive in
//! ascending timestamp order:
//!
//! - **Streak**: longest run of consecutive local calendar days with a meal
//! - **Balanced days**: UTC days with enough distinct foods and a meal whose
//!   mood did not decline
//! - **New foods**: every distinct food in order of first appearance

use crate::insights::day::{utc_date, LocalDay};
use crate::store::{MealRecord, TimeContext};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Message returned in place of metrics for an empty history
pub const NO_MEALS_MESSAGE: &str = "No meals logged yet";

/// Computed achievement metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
    pub max_streak: u32,
    pub balanced_day_count: usize,
    pub new_foods_tried: Vec<String>,
}

/// Serializes as an empty object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NoAchievements {}

/// Achievement report body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AchievementSummary {
    /// `{"message": "...", "achievements": {}}`
    Empty {
        message: String,
        achievements: NoAchievements,
    },
    /// `{"achievements": {...}}`
    Earned { achievements: Achievements },
}

impl AchievementSummary {
    pub fn empty() -> Self {
        AchievementSummary::Empty {
            message: NO_MEALS_MESSAGE.to_string(),
            achievements: NoAchievements {},
        }
    }

    pub fn achievements(&self) -> Option<&Achievements> {
        match self {
            AchievementSummary::Earned { achievements } => Some(achievements),
            AchievementSummary::Empty { .. } => None,
        }
    }
}

/// Longest run of consecutive days
///
/// Consecutive meals exactly one local day apart extend the run; meals on the
/// same day leave it unchanged; any other gap (including going backwards)
/// restarts it at 1.
pub fn max_streak(meals: &[MealRecord], day: LocalDay) -> u32 {
    if meals.is_empty() {
        return 0;
    }

    let mut streak = 1u32;
    let mut max = 1u32;

    for pair in meals.windows(2) {
        let prev = day.day_of(&pair[0].timestamp);
        let curr = day.day_of(&pair[1].timestamp);

        match curr.signed_duration_since(prev).num_days() {
            1 => {
                streak += 1;
                max = max.max(streak);
            }
            0 => {}
            _ => streak = 1,
        }
    }

    max
}

#[derive(Default)]
struct DayBalance<'a> {
    foods: HashSet<&'a str>,
    mood_good: bool,
}

/// Whether the first post-meal intensity is at least the first pre-meal one
///
/// Both must be present; 0 is a present value here.
fn mood_held(meal: &MealRecord) -> bool {
    let pre = meal
        .first_observation(TimeContext::PreMeal)
        .and_then(|m| m.intensity);
    let post = meal
        .first_observation(TimeContext::PostMeal)
        .and_then(|m| m.intensity);

    matches!((pre, post), (Some(pre), Some(post)) if post >= pre)
}

/// Number of UTC days with `min_foods` distinct foods and a non-declining meal
pub fn balanced_day_count(meals: &[MealRecord], min_foods: usize) -> usize {
    let mut days: HashMap<NaiveDate, DayBalance<'_>> = HashMap::new();

    for meal in meals {
        let balance = days.entry(utc_date(&meal.timestamp)).or_default();
        balance.foods.extend(meal.foods.iter());
        if !balance.mood_good && mood_held(meal) {
            balance.mood_good = true;
        }
    }

    days.values()
        .filter(|d| d.mood_good && d.foods.len() >= min_foods)
        .count()
}

/// Distinct foods in order of first appearance across the whole history
pub fn new_foods_tried(meals: &[MealRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut discovered = Vec::new();

    for food in meals.iter().flat_map(|m| m.foods.iter()) {
        if seen.insert(food) {
            discovered.push(food.to_string());
        }
    }

    discovered
}

/// Achievement summary; an empty history short-circuits to a message
pub fn summarize(meals: &[MealRecord], streak_day: LocalDay, min_foods: usize) -> AchievementSummary {
    if meals.is_empty() {
        return AchievementSummary::empty();
    }

    AchievementSummary::Earned {
        achievements: Achievements {
            max_streak: max_streak(meals, streak_day),
            balanced_day_count: balanced_day_count(meals, min_foods),
            new_foods_tried: new_foods_tried(meals),
        },
    }
}
