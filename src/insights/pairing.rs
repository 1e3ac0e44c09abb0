//! Pre/post mood pairing
//!
//! A meal contributes to correlation and trend figures only when its first
//! pre-meal and first post-meal observations both carry a usable intensity.
//! An intensity of 0 counts as missing.

use crate::store::{MealRecord, MoodObservation, TimeContext};

/// Intensity of an observation, with 0 treated as absent
pub fn effective_intensity(observation: &MoodObservation) -> Option<i32> {
    observation.intensity.filter(|v| *v != 0)
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Direction of mood change across a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodOutcome {
    Improved,
    Declined,
    Stable,
}

/// Valid pre/post intensities of one meal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodPair {
    pub pre: i32,
    pub post: i32,
}

impl MoodPair {
    /// Pair the first pre-meal and first post-meal observation of `meal`
    pub fn from_meal(meal: &MealRecord) -> Option<Self> {
        let pre = meal.first_observation(TimeContext::PreMeal)?;
        let post = meal.first_observation(TimeContext::PostMeal)?;

        Some(Self {
            pre: effective_intensity(pre)?,
            post: effective_intensity(post)?,
        })
    }

    pub fn outcome(&self) -> MoodOutcome {
        match self.post.cmp(&self.pre) {
            std::cmp::Ordering::Greater => MoodOutcome::Improved,
            std::cmp::Ordering::Less => MoodOutcome::Declined,
            std::cmp::Ordering::Equal => MoodOutcome::Stable,
        }
    }
}
