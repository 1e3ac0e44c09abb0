//! Core record types supplied by the record store
//!
//! - `MealRecord`: a logged eating event with its nested mood observations
//! - `MoodObservation`: a pre- or post-meal mood measurement
//! - `FoodList`: the normalized food tokens of a meal, parsed once at the boundary
//! - `SwapRecord`: an accepted craving swap with an optional satisfaction rating
//! - `FetchOptions`: range, ordering and projection for a meal fetch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Verified numeric identifier of the user a report is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When a mood observation was taken relative to its meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeContext {
    #[serde(rename = "Pre-Meal")]
    PreMeal,
    #[serde(rename = "Post-Meal")]
    PostMeal,
}

impl TimeContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeContext::PreMeal => "Pre-Meal",
            TimeContext::PostMeal => "Post-Meal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pre-Meal" => Some(TimeContext::PreMeal),
            "Post-Meal" => Some(TimeContext::PostMeal),
            _ => None,
        }
    }
}

impl fmt::Display for TimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mood measurement attached to exactly one meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodObservation {
    pub time_context: TimeContext,
    /// Intensity on a 1..5 scale; absent when the user skipped it
    #[serde(default)]
    pub intensity: Option<i32>,
    /// Descriptive label ("happy", "tired", ...); dropped by narrow projections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_state: Option<String>,
}

impl MoodObservation {
    pub fn new(time_context: TimeContext, intensity: Option<i32>) -> Self {
        Self {
            time_context,
            intensity,
            mood_state: None,
        }
    }

    pub fn pre(intensity: i32) -> Self {
        Self::new(TimeContext::PreMeal, Some(intensity))
    }

    pub fn post(intensity: i32) -> Self {
        Self::new(TimeContext::PostMeal, Some(intensity))
    }

    /// Builder: set the mood label
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.mood_state = Some(state.into());
        self
    }
}

/// Food names of one meal
///
/// The store encodes foods as a single comma-delimited string. It is split,
/// trimmed and lowercased once, empty tokens dropped, and the ordered tokens
/// travel with the record. The raw string is kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodList {
    raw: String,
    tokens: Vec<String>,
}

impl FoodList {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tokens = raw
            .split(',')
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        Self { raw, tokens }
    }

    /// The string exactly as logged
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized tokens in logged order (duplicates within a meal retained)
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<&str> for FoodList {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for FoodList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FoodList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(raw))
    }
}

/// A logged meal with its nested mood observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id: i64,
    pub user_id: UserId,
    pub meal_type: String,
    pub foods: FoodList,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub moods: Vec<MoodObservation>,
}

impl MealRecord {
    pub fn new(
        id: i64,
        user_id: UserId,
        meal_type: impl Into<String>,
        foods: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            meal_type: meal_type.into(),
            foods: FoodList::parse(foods),
            timestamp,
            photo: None,
            notes: None,
            moods: Vec::new(),
        }
    }

    /// Builder: attach a mood observation
    pub fn mood(mut self, observation: MoodObservation) -> Self {
        self.moods.push(observation);
        self
    }

    /// Builder: attach free-text notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// First observation with the given context; later duplicates are ignored
    pub fn first_observation(&self, context: TimeContext) -> Option<&MoodObservation> {
        self.moods.iter().find(|m| m.time_context == context)
    }
}

/// A meal about to be written by a seeding path (CSV import, fixtures)
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub user_id: UserId,
    pub meal_type: String,
    pub foods: String,
    pub timestamp: DateTime<Utc>,
    pub photo: Option<String>,
    pub notes: Option<String>,
    pub moods: Vec<MoodObservation>,
}

impl NewMeal {
    pub fn new(
        user_id: UserId,
        meal_type: impl Into<String>,
        foods: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            meal_type: meal_type.into(),
            foods: foods.into(),
            timestamp,
            photo: None,
            notes: None,
            moods: Vec::new(),
        }
    }

    pub fn mood(mut self, observation: MoodObservation) -> Self {
        self.moods.push(observation);
        self
    }

    /// Materialize into a stored record under the given id
    pub fn into_record(self, id: i64) -> MealRecord {
        MealRecord {
            id,
            user_id: self.user_id,
            meal_type: self.meal_type,
            foods: FoodList::parse(self.foods),
            timestamp: self.timestamp,
            photo: self.photo,
            notes: self.notes,
            moods: self.moods,
        }
    }
}

/// A craving swap the user accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRecord {
    pub id: i64,
    pub user_id: UserId,
    pub original_item: String,
    pub suggested_swap: String,
    pub accepted: bool,
    pub craving_type: String,
    #[serde(default)]
    pub satisfaction_rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Inclusive timestamp range `[start, end]`
///
/// A range whose start is after its end is legal and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimestampRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }
}

/// Ordering of a meal fetch by timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Which mood fields a fetch populates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodProjection {
    /// timeContext, intensity and moodState
    #[default]
    Full,
    /// timeContext and intensity only
    ContextAndIntensity,
}

/// Options for `MealStore::fetch_meals`
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub range: Option<TimestampRange>,
    /// `None` keeps the store's natural (insertion) order
    pub order: Option<SortOrder>,
    pub moods: MoodProjection,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, range: Option<TimestampRange>) -> Self {
        self.range = range;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn moods(mut self, projection: MoodProjection) -> Self {
        self.moods = projection;
        self
    }
}
