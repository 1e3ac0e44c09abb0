//! CSV Import
//!
//! Seeds a record store from a meal log exported as CSV. Expected header:
//!
//! ```text
//! user_id,meal_type,foods,timestamp,pre_intensity,post_intensity,pre_mood,post_mood,notes
//! ```
//!
//! Only `user_id`, `meal_type`, `foods` and `timestamp` are required; the
//! remaining columns may be empty or absent. Rows that fail to parse are
//! counted and reported, the rest are kept.

use super::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::path::Path;

/// Meal log importer
pub struct MealCsvImporter {
    /// Fallback user for rows with an empty user_id column
    default_user: Option<UserId>,
}

/// Result of a CSV import operation
#[derive(Debug)]
pub struct CsvImportResult {
    pub meals: Vec<NewMeal>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct MealCsvRow {
    #[serde(default)]
    user_id: Option<i64>,
    meal_type: String,
    foods: String,
    timestamp: String,
    #[serde(default)]
    pre_intensity: Option<i32>,
    #[serde(default)]
    post_intensity: Option<i32>,
    #[serde(default)]
    pre_mood: Option<String>,
    #[serde(default)]
    post_mood: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl Default for MealCsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MealCsvImporter {
    pub fn new() -> Self {
        Self { default_user: None }
    }

    /// Use `user` for rows that leave user_id empty
    pub fn with_default_user(mut self, user: UserId) -> Self {
        self.default_user = Some(user);
        self
    }

    /// Parse a timestamp in RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (noon UTC)
    fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }

        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt.and_utc());
            }
        }

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .map(|dt| dt.and_utc())
    }

    fn row_to_meal(&self, row: MealCsvRow) -> Result<NewMeal, String> {
        let user = row
            .user_id
            .map(UserId)
            .or(self.default_user)
            .ok_or_else(|| "missing user_id".to_string())?;

        let timestamp = Self::parse_timestamp(row.timestamp.trim())
            .ok_or_else(|| format!("could not parse timestamp '{}'", row.timestamp))?;

        let mut meal = NewMeal::new(user, row.meal_type.trim(), row.foods, timestamp);
        meal.notes = row.notes.filter(|n| !n.trim().is_empty());

        let observations = [
            (TimeContext::PreMeal, row.pre_intensity, row.pre_mood),
            (TimeContext::PostMeal, row.post_intensity, row.post_mood),
        ];
        for (context, intensity, state) in observations {
            let state = state.filter(|s| !s.trim().is_empty());
            if intensity.is_none() && state.is_none() {
                continue;
            }
            meal.moods.push(MoodObservation {
                time_context: context,
                intensity,
                mood_state: state,
            });
        }

        Ok(meal)
    }

    /// Import meals from any reader producing CSV
    pub fn import_reader<R: std::io::Read>(&self, reader: R) -> CsvImportResult {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut meals = Vec::new();
        let mut rows_processed = 0;
        let mut rows_failed = 0;
        let mut errors = Vec::new();

        for (line_num, result) in reader.deserialize::<MealCsvRow>().enumerate() {
            // Header occupies line 1
            let actual_line = line_num + 2;

            let parsed = result
                .map_err(|e| e.to_string())
                .and_then(|row| self.row_to_meal(row));

            match parsed {
                Ok(meal) => {
                    meals.push(meal);
                    rows_processed += 1;
                }
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                }
            }
        }

        tracing::debug!(rows_processed, rows_failed, "CSV meal import parsed");

        CsvImportResult {
            meals,
            rows_processed,
            rows_failed,
            errors,
        }
    }

    /// Import meals from a CSV file
    pub fn import(&self, path: &Path) -> StoreResult<CsvImportResult> {
        let file = std::fs::File::open(path)?;
        Ok(self.import_reader(file))
    }
}
