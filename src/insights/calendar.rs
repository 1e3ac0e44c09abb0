//! Calendar Aggregator
//!
//! Groups meals by UTC calendar date and computes each day's mean mood
//! intensity across every observation (pre and post) logged that day.
//!
//! Buckets come out in first-occurrence order of the input. The engine feeds
//! meals newest-first, so days come out newest-first too, but no sort happens
//! after grouping.

use crate::insights::day::utc_date;
use crate::insights::error::{InsightError, InsightResult};
use crate::insights::pairing::{effective_intensity, round2};
use crate::store::{MealRecord, MoodObservation, TimestampRange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Optional date filter for the calendar report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarQuery {
    range: Option<TimestampRange>,
}

impl CalendarQuery {
    /// No filter: every meal of the user
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(range: TimestampRange) -> Self {
        Self { range: Some(range) }
    }

    /// Build from raw `startDate` / `endDate` parameters
    ///
    /// The filter applies only when both bounds are present; a lone bound is
    /// ignored without being parsed. Each bound is either `YYYY-MM-DD`
    /// (midnight UTC) or an RFC 3339 timestamp.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> InsightResult<Self> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self::between(TimestampRange::new(
                parse_bound("startDate", start)?,
                parse_bound("endDate", end)?,
            ))),
            _ => Ok(Self::all()),
        }
    }

    pub fn range(&self) -> Option<TimestampRange> {
        self.range
    }
}

fn parse_bound(name: &str, value: &str) -> InsightResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            InsightError::Validation(format!(
                "{} must be an ISO date (YYYY-MM-DD) or timestamp, got '{}'",
                name, value
            ))
        })
}

/// Simplified meal entry inside a calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMeal {
    pub id: i64,
    pub meal_type: String,
    pub foods: String,
    pub timestamp: DateTime<Utc>,
    pub moods: Vec<MoodObservation>,
}

/// One calendar date with its meals and mean mood
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub meals: Vec<CalendarMeal>,
    /// Mean intensity rounded to 2 decimals; `null` when the day has none
    pub avg_mood_intensity: Option<f64>,
    /// The same mean as a fixed two-decimal string ("4.00")
    pub avg_mood_intensity_text: Option<String>,
}

/// Calendar report body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarReport {
    pub calendar_data: Vec<CalendarDay>,
}

/// Fixed two-decimal text of a day's mean and its parsed value
fn daily_mean(intensities: &[i32]) -> InsightResult<(Option<f64>, Option<String>)> {
    if intensities.is_empty() {
        return Ok((None, None));
    }

    let total: i64 = intensities.iter().map(|&v| i64::from(v)).sum();
    // Halves round away from zero, as in the trend report
    let value = round2(total as f64 / intensities.len() as f64);
    if !value.is_finite() {
        return Err(InsightError::Computation(format!(
            "daily mean of {} intensities is not finite",
            intensities.len()
        )));
    }

    Ok((Some(value), Some(format!("{:.2}", value))))
}

/// Group `meals` into per-day buckets
pub fn aggregate(meals: &[MealRecord]) -> InsightResult<Vec<CalendarDay>> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut buckets: HashMap<NaiveDate, (Vec<CalendarMeal>, Vec<i32>)> = HashMap::new();

    for meal in meals {
        let date = utc_date(&meal.timestamp);
        let (day_meals, intensities) = buckets.entry(date).or_insert_with(|| {
            order.push(date);
            (Vec::new(), Vec::new())
        });

        day_meals.push(CalendarMeal {
            id: meal.id,
            meal_type: meal.meal_type.clone(),
            foods: meal.foods.raw().to_string(),
            timestamp: meal.timestamp,
            moods: meal.moods.clone(),
        });
        intensities.extend(meal.moods.iter().filter_map(effective_intensity));
    }

    order
        .into_iter()
        .filter_map(|date| buckets.remove(&date).map(|bucket| (date, bucket)))
        .map(|(date, (meals, intensities))| {
            let (avg_mood_intensity, avg_mood_intensity_text) = daily_mean(&intensities)?;
            Ok(CalendarDay {
                date,
                meals,
                avg_mood_intensity,
                avg_mood_intensity_text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{TimeContext, UserId};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_mean_of_day_intensities() {
        let meals = vec![
            MealRecord::new(1, UserId(1), "Lunch", "rice", at(3, 12))
                .mood(MoodObservation::pre(3))
                .mood(MoodObservation::post(5)),
        ];

        let days = aggregate(&meals).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].avg_mood_intensity, Some(4.0));
        assert_eq!(days[0].avg_mood_intensity_text.as_deref(), Some("4.00"));
    }

    #[test]
    fn test_day_without_intensities_is_null() {
        let meals = vec![
            MealRecord::new(1, UserId(1), "Snack", "apple", at(3, 15))
                .mood(MoodObservation::new(TimeContext::PreMeal, None)),
            MealRecord::new(2, UserId(1), "Snack", "pear", at(3, 16)),
        ];

        let days = aggregate(&meals).unwrap();
        assert_eq!(days[0].avg_mood_intensity, None);
        assert_eq!(days[0].avg_mood_intensity_text, None);
        assert_eq!(days[0].meals.len(), 2);

        let json = serde_json::to_value(&days[0]).unwrap();
        assert!(json["avgMoodIntensity"].is_null());
    }

    #[test]
    fn test_mean_spans_all_meals_of_the_day() {
        let meals = vec![
            MealRecord::new(1, UserId(1), "Breakfast", "oats", at(4, 8))
                .mood(MoodObservation::pre(2))
                .mood(MoodObservation::post(3)),
            MealRecord::new(2, UserId(1), "Dinner", "soup", at(4, 19))
                .mood(MoodObservation::pre(4)),
        ];

        let days = aggregate(&meals).unwrap();
        assert_eq!(days[0].avg_mood_intensity, Some(3.0));

        let uneven = vec![MealRecord::new(3, UserId(1), "Lunch", "tea", at(5, 12))
            .mood(MoodObservation::pre(1))
            .mood(MoodObservation::post(2))
            .mood(MoodObservation::post(2))];
        let days = aggregate(&uneven).unwrap();
        assert_eq!(days[0].avg_mood_intensity_text.as_deref(), Some("1.67"));
        assert_eq!(days[0].avg_mood_intensity, Some(1.67));
    }

    #[test]
    fn test_mean_half_rounds_up() {
        // Eight intensities summing to 9: mean 1.125
        let mut meal = MealRecord::new(1, UserId(1), "Lunch", "rice", at(6, 12));
        for _ in 0..7 {
            meal = meal.mood(MoodObservation::pre(1));
        }
        meal = meal.mood(MoodObservation::post(2));

        let days = aggregate(&[meal]).unwrap();
        assert_eq!(days[0].avg_mood_intensity_text.as_deref(), Some("1.13"));
        assert_eq!(days[0].avg_mood_intensity, Some(1.13));
    }

    #[test]
    fn test_mean_quarter_rounds_up() {
        // 2, 2, 2, 3, 3, 3, 3, 3 averages to 2.625
        let meals = vec![
            MealRecord::new(1, UserId(1), "Breakfast", "eggs", at(7, 8))
                .mood(MoodObservation::pre(2))
                .mood(MoodObservation::post(2)),
            MealRecord::new(2, UserId(1), "Lunch", "soup", at(7, 12))
                .mood(MoodObservation::pre(2))
                .mood(MoodObservation::post(3)),
            MealRecord::new(3, UserId(1), "Snack", "nuts", at(7, 15))
                .mood(MoodObservation::pre(3))
                .mood(MoodObservation::post(3)),
            MealRecord::new(4, UserId(1), "Dinner", "fish", at(7, 19))
                .mood(MoodObservation::pre(3))
                .mood(MoodObservation::post(3)),
        ];

        let days = aggregate(&meals).unwrap();
        assert_eq!(days[0].avg_mood_intensity_text.as_deref(), Some("2.63"));
        assert_eq!(days[0].avg_mood_intensity, Some(2.63));
    }

    #[test]
    fn test_buckets_follow_first_occurrence() {
        // Newest-first input, with a later meal of day 5 after day 4
        let meals = vec![
            MealRecord::new(1, UserId(1), "Dinner", "a", at(5, 19)),
            MealRecord::new(2, UserId(1), "Dinner", "b", at(4, 19)),
            MealRecord::new(3, UserId(1), "Lunch", "c", at(5, 12)),
            MealRecord::new(4, UserId(1), "Lunch", "d", at(6, 12)),
        ];

        let days = aggregate(&meals).unwrap();
        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-07-05", "2024-07-04", "2024-07-06"]);
        assert_eq!(days[0].meals.len(), 2);
    }

    #[test]
    fn test_grouping_uses_utc_date() {
        let late = Utc.with_ymd_and_hms(2024, 7, 8, 23, 30, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 7, 9, 0, 30, 0).unwrap();
        let meals = vec![
            MealRecord::new(1, UserId(1), "Snack", "x", early),
            MealRecord::new(2, UserId(1), "Snack", "y", late),
        ];

        assert_eq!(aggregate(&meals).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_history() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_query_needs_both_bounds() {
        assert_eq!(CalendarQuery::parse(Some("2024-07-01"), None).unwrap(), CalendarQuery::all());
        assert_eq!(CalendarQuery::parse(None, Some("garbage")).unwrap(), CalendarQuery::all());
        assert_eq!(CalendarQuery::parse(Some(""), Some("2024-07-01")).unwrap(), CalendarQuery::all());

        let query = CalendarQuery::parse(Some("2024-07-01"), Some("2024-07-31T23:59:59Z")).unwrap();
        let range = query.range().unwrap();
        assert_eq!(range.start, at(1, 0));
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_query_rejects_malformed_bound() {
        let err = CalendarQuery::parse(Some("2024-07-01"), Some("July 31")).unwrap_err();
        assert!(matches!(err, InsightError::Validation(_)));
    }

    #[test]
    fn test_report_wire_shape() {
        let meals = vec![MealRecord::new(9, UserId(1), "Lunch", "Rice, Beans", at(3, 12))
            .mood(MoodObservation::pre(3).state("tired"))];
        let report = CalendarReport {
            calendar_data: aggregate(&meals).unwrap(),
        };

        let json = serde_json::to_value(&report).unwrap();
        let day = &json["calendarData"][0];
        assert_eq!(day["date"], "2024-07-03");
        assert_eq!(day["avgMoodIntensity"], 3.0);
        assert_eq!(day["avgMoodIntensityText"], "3.00");
        assert_eq!(day["meals"][0]["mealType"], "Lunch");
        assert_eq!(day["meals"][0]["foods"], "Rice, Beans");
        assert_eq!(day["meals"][0]["moods"][0]["moodState"], "tired");
    }
}
