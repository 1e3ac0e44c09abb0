//! Insights Engine
//!
//! Entry point for the three reports. Each call does one fetch from the
//! injected record store and hands the snapshot to a pure analysis routine.
//! Nothing is cached between calls.

use crate::insights::achievements::{self, AchievementSummary};
use crate::insights::calendar::{self, CalendarQuery, CalendarReport};
use crate::insights::clock::{Clock, SystemClock};
use crate::insights::correlation::{self, PatternReport};
use crate::insights::day::LocalDay;
use crate::insights::error::{InsightError, InsightResult};
use crate::insights::InsightsConfig;
use crate::store::{FetchOptions, MealStore, MoodProjection, SortOrder, UserId};
use std::sync::Arc;
use std::time::Instant;

/// Computes reports for one user at a time
pub struct InsightsEngine {
    store: Arc<dyn MealStore>,
    clock: Arc<dyn Clock>,
    config: InsightsConfig,
}

impl InsightsEngine {
    /// Create an engine over `store`, reading "now" from `clock`
    pub fn new(store: Arc<dyn MealStore>, clock: Arc<dyn Clock>, config: InsightsConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Create an engine that uses wall-clock time
    pub fn with_system_clock(store: Arc<dyn MealStore>, config: InsightsConfig) -> Self {
        Self::new(store, Arc::new(SystemClock), config)
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    /// Meals grouped by UTC date with daily mean intensity, newest day first
    pub async fn calendar(&self, user: UserId, query: &CalendarQuery) -> InsightResult<CalendarReport> {
        let started = Instant::now();
        let options = FetchOptions::new()
            .range(query.range())
            .order(SortOrder::Desc)
            .moods(MoodProjection::Full);

        let meals = self.store.fetch_meals(user, &options).await?;
        let calendar_data = calendar::aggregate(&meals)?;

        tracing::debug!(
            user_id = %user,
            meals = meals.len(),
            days = calendar_data.len(),
            filtered = query.range().is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Calendar report computed"
        );

        Ok(CalendarReport { calendar_data })
    }

    /// Top mood-boosting foods, recent trend and total meal count
    pub async fn patterns(&self, user: UserId) -> InsightResult<PatternReport> {
        let started = Instant::now();
        let options = FetchOptions::new().moods(MoodProjection::ContextAndIntensity);

        let meals = self.store.fetch_meals(user, &options).await?;
        let report = correlation::analyze(&meals, self.clock.now(), &self.config.correlation_settings());

        tracing::debug!(
            user_id = %user,
            meals = meals.len(),
            ranked_foods = report.top_mood_boosting_foods.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pattern report computed"
        );

        Ok(report)
    }

    /// Longest streak, balanced days and food-discovery timeline
    pub async fn achievements(&self, user: UserId) -> InsightResult<AchievementSummary> {
        let started = Instant::now();
        let streak_day = self.streak_day()?;
        let options = FetchOptions::new()
            .order(SortOrder::Asc)
            .moods(MoodProjection::Full);

        let meals = self.store.fetch_meals(user, &options).await?;
        let summary = achievements::summarize(&meals, streak_day, self.config.balanced_min_foods);

        tracing::debug!(
            user_id = %user,
            meals = meals.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Achievement summary computed"
        );

        Ok(summary)
    }

    fn streak_day(&self) -> InsightResult<LocalDay> {
        LocalDay::from_offset_minutes(self.config.streak_utc_offset_minutes).ok_or_else(|| {
            InsightError::Computation(format!(
                "streak offset of {} minutes is outside ±24h",
                self.config.streak_utc_offset_minutes
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::clock::FixedClock;
    use crate::store::{
        InMemoryStore, MealRecord, MoodObservation, StoreError, StoreResult, TimestampRange,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 10, 12, 0, 0).unwrap()
    }

    fn engine(meals: Vec<MealRecord>) -> InsightsEngine {
        InsightsEngine::new(
            Arc::new(InMemoryStore::with_meals(meals)),
            Arc::new(FixedClock(now())),
            InsightsConfig::default(),
        )
    }

    fn history() -> Vec<MealRecord> {
        // Stored out of order on purpose
        vec![
            MealRecord::new(1, UserId(1), "Lunch", "rice, beans, egg", now() - Duration::days(1))
                .mood(MoodObservation::pre(3))
                .mood(MoodObservation::post(4)),
            MealRecord::new(2, UserId(1), "Lunch", "rice", now() - Duration::days(3))
                .mood(MoodObservation::pre(2))
                .mood(MoodObservation::post(4)),
            MealRecord::new(3, UserId(1), "Dinner", "Rice, soup", now() - Duration::days(2))
                .mood(MoodObservation::pre(4))
                .mood(MoodObservation::post(4)),
            MealRecord::new(4, UserId(2), "Dinner", "steak", now()),
        ]
    }

    struct FailingStore;

    #[async_trait]
    impl MealStore for FailingStore {
        async fn fetch_meals(&self, _: UserId, _: &FetchOptions) -> StoreResult<Vec<MealRecord>> {
            Err(StoreError::Lock("connection poisoned".to_string()))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Lock("connection poisoned".to_string()))
        }
    }

    #[tokio::test]
    async fn test_calendar_newest_first() {
        let report = engine(history())
            .calendar(UserId(1), &CalendarQuery::all())
            .await
            .unwrap();

        let dates: Vec<String> = report.calendar_data.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-10-09", "2024-10-08", "2024-10-07"]);
        assert_eq!(report.calendar_data[0].avg_mood_intensity, Some(3.5));
    }

    #[tokio::test]
    async fn test_calendar_range() {
        let range = TimestampRange::new(now() - Duration::days(2), now());
        let report = engine(history())
            .calendar(UserId(1), &CalendarQuery::between(range))
            .await
            .unwrap();
        assert_eq!(report.calendar_data.len(), 2);

        let empty = TimestampRange::new(now(), now() - Duration::days(30));
        let report = engine(history())
            .calendar(UserId(1), &CalendarQuery::between(empty))
            .await
            .unwrap();
        assert!(report.calendar_data.is_empty());
    }

    #[tokio::test]
    async fn test_patterns() {
        let report = engine(history()).patterns(UserId(1)).await.unwrap();

        assert_eq!(report.total_meals_logged, 3);
        assert_eq!(report.top_mood_boosting_foods.len(), 1);
        let rice = &report.top_mood_boosting_foods[0];
        assert_eq!((rice.food.as_str(), rice.count, rice.mood_improvement, rice.mood_stable), ("rice", 3, 2, 1));

        assert_eq!(report.weekly_trend.total_meals, 3);
        assert_eq!(report.weekly_trend.avg_mood_before, 3.0);
        assert_eq!(report.weekly_trend.avg_mood_after, 4.0);
        assert_eq!(report.weekly_trend.mood_improvement, 1.0);
    }

    #[tokio::test]
    async fn test_achievements_sorted_ascending() {
        let summary = engine(history()).achievements(UserId(1)).await.unwrap();
        let achievements = summary.achievements().unwrap();

        assert_eq!(achievements.max_streak, 3);
        assert_eq!(achievements.balanced_day_count, 1);
        assert_eq!(achievements.new_foods_tried, vec!["rice", "soup", "beans", "egg"]);
    }

    #[tokio::test]
    async fn test_empty_user() {
        let engine = engine(history());

        assert_eq!(
            engine.achievements(UserId(99)).await.unwrap(),
            AchievementSummary::empty()
        );
        let patterns = engine.patterns(UserId(99)).await.unwrap();
        assert_eq!(patterns.total_meals_logged, 0);
        assert_eq!(patterns.weekly_trend.mood_improvement, 0.0);
    }

    #[tokio::test]
    async fn test_repeatable_output() {
        let engine = engine(history());
        let first = serde_json::to_string(&engine.patterns(UserId(1)).await.unwrap()).unwrap();
        let second = serde_json::to_string(&engine.patterns(UserId(1)).await.unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let engine = InsightsEngine::new(
            Arc::new(FailingStore),
            Arc::new(FixedClock(now())),
            InsightsConfig::default(),
        );

        let err = engine.patterns(UserId(1)).await.unwrap_err();
        assert!(matches!(err, InsightError::Store(StoreError::Lock(_))));
    }

    #[tokio::test]
    async fn test_invalid_streak_offset() {
        let config = InsightsConfig {
            streak_utc_offset_minutes: 48 * 60,
            ..InsightsConfig::default()
        };
        let engine = InsightsEngine::new(
            Arc::new(InMemoryStore::with_meals(history())),
            Arc::new(FixedClock(now())),
            config,
        );

        let err = engine.achievements(UserId(1)).await.unwrap_err();
        assert!(matches!(err, InsightError::Computation(_)));
    }
}
