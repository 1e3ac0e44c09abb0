//! # MoodMeal
//!
//! Mood and meal insights - turns a user's meal log and the mood readings
//! taken before and after each meal into reports.
//!
//! ## Features
//!
//! - **Mood calendar**: Meals grouped by day with mean mood intensity
//! - **Food-mood correlations**: Foods most often followed by a better mood
//! - **Weekly trend**: Mean pre/post-meal mood over the last week
//! - **Achievements**: Logging streaks, balanced days, new foods tried
//! - **Swap history**: Accepted craving swaps filtered by satisfaction
//!
//! ## Modules
//!
//! - [`store`]: Record types and store adapters (SQLite, in-memory)
//! - [`insights`]: Report engine and its pure analysis routines
//! - [`swaps`]: Craving swap history lookups
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moodmeal::insights::{InsightsConfig, InsightsEngine};
//! use moodmeal::store::{MoodObservation, NewMeal, SqliteStore, UserId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open("moodmeal.db")?);
//!
//!     store
//!         .insert_meal(
//!             NewMeal::new(UserId(1), "Lunch", "rice, beans, avocado", chrono::Utc::now())
//!                 .mood(MoodObservation::pre(2))
//!                 .mood(MoodObservation::post(4)),
//!         )
//!         .await?;
//!
//!     let engine = InsightsEngine::with_system_clock(store, InsightsConfig::default());
//!     let report = engine.patterns(UserId(1)).await?;
//!
//!     println!("Mood improvement this week: {}", report.weekly_trend.mood_improvement);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod insights;
pub mod store;
pub mod swaps;

// Re-export top-level types for convenience
pub use store::{
    FetchOptions, FoodList, MealRecord, MealStore, MoodObservation, NewMeal, SqliteStore,
    StoreError, StoreResult, SwapRecord, SwapStore, TimeContext, TimestampRange, UserId,
};

pub use insights::{
    AchievementSummary, CalendarQuery, CalendarReport, InsightError, InsightsConfig,
    InsightsEngine, PatternReport, WeeklyTrend,
};

pub use swaps::{SwapHistory, SwapHistoryService};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig};
