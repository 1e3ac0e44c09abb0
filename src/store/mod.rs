//! MoodMeal Record Store
//!
//! Boundary between the insights engine and wherever meals live:
//!
//! - **types**: Record types (MealRecord, MoodObservation, FoodList, SwapRecord)
//! - **error**: Error types
//! - **memory**: In-memory adapter for fixtures and demos
//! - **sqlite**: SQLite-backed adapter
//! - **csv_import**: CSV seeding of meal logs
//!
//! # Architecture
//!
//! ```text
//! Report request:
//!   UserId + FetchOptions → MealStore::fetch_meals → Vec<MealRecord> → analysis
//! ```
//!
//! Adapters are passed explicitly (as `Arc<dyn MealStore>`) into the engine,
//! never reached through a global client.

pub mod csv_import;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod types;

pub use csv_import::{CsvImportResult, MealCsvImporter};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use types::{
    FetchOptions, FoodList, MealRecord, MoodObservation, MoodProjection, NewMeal, SortOrder,
    SwapRecord, TimeContext, TimestampRange, UserId,
};

use async_trait::async_trait;

/// Source of a user's meal history
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Fetch every meal of `user` matching `options`, moods nested
    async fn fetch_meals(&self, user: UserId, options: &FetchOptions)
        -> StoreResult<Vec<MealRecord>>;

    /// Cheap reachability check used by readiness probes
    async fn ping(&self) -> StoreResult<()>;
}

/// Source of a user's accepted craving swaps
#[async_trait]
pub trait SwapStore: Send + Sync {
    /// Swaps of `user` whose satisfaction rating equals `rating`
    async fn swaps_with_rating(&self, user: UserId, rating: u8) -> StoreResult<Vec<SwapRecord>>;
}

/// Apply range, ordering and projection to an unfiltered meal list
///
/// Used by adapters that cannot push these down to a query engine.
pub(crate) fn apply_fetch_options(
    mut meals: Vec<MealRecord>,
    options: &FetchOptions,
) -> Vec<MealRecord> {
    if let Some(range) = options.range {
        meals.retain(|m| range.contains(&m.timestamp));
    }

    match options.order {
        Some(SortOrder::Asc) => {
            meals.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)))
        }
        Some(SortOrder::Desc) => {
            meals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)))
        }
        None => {}
    }

    if options.moods == MoodProjection::ContextAndIntensity {
        for mood in meals.iter_mut().flat_map(|m| m.moods.iter_mut()) {
            mood.mood_state = None;
        }
    }

    meals
}
