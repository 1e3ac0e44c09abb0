//! In-memory record store
//!
//! Holds meals and swaps in insertion order behind an `RwLock`. Used as the
//! fixture adapter in tests and for running the API without a database file.

use super::*;
use tokio::sync::RwLock;

/// Record store backed by plain vectors
#[derive(Default)]
pub struct InMemoryStore {
    meals: RwLock<Vec<MealRecord>>,
    swaps: RwLock<Vec<SwapRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with meals (insertion order is kept)
    pub fn with_meals(meals: Vec<MealRecord>) -> Self {
        Self {
            meals: RwLock::new(meals),
            swaps: RwLock::new(Vec::new()),
        }
    }

    /// Append a meal, assigning the next id
    pub async fn insert_meal(&self, meal: NewMeal) -> i64 {
        let mut meals = self.meals.write().await;
        let id = meals.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        meals.push(meal.into_record(id));
        id
    }

    pub async fn insert_swap(&self, swap: SwapRecord) {
        self.swaps.write().await.push(swap);
    }

    pub async fn meal_count(&self) -> usize {
        self.meals.read().await.len()
    }
}

#[async_trait]
impl MealStore for InMemoryStore {
    async fn fetch_meals(
        &self,
        user: UserId,
        options: &FetchOptions,
    ) -> StoreResult<Vec<MealRecord>> {
        let owned: Vec<MealRecord> = self
            .meals
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == user)
            .cloned()
            .collect();

        Ok(apply_fetch_options(owned, options))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl SwapStore for InMemoryStore {
    async fn swaps_with_rating(&self, user: UserId, rating: u8) -> StoreResult<Vec<SwapRecord>> {
        Ok(self
            .swaps
            .read()
            .await
            .iter()
            .filter(|s| s.user_id == user && s.satisfaction_rating == Some(i32::from(rating)))
            .cloned()
            .collect())
    }
}
