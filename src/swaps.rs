//! Craving Swap History
//!
//! Looks up the swaps a user accepted and later rated with a given
//! satisfaction score. The rating is validated before the store is touched.

use crate::insights::{InsightError, InsightResult};
use crate::store::{SwapRecord, SwapStore, UserId};
use serde::Serialize;
use std::sync::Arc;

/// Lowest accepted satisfaction rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted satisfaction rating
pub const MAX_RATING: i64 = 5;

/// Swaps matching a rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapHistory {
    pub swaps: Vec<SwapRecord>,
    pub total: usize,
}

/// Check a caller-supplied rating; absent counts as invalid
pub fn validate_rating(rating: Option<i64>) -> InsightResult<u8> {
    match rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => u8::try_from(r)
            .map_err(|_| InsightError::Validation("Rating must be between 1 and 5.".to_string())),
        _ => Err(InsightError::Validation(
            "Rating must be between 1 and 5.".to_string(),
        )),
    }
}

/// Filters a user's swap history by satisfaction rating
pub struct SwapHistoryService {
    store: Arc<dyn SwapStore>,
}

impl SwapHistoryService {
    pub fn new(store: Arc<dyn SwapStore>) -> Self {
        Self { store }
    }

    pub async fn by_satisfaction(&self, user: UserId, rating: Option<i64>) -> InsightResult<SwapHistory> {
        let rating = validate_rating(rating)?;
        let swaps = self.store.swaps_with_rating(user, rating).await?;

        tracing::debug!(user_id = %user, rating, matches = swaps.len(), "Swap history filtered");

        Ok(SwapHistory {
            total: swaps.len(),
            swaps,
        })
    }
}
