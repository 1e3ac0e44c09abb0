//! Achievement Routes
//!
//! - GET /api/insights/achievements - Streak, balanced days, new foods
//! - POST /api/insights/achievements - Swap history filtered by satisfaction

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::SatisfactionFilterRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::insights::AchievementSummary;
use crate::swaps::SwapHistory;

/// GET /api/insights/achievements
pub async fn achievements(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<Json<AchievementSummary>> {
    let summary = state
        .engine
        .achievements(user)
        .await
        .map_err(ApiError::report("Failed to fetch achievements"))?;

    Ok(Json(summary))
}

/// POST /api/insights/achievements
///
/// Rating outside 1..5 (or missing) is rejected before the store is queried.
/// Malformed bodies get the same validation error shape.
pub async fn swaps_by_satisfaction(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<SatisfactionFilterRequest>, JsonRejection>,
) -> ApiResult<Json<SwapHistory>> {
    let Json(req) = payload?;
    let history = state
        .swaps
        .by_satisfaction(user, req.satisfaction_rating)
        .await
        .map_err(ApiError::report("Failed to fetch achievements"))?;

    Ok(Json(history))
}
