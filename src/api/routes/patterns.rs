//! Pattern Routes
//!
//! - GET /api/insights/patterns - Mood-boosting foods and weekly trend

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::auth::AuthenticatedUser;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::insights::PatternReport;

/// GET /api/insights/patterns
pub async fn patterns(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<Json<PatternReport>> {
    let report = state
        .engine
        .patterns(user)
        .await
        .map_err(ApiError::report("Failed to fetch patterns"))?;

    Ok(Json(report))
}
