//! Mood Calendar Routes
//!
//! - GET /api/insights/mood-calendar - Meals grouped by day with mean mood

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::auth::AuthenticatedUser;
use crate::api::dto::CalendarParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::insights::{CalendarQuery, CalendarReport};

/// GET /api/insights/mood-calendar?startDate=&endDate=
///
/// The date filter applies only when both bounds are supplied.
pub async fn mood_calendar(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<CalendarParams>,
) -> ApiResult<Json<CalendarReport>> {
    let query = CalendarQuery::parse(params.start_date.as_deref(), params.end_date.as_deref())
        .map_err(ApiError::report("Failed to fetch calendar data"))?;

    let report = state
        .engine
        .calendar(user, &query)
        .await
        .map_err(ApiError::report("Failed to fetch calendar data"))?;

    Ok(Json(report))
}
