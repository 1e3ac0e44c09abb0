//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not report
//! bodies themselves (reports serialize straight from the engine types).

use serde::{Deserialize, Serialize};

// ============================================
// INSIGHT DTOs
// ============================================

/// Mood calendar query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarParams {
    /// Start of range (ISO date); ignored unless endDate is also given
    #[serde(default)]
    pub start_date: Option<String>,
    /// End of range (ISO date); ignored unless startDate is also given
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Swap history filter request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfactionFilterRequest {
    /// Satisfaction rating to match (1..5)
    #[serde(default)]
    pub satisfaction_rating: Option<i64>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Record store status
    pub store: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
