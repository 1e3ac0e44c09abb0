//! MoodMeal REST API
//!
//! HTTP API layer for the insights engine, built with Axum.
//!
//! # Endpoints
//!
//! ## Insights
//! - `GET /api/insights/mood-calendar` - Meals grouped by day (`startDate`, `endDate`)
//! - `GET /api/insights/patterns` - Top mood-boosting foods and weekly trend
//! - `GET /api/insights/achievements` - Streak, balanced days, new foods
//! - `POST /api/insights/achievements` - Swap history by satisfaction rating
//!
//! Every insights route requires the `x-user-id` header set by the gateway.
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use moodmeal::api::{serve, AppState};
//! use moodmeal::config::ApiConfig;
//! use moodmeal::insights::{InsightsConfig, InsightsEngine};
//! use moodmeal::store::SqliteStore;
//! use moodmeal::swaps::SwapHistoryService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open("moodmeal.db")?);
//!     let engine = Arc::new(InsightsEngine::with_system_clock(store.clone(), InsightsConfig::default()));
//!     let swaps = Arc::new(SwapHistoryService::new(store.clone()));
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(engine, swaps, store, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let insight_routes = Router::new()
        .route("/mood-calendar", get(routes::calendar::mood_calendar))
        .route("/patterns", get(routes::patterns::patterns))
        .route(
            "/achievements",
            get(routes::achievements::achievements).post(routes::achievements::swaps_by_satisfaction),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/insights", insight_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("MoodMeal API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("MoodMeal API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
