//! MoodMeal API Server
//!
//! Run with: cargo run --bin moodmeal-api
//!
//! # Configuration
//!
//! - `MOODMEAL_CONFIG`: Path to a TOML config file (default: search standard locations)
//! - `MOODMEAL_DB_PATH`, `MOODMEAL_API_HOST`, `MOODMEAL_API_PORT`: Override file values
//! - `MOODMEAL_STREAK_UTC_OFFSET_MINUTES`: Day boundary used for streaks
//! - `MOODMEAL_LOG_LEVEL`, `MOODMEAL_LOG_FORMAT`: Logging (`RUST_LOG` wins when set)

use moodmeal::api::{serve, AppState};
use moodmeal::config::{Config, LoggingConfig};
use moodmeal::insights::InsightsEngine;
use moodmeal::store::SqliteStore;
use moodmeal::swaps::SwapHistoryService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var("MOODMEAL_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(path))?,
        Err(_) => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting MoodMeal API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.storage.db_path);

    let store = Arc::new(SqliteStore::open(&config.storage.db_path)?);
    tracing::info!("Record store opened");

    let engine = Arc::new(InsightsEngine::with_system_clock(
        store.clone(),
        config.insights.clone(),
    ));
    let swaps = Arc::new(SwapHistoryService::new(store.clone()));

    let state = AppState::new(engine, swaps, store, config.api.clone());

    tracing::info!("Starting server on {}:{}", config.api.host, config.api.port);
    serve(state, &config.api).await?;

    tracing::info!("MoodMeal API server stopped");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.default_directive().into());

    if logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
