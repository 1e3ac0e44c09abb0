//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::ApiConfig;
use crate::insights::InsightsEngine;
use crate::store::MealStore;
use crate::swaps::SwapHistoryService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Report engine
    pub engine: Arc<InsightsEngine>,
    /// Swap history lookups
    pub swaps: Arc<SwapHistoryService>,
    /// Record store, for readiness checks
    pub store: Arc<dyn MealStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        engine: Arc<InsightsEngine>,
        swaps: Arc<SwapHistoryService>,
        store: Arc<dyn MealStore>,
        config: ApiConfig,
    ) -> Self {
        Self {
            engine,
            swaps,
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
