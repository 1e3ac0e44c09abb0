//! Insight error types
//!
//! Validation failures are raised before any store access. Store failures
//! propagate unchanged from the adapter. Computation errors guard states a
//! well-formed store response cannot produce.

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while producing a report
#[derive(Error, Debug)]
pub enum InsightError {
    /// Caller input was malformed or out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record store fetch failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal inconsistency while aggregating
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type for insight operations
pub type InsightResult<T> = Result<T, InsightError>;
