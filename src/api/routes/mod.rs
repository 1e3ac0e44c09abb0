//! API Routes
//!
//! Route handlers organized by functionality.

pub mod achievements;
pub mod calendar;
pub mod health;
pub mod patterns;
