//! FitPlan Shared Library
//!
//! This crate contains the pure types and calculations used across the
//! backend: meal/intensity/goal enums, date normalization, the nutrition
//! goal calculator, and API request/response types.

pub mod dates;
pub mod health_metrics;
pub mod types;

// Re-export commonly used items
pub use dates::*;
pub use health_metrics::*;
pub use types::*;
