//! Business logic layer
//!
//! Services implement the plan engine on top of the repositories: seeded
//! candidate selection, daily plan orchestration, apply-into-logs state
//! transitions, calorie accounting, goal resolution, and schedule
//! inference.

pub mod calorie;
pub mod goals;
pub mod logs;
pub mod plan;
pub mod recommendation;
pub mod schedule;
