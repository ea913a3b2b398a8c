//! Data access layer
//!
//! Repositories own all SQL. Services compose them inside transaction
//! boundaries where atomicity matters (plan replacement, plan apply).

mod catalog;
mod goals;
mod logs;
mod recommendations;
mod schedules;
mod summary;
mod users;

pub use catalog::{FoodCandidate, FoodCatalogRepository, WorkoutCandidate, WorkoutCatalogRepository};
pub use goals::{DietGoalOverrides, GoalRepository, NutritionGoalRow};
pub use logs::{
    ActivityRepository, ActivityRow, MealItemRow, MealLogRepository, NewActivity, NewMealItem,
};
pub use recommendations::{
    DietRecommendation, NewDietRecommendation, NewWorkoutRecommendation,
    RecommendationRepository, WorkoutRecommendation,
};
pub use schedules::{NewSchedule, ScheduleRepository, ScheduleRow};
pub use summary::{CalorieSummaryRow, NewCalorieSummary, SummaryRepository};
pub use users::{FoodPreferencesRow, PreferenceRepository, UserProfileRow, UserRepository};
