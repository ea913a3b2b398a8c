//! Domain enums and API request/response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Enums
// ============================================================================

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Parse a stored meal type string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }

    /// All slots in canonical order
    pub fn all() -> [MealType; 4] {
        [
            MealType::Breakfast,
            MealType::Lunch,
            MealType::Dinner,
            MealType::Snack,
        ]
    }
}

/// Workout intensity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }

    /// Parse a stored intensity string; legacy rows use Korean labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "낮음" => Some(Intensity::Low),
            "medium" | "중간" => Some(Intensity::Medium),
            "high" | "높음" => Some(Intensity::High),
            _ => None,
        }
    }

    /// Map a 0-100 progress figure to a workout intensity tier
    pub fn from_progress(progress: i64) -> Self {
        if progress < 60 {
            Intensity::Low
        } else if progress < 85 {
            Intensity::Medium
        } else {
            Intensity::High
        }
    }
}

/// Diet goal type
///
/// Unrecognized values fall back to `Maintain`; Korean aliases from the
/// legacy data set are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Loss,
    Gain,
    #[default]
    Maintain,
}

impl GoalType {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "loss" | "감량" => GoalType::Loss,
            "gain" | "증량" => GoalType::Gain,
            _ => GoalType::Maintain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Loss => "loss",
            GoalType::Gain => "gain",
            GoalType::Maintain => "maintain",
        }
    }
}

/// Biological sex as stored on the user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse the profile column; legacy rows use Korean single-character
    /// values. Unknown strings yield `None` (neutral BMR offset applies).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "male" | "M" | "m" | "남" => Some(Sex::Male),
            "female" | "F" | "f" | "여" => Some(Sex::Female),
            _ => None,
        }
    }
}

// ============================================================================
// Plan Types
// ============================================================================

/// Request body for plan generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub date: String,
    #[serde(default = "default_progress")]
    pub progress: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

fn default_progress() -> i64 {
    70
}

/// Request body for a full plan apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPlanRequest {
    pub date: String,
}

/// Request body for a partial (per-meal) plan apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPartialRequest {
    pub date: String,
    pub meal_types: Vec<MealType>,
}

/// Query parameters carrying a single date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

/// Query parameters for the week plan endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// `1` or `true` forces regeneration of all seven days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl WeekQuery {
    pub fn force_regenerate(&self) -> bool {
        matches!(self.force.as_deref(), Some("1") | Some("true"))
    }
}

/// One diet recommendation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietRecommendationResponse {
    pub id: i64,
    pub meal_type: MealType,
    pub menu: String,
    pub calories: i64,
    pub protein: i64,
    pub created_at: DateTime<Utc>,
    pub confirmed: bool,
}

/// One workout recommendation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecommendationResponse {
    pub id: i64,
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
    pub created_at: DateTime<Utc>,
    pub confirmed: bool,
}

/// A day's recommendation set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub diets: Vec<DietRecommendationResponse>,
    pub workouts: Vec<WorkoutRecommendationResponse>,
}

/// Persisted daily energy-balance summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieSummaryResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub intake: f64,
    pub exercise: f64,
    pub deficit: f64,
    pub est_weight_change_kg: f64,
    pub updated_at: DateTime<Utc>,
}

/// Response for plan generation and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub date: NaiveDate,
    pub recommendations: RecommendationsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_summary: Option<CalorieSummaryResponse>,
}

/// Counts of rows materialized by a full apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedCounts {
    pub diet_logs: u64,
    pub activity_logs: u64,
}

/// Response for a full apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPlanResponse {
    pub applied: AppliedCounts,
    pub recommendations: RecommendationsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_summary: Option<CalorieSummaryResponse>,
}

/// Response for a partial apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPartialResponse {
    pub applied_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_summary: Option<CalorieSummaryResponse>,
}

/// One day within a week plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekDayPlan {
    pub date: NaiveDate,
    pub recommendations: RecommendationsResponse,
}

/// Response for the week plan endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlanResponse {
    pub start: NaiveDate,
    pub days: Vec<WeekDayPlan>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// Source table for each resolved goal field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalFieldSources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_kcal: Option<String>,
}

/// Effective nutrition goal: explicit overrides merged field-by-field over
/// the derived targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveGoalResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<GoalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_kcal: Option<i64>,
    pub source: GoalFieldSources,
}

/// Derived nutrition targets as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionGoalResponse {
    pub calories: i64,
    pub protein: i64,
    pub activity_kcal: i64,
}

/// Manual goal overrides; absent or zero fields defer to the derived
/// targets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetGoalOverridesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<GoalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_kcal: Option<i64>,
}

// ============================================================================
// Log Types
// ============================================================================

/// Request to log a meal item manually
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMealRequest {
    pub date: String,
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: i64,
    #[serde(default)]
    pub protein: i64,
}

/// Request to log a completed activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogActivityRequest {
    pub date: String,
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
}

/// A logged meal item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealItemResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: i64,
    pub protein: i64,
    pub source: String,
}

/// A logged activity
///
/// `completed_at` is the stored day-stamp string
/// (`YYYY-MM-DDT00:00:00Z` for applied recommendations and manual logs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub id: i64,
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
    pub intensity: Intensity,
    pub completed_at: String,
    pub source: String,
}

/// Response for a manual meal log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMealResponse {
    pub item: MealItemResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_summary: Option<CalorieSummaryResponse>,
}

/// Response for a manual activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogActivityResponse {
    pub activity: ActivityResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_summary: Option<CalorieSummaryResponse>,
}

/// Response for log deletions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLogResponse {
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_summary: Option<CalorieSummaryResponse>,
}

// ============================================================================
// Schedule Types
// ============================================================================

/// Request to create a schedule entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    #[serde(default)]
    pub memo: String,
}

/// A schedule entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    pub memo: String,
}

/// A gap between two schedule entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
}

// ============================================================================
// Error Types
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
