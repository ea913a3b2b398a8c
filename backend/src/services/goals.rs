//! Nutrition goal derivation and resolution
//!
//! Two layers feed the effective goal: targets derived from the profile
//! (refreshed on demand) and manual overrides the user typed in.
//! Resolution is field by field, never whole-record: a single overridden
//! calorie target leaves the derived protein target in effect.

use crate::error::{ApiError, ApiResult};
use crate::repositories::{DietGoalOverrides, GoalRepository, UserRepository};
use fitplan_shared::health_metrics::{compute_nutrition_goal, GoalProfile};
use fitplan_shared::types::{
    EffectiveGoalResponse, GoalFieldSources, GoalType, NutritionGoalResponse, Sex,
};
use sqlx::SqlitePool;
use tracing::info;

const SOURCE_OVERRIDE: &str = "diet_goals";
const SOURCE_DERIVED: &str = "user_nutrition_goal";

/// Recompute targets from the profile and persist them.
///
/// When the profile carries no goal type, the manual override's goal
/// type applies; with neither, the calculation runs as `maintain`.
pub async fn refresh_nutrition_goal(
    db: &SqlitePool,
    user_id: i64,
) -> ApiResult<NutritionGoalResponse> {
    let profile = UserRepository::find_profile(db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {} not found", user_id)))?;

    let goal_type = match profile.goal.as_deref().filter(|g| !g.trim().is_empty()) {
        Some(g) => GoalType::parse(g),
        None => {
            let overrides = GoalRepository::find_overrides(db, user_id).await?;
            overrides
                .goal_type
                .as_deref()
                .map(GoalType::parse)
                .unwrap_or_default()
        }
    };

    let targets = compute_nutrition_goal(&GoalProfile {
        weight_kg: profile.weight,
        height_cm: profile.height,
        age_years: profile.age.map(|a| a as i32),
        sex: profile.sex.as_deref().and_then(Sex::parse),
        activity_level: profile.activity_level.clone(),
        goal: goal_type,
    })?;

    GoalRepository::upsert_targets(
        db,
        user_id,
        goal_type.as_str(),
        targets.calories,
        targets.protein,
        targets.activity_kcal,
    )
    .await?;

    info!(
        user_id,
        goal = goal_type.as_str(),
        calories = targets.calories,
        "nutrition targets refreshed"
    );

    Ok(NutritionGoalResponse {
        calories: targets.calories,
        protein: targets.protein,
        activity_kcal: targets.activity_kcal,
    })
}

fn resolve_field(
    override_value: Option<i64>,
    derived_value: Option<i64>,
) -> (Option<i64>, Option<String>) {
    match override_value.filter(|v| *v != 0) {
        Some(v) => (Some(v), Some(SOURCE_OVERRIDE.to_string())),
        None => match derived_value {
            Some(v) => (Some(v), Some(SOURCE_DERIVED.to_string())),
            None => (None, None),
        },
    }
}

/// Resolve the effective goal: manual overrides win field by field when
/// present and non-zero, otherwise the derived targets apply. Each
/// resolved field reports which table it came from.
pub async fn effective_goal(db: &SqlitePool, user_id: i64) -> ApiResult<EffectiveGoalResponse> {
    let overrides = GoalRepository::find_overrides(db, user_id).await?;
    let derived = GoalRepository::find_targets(db, user_id).await?;

    let (calories, calories_source) = resolve_field(
        overrides.target_calories,
        derived.as_ref().map(|d| d.calories),
    );
    let (protein, protein_source) = resolve_field(
        overrides.target_protein,
        derived.as_ref().map(|d| d.protein),
    );
    let (activity_kcal, activity_source) = resolve_field(
        overrides.target_activity_kcal,
        derived.as_ref().map(|d| d.activity_kcal),
    );

    let goal_type = overrides
        .goal_type
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(GoalType::parse)
        .or_else(|| derived.as_ref().map(|d| GoalType::parse(&d.goal_type)));

    Ok(EffectiveGoalResponse {
        goal_type,
        calories,
        protein,
        activity_kcal,
        source: GoalFieldSources {
            calories: calories_source,
            protein: protein_source,
            activity_kcal: activity_source,
        },
    })
}

/// Record manual overrides and return the newly effective goal.
pub async fn set_overrides(
    db: &SqlitePool,
    user_id: i64,
    overrides: &DietGoalOverrides,
) -> ApiResult<EffectiveGoalResponse> {
    GoalRepository::upsert_overrides(db, user_id, overrides).await?;
    effective_goal(db, user_id).await
}
