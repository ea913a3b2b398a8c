//! Nutrition goal endpoints

use crate::error::ApiResult;
use crate::repositories::DietGoalOverrides;
use crate::services::goals;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use fitplan_shared::types::{
    EffectiveGoalResponse, NutritionGoalResponse, SetGoalOverridesRequest,
};

/// Goal route definitions
pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:user_id/nutrition",
            get(get_effective_goal).post(set_goal_overrides),
        )
        .route("/:user_id/nutrition/refresh", post(refresh_goal))
}

/// GET /api/v1/goals/{user_id}/nutrition
async fn get_effective_goal(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<EffectiveGoalResponse>> {
    let response = goals::effective_goal(state.db(), user_id).await?;
    Ok(Json(response))
}

/// POST /api/v1/goals/{user_id}/nutrition
async fn set_goal_overrides(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<SetGoalOverridesRequest>,
) -> ApiResult<Json<EffectiveGoalResponse>> {
    let overrides = DietGoalOverrides {
        goal_type: request.goal_type.map(|g| g.as_str().to_string()),
        target_calories: request.calories,
        target_protein: request.protein,
        target_activity_kcal: request.activity_kcal,
    };
    let response = goals::set_overrides(state.db(), user_id, &overrides).await?;
    Ok(Json(response))
}

/// POST /api/v1/goals/{user_id}/nutrition/refresh
async fn refresh_goal(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<NutritionGoalResponse>> {
    let response = goals::refresh_nutrition_goal(state.db(), user_id).await?;
    Ok(Json(response))
}
