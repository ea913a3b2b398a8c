//! Diet/activity logging and daily summary endpoints

use crate::error::ApiResult;
use crate::services::{calorie, logs};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use fitplan_shared::dates::normalize_date;
use fitplan_shared::types::{
    ActivityResponse, CalorieSummaryResponse, DateQuery, DeleteLogResponse, LogActivityRequest,
    LogActivityResponse, LogMealRequest, LogMealResponse, MealItemResponse,
};

/// Log route definitions
pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/:user_id/meals", post(add_meal).get(list_meals))
        .route("/:user_id/meals/:item_id", delete(delete_meal))
        .route("/:user_id/activities", post(add_activity).get(list_activities))
        .route("/:user_id/activities/:activity_id", delete(delete_activity))
        .route("/:user_id/summary", get(get_summary))
}

/// POST /api/v1/logs/{user_id}/meals
async fn add_meal(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<LogMealRequest>,
) -> ApiResult<Json<LogMealResponse>> {
    let date = normalize_date(&request.date)?;
    let response = logs::add_meal(state.db(), user_id, date, &request).await?;
    Ok(Json(response))
}

/// GET /api/v1/logs/{user_id}/meals?date=YYYY-MM-DD
async fn list_meals(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<MealItemResponse>>> {
    let date = normalize_date(&query.date)?;
    let response = logs::list_meals(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/logs/{user_id}/meals/{item_id}
async fn delete_meal(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(i64, i64)>,
) -> ApiResult<Json<DeleteLogResponse>> {
    let response = logs::delete_meal(state.db(), user_id, item_id).await?;
    Ok(Json(response))
}

/// POST /api/v1/logs/{user_id}/activities
async fn add_activity(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<LogActivityRequest>,
) -> ApiResult<Json<LogActivityResponse>> {
    let date = normalize_date(&request.date)?;
    let response = logs::add_activity(state.db(), user_id, date, &request).await?;
    Ok(Json(response))
}

/// GET /api/v1/logs/{user_id}/activities?date=YYYY-MM-DD
async fn list_activities(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<ActivityResponse>>> {
    let date = normalize_date(&query.date)?;
    let response = logs::list_activities(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/logs/{user_id}/activities/{activity_id}
async fn delete_activity(
    State(state): State<AppState>,
    Path((user_id, activity_id)): Path<(i64, i64)>,
) -> ApiResult<Json<DeleteLogResponse>> {
    let response = logs::delete_activity(state.db(), user_id, activity_id).await?;
    Ok(Json(response))
}

/// GET /api/v1/logs/{user_id}/summary?date=YYYY-MM-DD
///
/// Recomputes rather than reading stored state, so callers always see
/// the current balance.
async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<CalorieSummaryResponse>> {
    let date = normalize_date(&query.date)?;
    let response = calorie::compute_and_save_daily_summary(state.db(), user_id, date).await?;
    Ok(Json(response))
}
