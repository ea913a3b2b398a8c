//! Schedule endpoints

use crate::error::ApiResult;
use crate::services::schedule;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use fitplan_shared::dates::normalize_date;
use fitplan_shared::types::{CreateScheduleRequest, DateQuery, FreeSlot, ScheduleResponse};

/// Schedule route definitions
pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/:user_id", post(create_schedule).get(list_schedules))
        .route("/:user_id/free", get(list_free_slots))
        .route("/:user_id/:schedule_id", delete(delete_schedule))
}

/// POST /api/v1/schedules/{user_id}
async fn create_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<CreateScheduleRequest>,
) -> ApiResult<(StatusCode, Json<ScheduleResponse>)> {
    let date = normalize_date(&request.date)?;
    let response = schedule::create_schedule(state.db(), user_id, date, &request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/schedules/{user_id}?date=YYYY-MM-DD
async fn list_schedules(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<ScheduleResponse>>> {
    let date = normalize_date(&query.date)?;
    let response = schedule::list_schedules(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// GET /api/v1/schedules/{user_id}/free?date=YYYY-MM-DD
async fn list_free_slots(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<FreeSlot>>> {
    let date = normalize_date(&query.date)?;
    let response = schedule::list_free_slots(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/schedules/{user_id}/{schedule_id}
async fn delete_schedule(
    State(state): State<AppState>,
    Path((user_id, schedule_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    schedule::delete_schedule(state.db(), user_id, schedule_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
