//! Plan endpoints: generate, read, week view, apply

use crate::error::ApiResult;
use crate::services::plan;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fitplan_shared::dates::normalize_date;
use fitplan_shared::types::{
    ApplyPartialRequest, ApplyPartialResponse, ApplyPlanRequest, ApplyPlanResponse, DateQuery,
    GeneratePlanRequest, PlanResponse, WeekPlanResponse, WeekQuery,
};
use tracing::info;

/// Plan route definitions
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/:user_id", get(get_plan))
        .route("/:user_id/generate", post(generate_plan))
        .route("/:user_id/week", get(get_week_plan))
        .route("/:user_id/apply", post(apply_plan))
        .route("/:user_id/apply/partial", post(apply_plan_partial))
}

/// POST /api/v1/plan/{user_id}/generate
async fn generate_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<GeneratePlanRequest>,
) -> ApiResult<Json<PlanResponse>> {
    let date = normalize_date(&request.date)?;

    info!(user_id, %date, progress = request.progress, "regenerating daily plan");

    plan::regenerate_daily_plan(
        state.db(),
        user_id,
        date,
        request.progress,
        request.nonce.as_deref(),
    )
    .await?;

    // Reread including anything already confirmed, plus the fresh summary
    let response = plan::get_plan(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// GET /api/v1/plan/{user_id}?date=YYYY-MM-DD
async fn get_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<PlanResponse>> {
    let date = normalize_date(&query.date)?;
    let response = plan::get_plan(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// GET /api/v1/plan/{user_id}/week?start=&force=&nonce=
async fn get_week_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Json<WeekPlanResponse>> {
    let start = match &query.start {
        Some(raw) => normalize_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let response = plan::week_plan(
        state.db(),
        user_id,
        start,
        query.force_regenerate(),
        query.nonce.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/plan/{user_id}/apply
async fn apply_plan(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ApplyPlanRequest>,
) -> ApiResult<Json<ApplyPlanResponse>> {
    let date = normalize_date(&request.date)?;

    info!(user_id, %date, "applying plan into logs");

    let response = plan::apply_plan(state.db(), user_id, date).await?;
    Ok(Json(response))
}

/// POST /api/v1/plan/{user_id}/apply/partial
async fn apply_plan_partial(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ApplyPartialRequest>,
) -> ApiResult<Json<ApplyPartialResponse>> {
    let date = normalize_date(&request.date)?;

    let response =
        plan::apply_plan_partial(state.db(), user_id, date, &request.meal_types).await?;
    Ok(Json(response))
}
