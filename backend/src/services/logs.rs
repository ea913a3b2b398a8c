//! Manual diet and activity logging
//!
//! Every mutation finishes with a best-effort summary recompute for the
//! affected day. The recompute never fails the log operation.

use crate::error::{ApiError, ApiResult};
use crate::services::calorie;
use crate::repositories::{
    ActivityRepository, MealLogRepository, NewActivity, NewMealItem,
};
use chrono::NaiveDate;
use fitplan_shared::types::{
    ActivityResponse, DeleteLogResponse, Intensity, LogActivityRequest, LogActivityResponse,
    LogMealRequest, LogMealResponse, MealItemResponse, MealType,
};
use sqlx::SqlitePool;

const SOURCE_MANUAL: &str = "manual";

fn day_stamp(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date)
}

/// Log a meal item by hand.
pub async fn add_meal(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    request: &LogMealRequest,
) -> ApiResult<LogMealResponse> {
    if request.food_name.trim().is_empty() {
        return Err(ApiError::Validation("food_name must not be empty".to_string()));
    }
    if request.calories < 0 || request.protein < 0 {
        return Err(ApiError::Validation(
            "calories and protein must not be negative".to_string(),
        ));
    }

    let item = NewMealItem {
        meal_type: request.meal_type.as_str().to_string(),
        food_name: request.food_name.trim().to_string(),
        calories: request.calories,
        protein: request.protein,
        source: SOURCE_MANUAL.to_string(),
    };

    let mut tx = db.begin().await.map_err(ApiError::Database)?;
    let container_id = MealLogRepository::ensure_container(&mut tx, user_id, date).await?;
    let item_id =
        MealLogRepository::insert_item(&mut tx, container_id, user_id, date, &item).await?;
    tx.commit().await.map_err(ApiError::Database)?;

    let calorie_summary = calorie::recompute_best_effort(db, user_id, date).await;

    Ok(LogMealResponse {
        item: MealItemResponse {
            id: item_id,
            date,
            meal_type: request.meal_type,
            food_name: item.food_name,
            calories: item.calories,
            protein: item.protein,
            source: item.source,
        },
        calorie_summary,
    })
}

/// Delete a logged meal item.
pub async fn delete_meal(
    db: &SqlitePool,
    user_id: i64,
    item_id: i64,
) -> ApiResult<DeleteLogResponse> {
    let item = MealLogRepository::find_item(db, user_id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("meal item {} not found", item_id)))?;

    MealLogRepository::delete_item(db, user_id, item_id).await?;
    let calorie_summary = calorie::recompute_best_effort(db, user_id, item.date).await;

    Ok(DeleteLogResponse {
        deleted: true,
        calorie_summary,
    })
}

/// Log a completed activity by hand.
pub async fn add_activity(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    request: &LogActivityRequest,
) -> ApiResult<LogActivityResponse> {
    if request.workout.trim().is_empty() {
        return Err(ApiError::Validation("workout must not be empty".to_string()));
    }
    if request.duration <= 0 || request.calories < 0 {
        return Err(ApiError::Validation(
            "duration must be positive and calories non-negative".to_string(),
        ));
    }

    let intensity = request.intensity.unwrap_or(Intensity::Medium);
    let activity = NewActivity {
        workout: request.workout.trim().to_string(),
        duration: request.duration,
        calories: request.calories,
        intensity: intensity.as_str().to_string(),
        source: SOURCE_MANUAL.to_string(),
        completed_at: day_stamp(date),
    };

    let mut conn = db.acquire().await.map_err(ApiError::Database)?;
    let activity_id = ActivityRepository::insert(&mut conn, user_id, &activity).await?;
    drop(conn);

    let calorie_summary = calorie::recompute_best_effort(db, user_id, date).await;

    Ok(LogActivityResponse {
        activity: ActivityResponse {
            id: activity_id,
            workout: activity.workout,
            duration: activity.duration,
            calories: activity.calories,
            intensity,
            completed_at: activity.completed_at,
            source: activity.source,
        },
        calorie_summary,
    })
}

/// Delete a logged activity.
pub async fn delete_activity(
    db: &SqlitePool,
    user_id: i64,
    activity_id: i64,
) -> ApiResult<DeleteLogResponse> {
    let activity = ActivityRepository::find(db, user_id, activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("activity {} not found", activity_id)))?;

    ActivityRepository::delete(db, user_id, activity_id).await?;

    // completed_at is a day stamp; its date prefix names the day to recompute
    let date = activity
        .completed_at
        .get(..10)
        .and_then(|s| s.parse::<NaiveDate>().ok());
    let calorie_summary = match date {
        Some(date) => calorie::recompute_best_effort(db, user_id, date).await,
        None => None,
    };

    Ok(DeleteLogResponse {
        deleted: true,
        calorie_summary,
    })
}

/// A day's logged activities. Stored intensity strings that parse to no
/// known tier read as medium.
pub async fn list_activities(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<Vec<ActivityResponse>> {
    let rows = ActivityRepository::list_on(db, user_id, date).await?;
    Ok(rows
        .into_iter()
        .map(|row| ActivityResponse {
            id: row.id,
            workout: row.workout,
            duration: row.duration,
            calories: row.calories,
            intensity: Intensity::parse(&row.intensity).unwrap_or(Intensity::Medium),
            completed_at: row.completed_at,
            source: row.source,
        })
        .collect())
}

/// A day's logged meal items.
pub async fn list_meals(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<Vec<MealItemResponse>> {
    let rows = MealLogRepository::list_by_date(db, user_id, date).await?;
    Ok(rows
        .into_iter()
        .map(|row| MealItemResponse {
            id: row.id,
            date: row.date,
            meal_type: MealType::parse(&row.meal_type).unwrap_or(MealType::Snack),
            food_name: row.food_name,
            calories: row.calories,
            protein: row.protein,
            source: row.source,
        })
        .collect())
}
