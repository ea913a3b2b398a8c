//! Schedule management and plan-slot inference
//!
//! The plan engine reads the day's schedule titles to decide which meal
//! slots to fill and whether to slot a workout. Matching is substring
//! based over lowercased titles; the keyword lists carry the Korean
//! labels the legacy data set uses.

use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewSchedule, ScheduleRepository, ScheduleRow};
use crate::services::calorie;
use chrono::NaiveDate;
use fitplan_shared::types::{CreateScheduleRequest, FreeSlot, MealType, ScheduleResponse};
use sqlx::SqlitePool;
use std::collections::BTreeSet;

const BREAKFAST_KEYWORDS: &[&str] = &["아침", "아침식사", "조식"];
const LUNCH_KEYWORDS: &[&str] = &["점심", "점심식사"];
const DINNER_KEYWORDS: &[&str] = &["저녁", "저녁식사"];
const SNACK_KEYWORDS: &[&str] = &["간식"];

const WORKOUT_KEYWORDS: &[&str] = &[
    "운동", "헬스", "pt", "피티", "러닝", "런닝", "조깅", "요가", "필라테스",
];
const FREE_TIME_KEYWORDS: &[&str] = &["휴식", "자유", "여유", "빈시간", "프리"];

/// Bounds of the planning day for free-slot computation.
const DAY_START_MINUTES: i64 = 6 * 60;
const DAY_END_MINUTES: i64 = 23 * 60;

/// Meal slots named by the day's schedule titles.
pub fn infer_meals(titles: &[String]) -> BTreeSet<MealType> {
    let joined = titles.join(" ").to_lowercase();
    let mut slots = BTreeSet::new();

    let checks: [(&[&str], MealType); 4] = [
        (BREAKFAST_KEYWORDS, MealType::Breakfast),
        (LUNCH_KEYWORDS, MealType::Lunch),
        (DINNER_KEYWORDS, MealType::Dinner),
        (SNACK_KEYWORDS, MealType::Snack),
    ];

    for (keywords, meal) in checks {
        if keywords.iter().any(|k| joined.contains(k)) {
            slots.insert(meal);
        }
    }

    slots
}

/// Whether the day's schedule asks for a workout: either an explicit
/// workout entry or enough marked free time to fit one.
pub fn infer_need_workout(titles: &[String]) -> bool {
    let joined = titles.join(" ").to_lowercase();
    WORKOUT_KEYWORDS.iter().any(|k| joined.contains(k))
        || FREE_TIME_KEYWORDS.iter().any(|k| joined.contains(k))
}

fn parse_minutes(hhmm: &str) -> Option<i64> {
    let (h, m) = hhmm.split_once(':')?;
    let hours: i64 = h.parse().ok()?;
    let minutes: i64 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn format_minutes(total: i64) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Gaps in the day not covered by any schedule entry, clamped to the
/// planning window (06:00-23:00). Entries with unparseable times are
/// skipped.
pub fn free_slots(entries: &[ScheduleRow]) -> Vec<FreeSlot> {
    let mut busy: Vec<(i64, i64)> = entries
        .iter()
        .filter_map(|entry| {
            let start = parse_minutes(&entry.start_time)?;
            let end = parse_minutes(&entry.end_time)?;
            (start < end).then_some((start, end))
        })
        .collect();
    busy.sort();

    let mut slots = Vec::new();
    let mut cursor = DAY_START_MINUTES;
    for (start, end) in busy {
        if start > cursor {
            slots.push(FreeSlot {
                start: format_minutes(cursor),
                end: format_minutes(start.min(DAY_END_MINUTES)),
                duration_minutes: start.min(DAY_END_MINUTES) - cursor,
            });
        }
        cursor = cursor.max(end);
        if cursor >= DAY_END_MINUTES {
            break;
        }
    }
    if cursor < DAY_END_MINUTES {
        slots.push(FreeSlot {
            start: format_minutes(cursor),
            end: format_minutes(DAY_END_MINUTES),
            duration_minutes: DAY_END_MINUTES - cursor,
        });
    }

    slots.retain(|slot| slot.duration_minutes > 0);
    slots
}

fn to_response(row: ScheduleRow) -> ScheduleResponse {
    ScheduleResponse {
        id: row.id,
        date: row.date,
        start_time: row.start_time,
        end_time: row.end_time,
        title: row.title,
        memo: row.memo,
    }
}

/// Create a schedule entry after validating its time range.
pub async fn create_schedule(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    request: &CreateScheduleRequest,
) -> ApiResult<ScheduleResponse> {
    if request.title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }

    let start = parse_minutes(&request.start_time)
        .ok_or_else(|| ApiError::Validation(format!("invalid start_time: {}", request.start_time)))?;
    let end = parse_minutes(&request.end_time)
        .ok_or_else(|| ApiError::Validation(format!("invalid end_time: {}", request.end_time)))?;
    if start >= end {
        return Err(ApiError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }

    let new = NewSchedule {
        date,
        start_time: request.start_time.clone(),
        end_time: request.end_time.clone(),
        title: request.title.trim().to_string(),
        memo: request.memo.clone(),
    };
    let id = ScheduleRepository::create(db, user_id, &new).await?;

    calorie::recompute_best_effort(db, user_id, date).await;

    Ok(ScheduleResponse {
        id,
        date,
        start_time: new.start_time,
        end_time: new.end_time,
        title: new.title,
        memo: new.memo,
    })
}

/// A day's schedule entries.
pub async fn list_schedules(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<Vec<ScheduleResponse>> {
    let rows = ScheduleRepository::list_by_date(db, user_id, date).await?;
    Ok(rows.into_iter().map(to_response).collect())
}

/// Delete a schedule entry.
pub async fn delete_schedule(db: &SqlitePool, user_id: i64, schedule_id: i64) -> ApiResult<()> {
    let entry = ScheduleRepository::find(db, user_id, schedule_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("schedule {} not found", schedule_id)))?;

    ScheduleRepository::delete(db, user_id, schedule_id).await?;
    calorie::recompute_best_effort(db, user_id, entry.date).await;

    Ok(())
}

/// Free slots on the given day.
pub async fn list_free_slots(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<Vec<FreeSlot>> {
    let rows = ScheduleRepository::list_by_date(db, user_id, date).await?;
    Ok(free_slots(&rows))
}
