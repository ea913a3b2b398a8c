//! Daily calorie-balance accounting
//!
//! Every call is a full recompute followed by an upsert; nothing ever
//! merges with a previously stored summary, so the engine self-corrects
//! after races on the underlying rows.
//!
//! This engine keeps its own BMR default age and a five-tier activity
//! table. They overlap with the three-tier constants in
//! `fitplan_shared::health_metrics` but are intentionally not unified;
//! see DESIGN.md.

use crate::error::ApiResult;
use crate::repositories::{
    ActivityRepository, MealLogRepository, NewCalorieSummary, RecommendationRepository,
    SummaryRepository, UserRepository,
};
use chrono::NaiveDate;
use fitplan_shared::types::{CalorieSummaryResponse, Sex};
use sqlx::SqlitePool;
use tracing::warn;

/// Default age for the summary BMR when the profile has none.
const SUMMARY_DEFAULT_AGE: i64 = 25;

/// kcal per kg of body fat, the fixed conversion constant.
const KCAL_PER_KG: f64 = 7700.0;

/// Five-tier activity multipliers keyed by the profile's
/// `activity_level`. Unknown or missing levels read as sedentary.
fn activity_factor(level: Option<&str>) -> f64 {
    match level.map(str::to_lowercase).as_deref() {
        Some("light") => 1.375,
        Some("moderate") => 1.55,
        Some("active") => 1.725,
        Some("very_active") => 1.9,
        _ => 1.2,
    }
}

/// Mifflin-St Jeor with this engine's defaults. Missing weight or
/// height yields 0 rather than an error: the summary still records
/// intake and exercise for profile-less users.
fn calc_bmr(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age: Option<i64>,
    sex: Option<Sex>,
) -> f64 {
    let (weight, height) = match (
        weight_kg.filter(|w| *w > 0.0),
        height_cm.filter(|h| *h > 0.0),
    ) {
        (Some(w), Some(h)) => (w, h),
        _ => return 0.0,
    };

    let age = age.filter(|a| *a > 0).unwrap_or(SUMMARY_DEFAULT_AGE);
    let offset = match sex {
        Some(Sex::Male) => 5.0,
        Some(Sex::Female) => -161.0,
        None => -78.0,
    };

    10.0 * weight + 6.25 * height - 5.0 * age as f64 + offset
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}

/// Recompute and persist the day's summary, returning the stored row.
///
/// Intake counts logged meal items plus unconfirmed diet
/// recommendations; exercise counts logged activities plus unconfirmed
/// workout recommendations. Confirmed recommendations are excluded from
/// both sums because applying them already copied their calories into
/// the logs.
pub async fn compute_and_save_daily_summary(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<CalorieSummaryResponse> {
    let profile = UserRepository::find_profile(db, user_id).await?;

    let (bmr, factor) = match &profile {
        Some(p) => (
            calc_bmr(
                p.weight,
                p.height,
                p.age,
                p.sex.as_deref().and_then(Sex::parse),
            ),
            activity_factor(p.activity_level.as_deref()),
        ),
        None => (0.0, 1.2),
    };
    let tdee = bmr * factor;

    let logged_intake = MealLogRepository::calories_on(db, user_id, date).await?;
    let pending_intake =
        RecommendationRepository::unconfirmed_diet_calories(db, user_id, date).await?;
    let intake = (logged_intake + pending_intake) as f64;

    let logged_exercise = ActivityRepository::calories_on(db, user_id, date).await?;
    let pending_exercise =
        RecommendationRepository::unconfirmed_workout_calories(db, user_id, date).await?;
    let exercise = (logged_exercise + pending_exercise) as f64;

    let deficit = (tdee + exercise) - intake;
    let est_weight_change_kg = deficit / KCAL_PER_KG;

    let summary = NewCalorieSummary {
        bmr: round2(bmr),
        tdee: round2(tdee),
        intake: round2(intake),
        exercise: round2(exercise),
        deficit: round2(deficit),
        est_weight_change_kg: round4(est_weight_change_kg),
    };
    SummaryRepository::upsert(db, user_id, date, &summary).await?;

    let stored = SummaryRepository::find(db, user_id, date)
        .await?
        .map(|row| CalorieSummaryResponse {
            bmr: row.bmr,
            tdee: row.tdee,
            intake: row.intake,
            exercise: row.exercise,
            deficit: row.deficit,
            est_weight_change_kg: row.est_weight_change_kg,
            updated_at: row.updated_at,
        })
        .unwrap_or(CalorieSummaryResponse {
            bmr: summary.bmr,
            tdee: summary.tdee,
            intake: summary.intake,
            exercise: summary.exercise,
            deficit: summary.deficit,
            est_weight_change_kg: summary.est_weight_change_kg,
            updated_at: chrono::Utc::now(),
        });

    Ok(stored)
}

/// The stored summary for a day, if one was ever computed.
pub async fn stored_summary(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<Option<CalorieSummaryResponse>> {
    let row = SummaryRepository::find(db, user_id, date).await?;
    Ok(row.map(|row| CalorieSummaryResponse {
        bmr: row.bmr,
        tdee: row.tdee,
        intake: row.intake,
        exercise: row.exercise,
        deficit: row.deficit,
        est_weight_change_kg: row.est_weight_change_kg,
        updated_at: row.updated_at,
    }))
}

/// Recompute the summary as a side effect of another operation. Failures
/// are logged and swallowed; the triggering operation already succeeded.
pub async fn recompute_best_effort(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Option<CalorieSummaryResponse> {
    match compute_and_save_daily_summary(db, user_id, date).await {
        Ok(summary) => Some(summary),
        Err(err) => {
            warn!(user_id, %date, error = %err, "summary recompute failed");
            None
        }
    }
}
