//! Daily plan orchestration
//!
//! Regeneration is a full replace of the day's recommendation set. Each
//! attempt runs delete-then-insert inside one transaction so concurrent
//! readers never observe a half-swapped day. The anti-repeat loop
//! retries with a fresh seed until the new set differs from the previous
//! unconfirmed one, giving up (without error) after a fixed budget when
//! the candidate pool is too small to vary.

use crate::error::{ApiError, ApiResult};
use crate::repositories::{
    ActivityRepository, DietRecommendation, FoodCatalogRepository, MealLogRepository, NewActivity,
    NewDietRecommendation, NewMealItem, NewWorkoutRecommendation, PreferenceRepository,
    RecommendationRepository, ScheduleRepository, WorkoutCatalogRepository, WorkoutRecommendation,
};
use crate::services::calorie;
use crate::services::recommendation::{select_diet, select_workout};
use crate::services::schedule::{infer_meals, infer_need_workout};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use fitplan_shared::types::{
    AppliedCounts, ApplyPartialResponse, ApplyPlanResponse, DietRecommendationResponse, Intensity,
    MealType, PlanResponse, RecommendationsResponse, WeekDayPlan, WeekPlanResponse,
    WorkoutRecommendationResponse,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::SqlitePool;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Retry budget for the anti-repeat regeneration loop.
const MAX_ATTEMPTS: u32 = 5;

const SOURCE_RECOMMENDATION: &str = "recommendation";

/// Comparable fingerprint of a day's recommendation set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlanSignature {
    diets: Vec<(String, String)>,
    workouts: Vec<(String, i64)>,
}

impl PlanSignature {
    fn of(diets: &[DietRecommendation], workouts: &[WorkoutRecommendation]) -> Self {
        Self {
            diets: diets
                .iter()
                .map(|d| (d.meal_type.clone(), d.menu.clone()))
                .collect(),
            workouts: workouts
                .iter()
                .map(|w| (w.workout.clone(), w.duration))
                .collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.diets.is_empty() && self.workouts.is_empty()
    }
}

/// Seed one attempt's RNG from the request identity, the attempt index
/// and the wall clock, so repeated calls (and week-generation nonces)
/// vary while a single attempt stays internally deterministic.
fn derive_seed(user_id: i64, date: NaiveDate, nonce: Option<&str>, attempt: u32) -> u64 {
    let stamp = Utc::now().timestamp_micros();
    let raw = match nonce {
        Some(n) => format!("{}|{}|{}|{}|{}", user_id, date, n, attempt, stamp),
        None => format!("{}|{}|{}|{}", user_id, date, attempt, stamp),
    };
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    hasher.finish()
}

fn diet_response(row: DietRecommendation) -> DietRecommendationResponse {
    DietRecommendationResponse {
        id: row.id,
        meal_type: MealType::parse(&row.meal_type).unwrap_or(MealType::Snack),
        menu: row.menu,
        calories: row.calories,
        protein: row.protein,
        created_at: row.created_at,
        confirmed: row.confirmed,
    }
}

fn workout_response(row: WorkoutRecommendation) -> WorkoutRecommendationResponse {
    WorkoutRecommendationResponse {
        id: row.id,
        workout: row.workout,
        duration: row.duration,
        calories: row.calories,
        created_at: row.created_at,
        confirmed: row.confirmed,
    }
}

/// List a day's recommendations.
pub async fn list_recommendations(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    include_confirmed: bool,
) -> ApiResult<RecommendationsResponse> {
    let diets = RecommendationRepository::list_diets(db, user_id, date, include_confirmed).await?;
    let workouts =
        RecommendationRepository::list_workouts(db, user_id, date, include_confirmed).await?;

    Ok(RecommendationsResponse {
        diets: diets.into_iter().map(diet_response).collect(),
        workouts: workouts.into_iter().map(workout_response).collect(),
    })
}

/// Regenerate the day's plan: infer slots from the schedule, select
/// candidates with a seeded RNG, and atomically replace the previous
/// recommendation set. See the module docs for the anti-repeat loop.
pub async fn regenerate_daily_plan(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    progress: i64,
    nonce: Option<&str>,
) -> ApiResult<RecommendationsResponse> {
    let schedules = ScheduleRepository::list_by_date(db, user_id, date).await?;
    let titles: Vec<String> = schedules.iter().map(|s| s.title.clone()).collect();

    // Previous unconfirmed state drives the per-slot exclusions and the
    // anti-repeat signature.
    let prev_diets = RecommendationRepository::list_diets(db, user_id, date, false).await?;
    let prev_workouts = RecommendationRepository::list_workouts(db, user_id, date, false).await?;
    let prev_signature = PlanSignature::of(&prev_diets, &prev_workouts);
    let prev_menu_by_meal: HashMap<String, String> = prev_diets
        .iter()
        .map(|d| (d.meal_type.clone(), d.menu.clone()))
        .collect();
    let prev_workout_names: Vec<String> =
        prev_workouts.iter().map(|w| w.workout.clone()).collect();

    let mut meals: Vec<MealType> = infer_meals(&titles).into_iter().collect();
    if meals.is_empty() {
        meals = vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner];
    }
    let need_workout = infer_need_workout(&titles);
    let intensity = Intensity::from_progress(progress);

    let prefs = PreferenceRepository::find(db, user_id).await?;
    let likes = prefs.liked();
    let dislikes = prefs.disliked();
    let allergens = prefs.allergens();

    for attempt in 0..MAX_ATTEMPTS {
        let mut rng = StdRng::seed_from_u64(derive_seed(user_id, date, nonce, attempt));

        let mut diet_rows = Vec::with_capacity(meals.len());
        for meal in &meals {
            let candidates = FoodCatalogRepository::by_meal_type(db, *meal).await?;
            let exclude: Vec<String> = prev_menu_by_meal
                .get(meal.as_str())
                .cloned()
                .into_iter()
                .collect();
            let pick = select_diet(candidates, &likes, &dislikes, &allergens, &exclude, &mut rng);
            diet_rows.push(NewDietRecommendation {
                meal_type: meal.as_str().to_string(),
                menu: pick.menu,
                calories: pick.calories,
                protein: pick.protein,
            });
        }

        let workout_row = if need_workout {
            let candidates = WorkoutCatalogRepository::by_intensity(db, intensity).await?;
            let pick = select_workout(candidates, &prev_workout_names, &mut rng);
            Some(NewWorkoutRecommendation {
                workout: pick.workout,
                duration: pick.duration,
                calories: pick.calories,
            })
        } else {
            None
        };

        // Atomic replace: the whole day's set swaps in one transaction.
        let mut tx = db.begin().await.map_err(ApiError::Database)?;
        RecommendationRepository::delete_for_date(&mut tx, user_id, date).await?;
        for row in &diet_rows {
            RecommendationRepository::insert_diet(&mut tx, user_id, date, row).await?;
        }
        if let Some(row) = &workout_row {
            RecommendationRepository::insert_workout(&mut tx, user_id, date, row).await?;
        }
        tx.commit().await.map_err(ApiError::Database)?;

        let cur_diets = RecommendationRepository::list_diets(db, user_id, date, true).await?;
        let cur_workouts = RecommendationRepository::list_workouts(db, user_id, date, true).await?;
        let cur_signature = PlanSignature::of(&cur_diets, &cur_workouts);

        if prev_signature.is_empty() || cur_signature != prev_signature {
            calorie::recompute_best_effort(db, user_id, date).await;
            return Ok(RecommendationsResponse {
                diets: cur_diets.into_iter().map(diet_response).collect(),
                workouts: cur_workouts.into_iter().map(workout_response).collect(),
            });
        }

        debug!(
            user_id,
            %date,
            attempt,
            "regeneration reproduced the previous plan, retrying"
        );
    }

    // Candidate pool too small to vary. The last attempt stands.
    calorie::recompute_best_effort(db, user_id, date).await;
    list_recommendations(db, user_id, date, true).await
}

/// Recommendations plus the stored summary for a day.
pub async fn get_plan(db: &SqlitePool, user_id: i64, date: NaiveDate) -> ApiResult<PlanResponse> {
    let recommendations = list_recommendations(db, user_id, date, true).await?;
    let calorie_summary = calorie::stored_summary(db, user_id, date).await?;

    Ok(PlanResponse {
        date,
        recommendations,
        calorie_summary,
    })
}

fn day_stamp(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date)
}

/// Apply the full day: copy every unconfirmed recommendation into the
/// logs and confirm them, all inside one transaction. Nothing pending is
/// a no-op with zero counts, not an error.
pub async fn apply_plan(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> ApiResult<ApplyPlanResponse> {
    let mut tx = db.begin().await.map_err(ApiError::Database)?;

    let diets = RecommendationRepository::list_unconfirmed_diets(&mut tx, user_id, date).await?;
    let workouts =
        RecommendationRepository::list_unconfirmed_workouts(&mut tx, user_id, date).await?;

    let applied = if diets.is_empty() && workouts.is_empty() {
        AppliedCounts {
            diet_logs: 0,
            activity_logs: 0,
        }
    } else {
        if !diets.is_empty() {
            let container_id = MealLogRepository::ensure_container(&mut tx, user_id, date).await?;
            for diet in &diets {
                let item = NewMealItem {
                    meal_type: diet.meal_type.clone(),
                    food_name: diet.menu.clone(),
                    calories: diet.calories,
                    protein: diet.protein,
                    source: SOURCE_RECOMMENDATION.to_string(),
                };
                MealLogRepository::insert_item(&mut tx, container_id, user_id, date, &item).await?;
            }
        }

        for workout in &workouts {
            let activity = NewActivity {
                workout: workout.workout.clone(),
                duration: workout.duration,
                calories: workout.calories,
                intensity: Intensity::Medium.as_str().to_string(),
                source: SOURCE_RECOMMENDATION.to_string(),
                completed_at: day_stamp(date),
            };
            ActivityRepository::insert(&mut tx, user_id, &activity).await?;
        }

        RecommendationRepository::confirm_unconfirmed(&mut tx, user_id, date).await?;

        AppliedCounts {
            diet_logs: diets.len() as u64,
            activity_logs: workouts.len() as u64,
        }
    };

    tx.commit().await.map_err(ApiError::Database)?;

    let calorie_summary = calorie::recompute_best_effort(db, user_id, date).await;
    let recommendations = list_recommendations(db, user_id, date, true).await?;

    Ok(ApplyPlanResponse {
        applied,
        recommendations,
        calorie_summary,
    })
}

/// Apply only the named meal slots: matching unconfirmed diets are
/// copied into the logs and confirmed by id; everything else stays
/// pending. Workouts are never part of a partial apply.
pub async fn apply_plan_partial(
    db: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    meal_types: &[MealType],
) -> ApiResult<ApplyPartialResponse> {
    if meal_types.is_empty() {
        return Err(ApiError::Validation(
            "meal_types must not be empty".to_string(),
        ));
    }
    let wanted: BTreeSet<&str> = meal_types.iter().map(MealType::as_str).collect();

    let mut tx = db.begin().await.map_err(ApiError::Database)?;

    let pending = RecommendationRepository::list_unconfirmed_diets(&mut tx, user_id, date).await?;
    let matching: Vec<&DietRecommendation> = pending
        .iter()
        .filter(|d| wanted.contains(d.meal_type.as_str()))
        .collect();

    let applied_count = if matching.is_empty() {
        0
    } else {
        let container_id = MealLogRepository::ensure_container(&mut tx, user_id, date).await?;
        let mut ids = Vec::with_capacity(matching.len());
        for diet in &matching {
            let item = NewMealItem {
                meal_type: diet.meal_type.clone(),
                food_name: diet.menu.clone(),
                calories: diet.calories,
                protein: diet.protein,
                source: SOURCE_RECOMMENDATION.to_string(),
            };
            MealLogRepository::insert_item(&mut tx, container_id, user_id, date, &item).await?;
            ids.push(diet.id);
        }
        RecommendationRepository::confirm_diets_by_ids(&mut tx, user_id, &ids).await?
    };

    tx.commit().await.map_err(ApiError::Database)?;

    let calorie_summary = calorie::recompute_best_effort(db, user_id, date).await;

    Ok(ApplyPartialResponse {
        applied_count,
        calorie_summary,
    })
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday-aligned week of plans. Stored recommendations are reused;
/// empty days (or all seven under `force`) regenerate with a per-day
/// nonce so the week doesn't repeat one combination.
pub async fn week_plan(
    db: &SqlitePool,
    user_id: i64,
    start: NaiveDate,
    force: bool,
    nonce: Option<&str>,
) -> ApiResult<WeekPlanResponse> {
    let week_start = monday_of(start);

    let mut days = Vec::with_capacity(7);
    for offset in 0..7 {
        let date = week_start + Duration::days(offset);
        let day_nonce = nonce
            .map(str::to_string)
            .unwrap_or_else(|| format!("week-{}", date));

        let recommendations = if force {
            regenerate_daily_plan(db, user_id, date, 70, Some(&day_nonce)).await?
        } else {
            let stored = list_recommendations(db, user_id, date, true).await?;
            if stored.diets.is_empty() && stored.workouts.is_empty() {
                regenerate_daily_plan(db, user_id, date, 70, Some(&day_nonce)).await?
            } else {
                stored
            }
        };

        days.push(WeekDayPlan {
            date,
            recommendations,
        });
    }

    Ok(WeekPlanResponse {
        start: week_start,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diet(meal: &str, menu: &str) -> DietRecommendation {
        DietRecommendation {
            id: 0,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            meal_type: meal.to_string(),
            menu: menu.to_string(),
            calories: 500,
            protein: 20,
            created_at: Utc::now(),
            confirmed: false,
        }
    }

    #[test]
    fn signature_ignores_ids_and_calories() {
        let a = vec![diet("lunch", "비빔밥")];
        let mut b = vec![diet("lunch", "비빔밥")];
        b[0].id = 99;
        b[0].calories = 1;
        assert_eq!(PlanSignature::of(&a, &[]), PlanSignature::of(&b, &[]));
    }

    #[test]
    fn signature_differs_on_menu_change() {
        let a = vec![diet("lunch", "비빔밥")];
        let b = vec![diet("lunch", "제육볶음")];
        assert_ne!(PlanSignature::of(&a, &[]), PlanSignature::of(&b, &[]));
    }

    #[test]
    fn empty_signature_is_empty() {
        assert!(PlanSignature::of(&[], &[]).is_empty());
        assert!(!PlanSignature::of(&[diet("lunch", "비빔밥")], &[]).is_empty());
    }

    #[test]
    fn monday_alignment() {
        // 2024-03-15 is a Friday
        let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(monday_of(friday), monday);
        assert_eq!(monday_of(monday), monday);
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(monday_of(sunday), monday);
    }

    #[test]
    fn seeds_differ_across_attempts_and_nonces() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let a = derive_seed(1, date, Some("n1"), 0);
        let b = derive_seed(1, date, Some("n2"), 0);
        let c = derive_seed(1, date, Some("n1"), 1);
        // Wall-clock in the seed makes exact collisions vanishingly rare
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
