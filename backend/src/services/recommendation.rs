//! Candidate filtering and seeded selection
//!
//! Selection is pure over a candidate list and a caller-supplied RNG, so
//! the plan orchestrator fully controls determinism. Allergy and dislike
//! filters are hard; the liked-food narrowing and the anti-repeat
//! exclusion are soft and back off rather than empty the pool. An
//! exhausted pool resolves to a fixed fallback pick, never an error.

use crate::repositories::{FoodCandidate, WorkoutCandidate};
use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed diet pick used when the catalog yields no candidates.
const FALLBACK_MENU: &str = "닭가슴살 샐러드";
const FALLBACK_MENU_CALORIES: i64 = 450;
const FALLBACK_MENU_PROTEIN: i64 = 30;

/// Fixed workout pick used when the catalog yields no candidates.
const FALLBACK_WORKOUT: &str = "걷기";
const FALLBACK_WORKOUT_DURATION: i64 = 30;
const FALLBACK_WORKOUT_CALORIES: i64 = 120;

/// A selected menu, decoupled from the catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietPick {
    pub menu: String,
    pub calories: i64,
    pub protein: i64,
}

/// A selected workout, decoupled from the catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutPick {
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Drop foods whose allergy tags match one of the user's allergens.
/// Hard filter: an emptied pool falls through to the fixed fallback.
fn filter_allergies(candidates: Vec<FoodCandidate>, allergens: &[String]) -> Vec<FoodCandidate> {
    if allergens.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|food| !contains_any(food.allergy.as_deref().unwrap_or(""), allergens))
        .collect()
}

/// Drop foods whose name matches one of the user's dislikes. Hard
/// filter, like the allergy one.
fn filter_dislikes(candidates: Vec<FoodCandidate>, dislikes: &[String]) -> Vec<FoodCandidate> {
    if dislikes.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|food| !contains_any(&food.name, dislikes))
        .collect()
}

/// Drop entries whose name exactly matches a previously recommended one,
/// so a regeneration tends to produce something new. Ignored when every
/// candidate was already recommended.
fn exclude_previous<T, F>(candidates: Vec<T>, exclude: &[String], name_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    if exclude.is_empty() {
        return candidates;
    }

    let filtered: Vec<T> = candidates
        .iter()
        .filter(|c| !exclude.iter().any(|e| e == name_of(c)))
        .cloned()
        .collect();

    if filtered.is_empty() {
        candidates
    } else {
        filtered
    }
}

/// Narrow the pool to liked foods when any match; otherwise leave it as is.
fn prefer_liked(candidates: Vec<FoodCandidate>, likes: &[String]) -> Vec<FoodCandidate> {
    if likes.is_empty() {
        return candidates;
    }

    let liked: Vec<FoodCandidate> = candidates
        .iter()
        .filter(|food| contains_any(&food.name, likes))
        .cloned()
        .collect();

    if liked.is_empty() {
        candidates
    } else {
        liked
    }
}

/// Pick one menu for a meal slot.
///
/// Filter order: allergies, then dislikes, then the liked-food narrowing,
/// then the anti-repeat exclusion. The first two are hard, the last two
/// back off when they would empty the pool. An empty pool yields the
/// fixed fallback menu so a plan is never missing a meal.
pub fn select_diet(
    candidates: Vec<FoodCandidate>,
    likes: &[String],
    dislikes: &[String],
    allergens: &[String],
    exclude_menus: &[String],
    rng: &mut impl Rng,
) -> DietPick {
    let pool = exclude_previous(
        prefer_liked(
            filter_dislikes(filter_allergies(candidates, allergens), dislikes),
            likes,
        ),
        exclude_menus,
        |food| food.name.as_str(),
    );

    match pool.choose(rng) {
        Some(food) => DietPick {
            menu: food.name.clone(),
            calories: food.calories,
            protein: food.protein,
        },
        None => DietPick {
            menu: FALLBACK_MENU.to_string(),
            calories: FALLBACK_MENU_CALORIES,
            protein: FALLBACK_MENU_PROTEIN,
        },
    }
}

/// Pick one workout from the intensity-matched pool, avoiding the
/// previous day's picks when possible and falling back to a fixed walk
/// when the catalog is empty.
pub fn select_workout(
    candidates: Vec<WorkoutCandidate>,
    exclude_workouts: &[String],
    rng: &mut impl Rng,
) -> WorkoutPick {
    let pool = exclude_previous(candidates, exclude_workouts, |workout| {
        workout.name.as_str()
    });

    match pool.choose(rng) {
        Some(workout) => WorkoutPick {
            workout: workout.name.clone(),
            duration: workout.duration,
            calories: workout.calories,
        },
        None => WorkoutPick {
            workout: FALLBACK_WORKOUT.to_string(),
            duration: FALLBACK_WORKOUT_DURATION,
            calories: FALLBACK_WORKOUT_CALORIES,
        },
    }
}
