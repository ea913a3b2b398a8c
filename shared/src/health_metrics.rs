//! Nutrition goal calculations
//!
//! Derives daily calorie/protein/activity-burn targets from a user profile
//! and goal type.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Evidence-Based**: BMR via the Mifflin-St Jeor equation
//! 3. **Type Safety**: Strong typing prevents unit confusion
//!
//! Note: the daily calorie summary engine keeps its own BMR defaults and a
//! five-tier activity table. The two constant sets are intentionally kept
//! separate; see DESIGN.md.

use crate::types::{GoalType, Sex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default age when the profile has none
const DEFAULT_AGE_YEARS: i32 = 30;

/// Activity multipliers for target derivation, keyed by the profile's
/// three-tier `activity_level` column. Unknown values fall back to the
/// lowest tier.
const ACTIVITY_FACTOR_LOW: f64 = 1.2;
const ACTIVITY_FACTOR_MEDIUM: f64 = 1.55;
const ACTIVITY_FACTOR_HIGH: f64 = 1.75;

/// Profile inputs for target derivation. Height and weight are required;
/// everything else has a documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProfile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<i32>,
    pub sex: Option<Sex>,
    pub activity_level: Option<String>,
    pub goal: GoalType,
}

/// Derived daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: i64,
    pub protein: i64,
    pub activity_kcal: i64,
}

/// Errors from target derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalError {
    #[error("weight and height are required to derive nutrition targets")]
    MissingBodyMetrics,
}

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation.
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
/// Unknown sex uses the midpoint offset of -78.
pub fn calculate_bmr_mifflin(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: Option<Sex>,
) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        Some(Sex::Male) => base + 5.0,
        Some(Sex::Female) => base - 161.0,
        None => base - 78.0,
    }
}

/// Activity multiplier for the three-tier scheme used by target derivation
pub fn goal_activity_factor(activity_level: Option<&str>) -> f64 {
    match activity_level.map(str::to_lowercase).as_deref() {
        Some("medium") => ACTIVITY_FACTOR_MEDIUM,
        Some("high") => ACTIVITY_FACTOR_HIGH,
        _ => ACTIVITY_FACTOR_LOW,
    }
}

/// Derive daily calorie/protein/activity-burn targets from a profile.
///
/// - `loss`: TDEE - 400 kcal, protein 2.0 g/kg, 500 kcal activity target
/// - `gain`: TDEE + 300 kcal, protein 2.0 g/kg, 300 kcal activity target
/// - `maintain`: TDEE, protein 1.6 g/kg, 400 kcal activity target
pub fn compute_nutrition_goal(profile: &GoalProfile) -> Result<NutritionTargets, GoalError> {
    let weight = profile.weight_kg.filter(|w| *w > 0.0);
    let height = profile.height_cm.filter(|h| *h > 0.0);
    let (weight, height) = match (weight, height) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(GoalError::MissingBodyMetrics),
    };

    let age = profile.age_years.filter(|a| *a > 0).unwrap_or(DEFAULT_AGE_YEARS);
    let bmr = calculate_bmr_mifflin(weight, height, age, profile.sex);
    let tdee = bmr * goal_activity_factor(profile.activity_level.as_deref());

    let targets = match profile.goal {
        GoalType::Loss => NutritionTargets {
            calories: (tdee - 400.0) as i64,
            protein: (weight * 2.0) as i64,
            activity_kcal: 500,
        },
        GoalType::Gain => NutritionTargets {
            calories: (tdee + 300.0) as i64,
            protein: (weight * 2.0) as i64,
            activity_kcal: 300,
        },
        GoalType::Maintain => NutritionTargets {
            calories: tdee as i64,
            protein: (weight * 1.6) as i64,
            activity_kcal: 400,
        },
    };

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn profile(goal: GoalType) -> GoalProfile {
        GoalProfile {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30),
            sex: Some(Sex::Male),
            activity_level: Some("low".to_string()),
            goal,
        }
    }

    #[test]
    fn loss_goal_boundary_values() {
        // BMR = 10*70 + 6.25*175 - 5*30 + 5 = 1648.75
        // TDEE = 1648.75 * 1.2 = 1978.5
        let targets = compute_nutrition_goal(&profile(GoalType::Loss)).unwrap();
        assert_eq!(targets.calories, 1578); // int(1978.5 - 400)
        assert_eq!(targets.protein, 140);
        assert_eq!(targets.activity_kcal, 500);
    }

    #[test]
    fn gain_goal_adds_surplus() {
        let targets = compute_nutrition_goal(&profile(GoalType::Gain)).unwrap();
        assert_eq!(targets.calories, 2278); // int(1978.5 + 300)
        assert_eq!(targets.protein, 140);
        assert_eq!(targets.activity_kcal, 300);
    }

    #[test]
    fn maintain_goal_uses_tdee() {
        let targets = compute_nutrition_goal(&profile(GoalType::Maintain)).unwrap();
        assert_eq!(targets.calories, 1978);
        assert_eq!(targets.protein, 112); // int(70 * 1.6)
        assert_eq!(targets.activity_kcal, 400);
    }

    #[test]
    fn missing_weight_or_height_is_an_error() {
        let mut p = profile(GoalType::Loss);
        p.weight_kg = None;
        assert_eq!(
            compute_nutrition_goal(&p),
            Err(GoalError::MissingBodyMetrics)
        );

        let mut p = profile(GoalType::Loss);
        p.height_cm = Some(0.0);
        assert_eq!(
            compute_nutrition_goal(&p),
            Err(GoalError::MissingBodyMetrics)
        );
    }

    #[test]
    fn missing_age_defaults_to_thirty() {
        let mut p = profile(GoalType::Loss);
        p.age_years = None;
        let with_default = compute_nutrition_goal(&p).unwrap();
        assert_eq!(with_default, compute_nutrition_goal(&profile(GoalType::Loss)).unwrap());
    }

    #[test]
    fn unknown_sex_uses_neutral_offset() {
        assert_eq!(calculate_bmr_mifflin(70.0, 175.0, 30, None), 1565.75);
        // Midpoint between the male (+5) and female (-161) offsets
        let male = calculate_bmr_mifflin(70.0, 175.0, 30, Some(Sex::Male));
        let female = calculate_bmr_mifflin(70.0, 175.0, 30, Some(Sex::Female));
        assert_eq!(
            calculate_bmr_mifflin(70.0, 175.0, 30, None),
            (male + female) / 2.0
        );
    }

    #[rstest]
    #[case(Some("low"), 1.2)]
    #[case(Some("medium"), 1.55)]
    #[case(Some("HIGH"), 1.75)]
    #[case(Some("sedentary"), 1.2)] // five-tier key, not part of this table
    #[case(None, 1.2)]
    fn activity_factor_lookup(#[case] level: Option<&str>, #[case] expected: f64) {
        assert_eq!(goal_activity_factor(level), expected);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// For any valid profile, loss targets fewer calories than
            /// maintain, and maintain fewer than gain.
            #[test]
            fn goal_ordering_holds(
                weight in 40.0f64..200.0,
                height in 140.0f64..210.0,
                age in 18i32..90,
            ) {
                let base = GoalProfile {
                    weight_kg: Some(weight),
                    height_cm: Some(height),
                    age_years: Some(age),
                    sex: Some(Sex::Female),
                    activity_level: Some("medium".to_string()),
                    goal: GoalType::Loss,
                };
                let loss = compute_nutrition_goal(&base).unwrap();
                let maintain = compute_nutrition_goal(&GoalProfile { goal: GoalType::Maintain, ..base.clone() }).unwrap();
                let gain = compute_nutrition_goal(&GoalProfile { goal: GoalType::Gain, ..base.clone() }).unwrap();

                prop_assert!(loss.calories < maintain.calories);
                prop_assert!(maintain.calories < gain.calories);
            }

            /// Protein targets scale with body weight, never with height/age.
            #[test]
            fn protein_tracks_weight(
                weight in 40.0f64..200.0,
                height in 140.0f64..210.0,
            ) {
                let p = GoalProfile {
                    weight_kg: Some(weight),
                    height_cm: Some(height),
                    age_years: None,
                    sex: None,
                    activity_level: None,
                    goal: GoalType::Loss,
                };
                let targets = compute_nutrition_goal(&p).unwrap();
                prop_assert_eq!(targets.protein, (weight * 2.0) as i64);
            }
        }
    }
}
