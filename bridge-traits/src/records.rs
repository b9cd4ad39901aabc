//! Record types accepted by the remote store.
//!
//! These are the wire-agnostic shapes of the records the host produces. The
//! core validates them before pushing but otherwise treats them as opaque.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    /// Free-form activity label (e.g. "strength", "running")
    pub activity_type: String,
    /// Total session length; must be positive
    pub duration_seconds: f64,
    /// Must contain at least one exercise
    pub exercises: Vec<ExerciseRecord>,
    pub completed_at: DateTime<Utc>,
}

/// One exercise within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub name: String,
    pub sets: u32,
    /// Repetitions per set
    pub reps: Vec<u32>,
    /// Load per set, in kilograms
    pub weight: Vec<f64>,
}

/// A day's nutrition log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meals: Vec<MealRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub name: String,
    pub foods: Vec<FoodRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: f64,
}

/// User profile update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Must not be empty
    pub user_id: String,
    pub name: String,
    pub age: u32,
    /// Body weight in kilograms
    pub weight: f64,
    /// Height in centimetres
    pub height: f64,
    pub fitness_goals: Vec<String>,
}

impl NutritionRecord {
    /// Sum of the calories of every food across all meals.
    pub fn meal_calories(&self) -> f64 {
        self.meals
            .iter()
            .flat_map(|meal| meal.foods.iter())
            .map(|food| food.calories)
            .sum()
    }
}
