//! Payload validation run before any remote call.
//!
//! A rejected payload is terminal: the executor returns
//! [`SyncError::InvalidData`] without touching the remote store and without
//! spending a retry.

use bridge_traits::records::{NutritionRecord, ProfileRecord, WorkoutRecord};

use crate::error::{Result, SyncError};
use crate::operation::SyncPayload;

pub fn validate(payload: &SyncPayload) -> Result<()> {
    match payload {
        SyncPayload::Workout(record) => validate_workout(record),
        SyncPayload::Nutrition(record) => validate_nutrition(record),
        SyncPayload::UserProfile(record) => validate_profile(record),
    }
}

pub fn validate_workout(record: &WorkoutRecord) -> Result<()> {
    if !record.duration_seconds.is_finite() || record.duration_seconds <= 0.0 {
        return Err(invalid(format!(
            "workout {} has non-positive duration {}",
            record.id, record.duration_seconds
        )));
    }

    if record.exercises.is_empty() {
        return Err(invalid(format!("workout {} has no exercises", record.id)));
    }

    Ok(())
}

pub fn validate_nutrition(record: &NutritionRecord) -> Result<()> {
    // Macros other than calories are free-form.
    if !record.calories.is_finite() || record.calories < 0.0 {
        return Err(invalid(format!(
            "nutrition {} has invalid calories {}",
            record.id, record.calories
        )));
    }

    Ok(())
}

pub fn validate_profile(record: &ProfileRecord) -> Result<()> {
    if record.user_id.is_empty() {
        return Err(invalid("profile has empty user id".to_string()));
    }

    Ok(())
}

fn invalid(reason: String) -> SyncError {
    SyncError::InvalidData(reason)
}
