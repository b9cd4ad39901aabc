//! # Sync Operations
//!
//! One [`SyncOperation`] is one record waiting to reach the remote store.
//!
//! The record itself lives in a [`SyncPayload`], a closed sum over the record
//! kinds the remote store accepts. The operation's [`OperationKind`] is
//! derived from the payload, so a workout can never be pushed through the
//! nutrition endpoint.
//!
//! Only `retry_count` changes after creation, and only the executor changes
//! it.

use bridge_traits::records::{NutritionRecord, ProfileRecord, WorkoutRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, SyncError};

/// Type-safe operation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Create a new random operation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an operation ID from a string
    pub fn from_string(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| SyncError::InvalidOperationId(e.to_string()))
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record kind carried by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Workout,
    Nutrition,
    UserProfile,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Nutrition => "nutrition",
            Self::UserProfile => "user_profile",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backlog priority
///
/// `High` jumps to the head of the backlog; `Normal` and `Low` are served in
/// submission order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Record to push, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SyncPayload {
    Workout(WorkoutRecord),
    Nutrition(NutritionRecord),
    UserProfile(ProfileRecord),
}

impl SyncPayload {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Workout(_) => OperationKind::Workout,
            Self::Nutrition(_) => OperationKind::Nutrition,
            Self::UserProfile(_) => OperationKind::UserProfile,
        }
    }
}

impl From<WorkoutRecord> for SyncPayload {
    fn from(record: WorkoutRecord) -> Self {
        Self::Workout(record)
    }
}

impl From<NutritionRecord> for SyncPayload {
    fn from(record: NutritionRecord) -> Self {
        Self::Nutrition(record)
    }
}

impl From<ProfileRecord> for SyncPayload {
    fn from(record: ProfileRecord) -> Self {
        Self::UserProfile(record)
    }
}

/// A unit of sync work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOperation {
    pub id: OperationId,
    pub payload: SyncPayload,
    pub priority: Priority,
    /// Retries already spent; never exceeds the engine's `max_retries`
    pub retry_count: u32,
    /// Diagnostics only; ordering comes from the backlog position
    pub created_at: DateTime<Utc>,
}

impl SyncOperation {
    pub fn new(payload: impl Into<SyncPayload>, priority: Priority, created_at: DateTime<Utc>) -> Self {
        Self {
            id: OperationId::new(),
            payload: payload.into(),
            priority,
            retry_count: 0,
            created_at,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.payload.kind()
    }
}

/// Proof that an operation reached the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReceipt {
    pub operation_id: OperationId,
    pub kind: OperationKind,
    /// Remote calls made, including the successful one
    pub attempts: u32,
    pub synced_at: DateTime<Utc>,
}

/// Result of one operation attempted by a drain
#[derive(Debug)]
pub struct SyncOutcome {
    pub operation_id: OperationId,
    pub kind: OperationKind,
    /// Retry count when the attempt ended
    pub retry_count: u32,
    pub result: Result<SyncReceipt>,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
