//! Remote Store Abstraction
//!
//! The backend the sync engine pushes records to.

use async_trait::async_trait;

use crate::{
    error::Result,
    records::{NutritionRecord, ProfileRecord, WorkoutRecord},
};

/// Remote store trait
///
/// One method per record kind. A call that returns `Ok` is treated as a
/// durable write; any `Err` is treated as a transient failure and retried
/// by the engine with exponential backoff. Conflict detection, if any, is the
/// store's responsibility (the engine assumes last-writer-wins).
///
/// Implementations are invoked concurrently for different records and must
/// not hold per-call state the engine relies on.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::remote::RemoteStore;
///
/// async fn push(store: &dyn RemoteStore, workout: &WorkoutRecord) {
///     if let Err(e) = store.push_workout(workout).await {
///         eprintln!("push failed: {e}");
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Persist a completed workout
    async fn push_workout(&self, record: &WorkoutRecord) -> Result<()>;

    /// Persist a nutrition log
    async fn push_nutrition(&self, record: &NutritionRecord) -> Result<()>;

    /// Persist a profile update
    async fn push_profile(&self, record: &ProfileRecord) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait]
        impl RemoteStore for Store {
            async fn push_workout(&self, record: &WorkoutRecord) -> Result<()>;
            async fn push_nutrition(&self, record: &NutritionRecord) -> Result<()>;
            async fn push_profile(&self, record: &ProfileRecord) -> Result<()>;
        }
    }

    fn profile() -> ProfileRecord {
        ProfileRecord {
            user_id: "user-1".to_string(),
            name: "Deniz".to_string(),
            age: 31,
            weight: 72.5,
            height: 178.0,
            fitness_goals: vec!["strength".to_string()],
        }
    }

    #[core_async::test]
    async fn test_store_is_object_safe() {
        let mut mock = MockStore::new();
        mock.expect_push_profile()
            .withf(|record| record.user_id == "user-1")
            .times(1)
            .returning(|_| Ok(()));

        let store: Box<dyn RemoteStore> = Box::new(mock);
        store.push_profile(&profile()).await.unwrap();
    }

    #[core_async::test]
    async fn test_store_error_propagates() {
        let mut mock = MockStore::new();
        mock.expect_push_profile()
            .returning(|_| Err(BridgeError::Unreachable("dns".to_string())));

        let err = mock.push_profile(&profile()).await.unwrap_err();
        assert!(err.to_string().contains("dns"));
    }
}
