//! Serialized engine state.
//!
//! The backlog, the active-set, the connectivity flag and the last sync time
//! sit behind one lock. Every mutation is a short critical section and the
//! lock is never held across an `.await`; remote calls and backoff waits run
//! outside it.

use chrono::{DateTime, Utc};
use core_async::sync::CancellationToken;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::operation::{OperationId, SyncOperation};
use crate::queue::SyncQueue;
use crate::status::SyncStatus;

#[derive(Debug)]
pub(crate) struct EngineState {
    pub queue: SyncQueue,
    pub active: HashSet<OperationId>,
    pub online: bool,
    pub last_sync_date: Option<DateTime<Utc>>,
    pub total_synced: u64,
    pub total_failed: u64,
    /// Cancelled by `SyncEngine::stop`
    pub shutdown: CancellationToken,
}

#[derive(Debug, Clone)]
pub(crate) struct SharedState {
    inner: Arc<Mutex<EngineState>>,
}

impl SharedState {
    pub fn new(online: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineState {
                queue: SyncQueue::new(),
                active: HashSet::new(),
                online,
                last_sync_date: None,
                total_synced: 0,
                total_failed: 0,
                shutdown: CancellationToken::new(),
            })),
        }
    }

    /// Runs `f` inside the critical section.
    ///
    /// A panic while the lock was held leaves the state consistent (every
    /// section is a handful of field updates), so poisoning is ignored.
    pub fn with<R>(&self, f: impl FnOnce(&mut EngineState) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn is_online(&self) -> bool {
        self.with(|state| state.online)
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.with(|state| state.shutdown.clone())
    }

    /// Adds an operation to the backlog and returns the new backlog size.
    pub fn enqueue(&self, operation: SyncOperation) -> usize {
        self.with(|state| {
            state.queue.enqueue(operation);
            state.queue.len()
        })
    }

    pub fn dequeue_batch(&self, max_count: usize) -> Vec<SyncOperation> {
        self.with(|state| state.queue.dequeue_batch(max_count))
    }

    pub fn pending(&self) -> usize {
        self.with(|state| state.queue.len())
    }

    pub fn record_success(&self, synced_at: DateTime<Utc>) {
        self.with(|state| {
            state.last_sync_date = Some(synced_at);
            state.total_synced += 1;
        });
    }

    pub fn record_failure(&self) {
        self.with(|state| state.total_failed += 1);
    }

    /// Marks `id` as executing.
    ///
    /// Returns `None` when the id is already executing. The returned guard
    /// removes the id when dropped, including during a panic unwind.
    pub fn try_acquire(&self, id: OperationId) -> Option<ActiveGuard> {
        let inserted = self.with(|state| state.active.insert(id));
        inserted.then(|| ActiveGuard {
            state: self.clone(),
            id,
        })
    }

    pub fn snapshot(&self) -> SyncStatus {
        self.with(|state| SyncStatus {
            is_online: state.online,
            pending_operations: state.queue.len(),
            active_operations: state.active.len(),
            last_sync_date: state.last_sync_date,
            total_synced: state.total_synced,
            total_failed: state.total_failed,
        })
    }
}

/// Scoped active-set membership
pub(crate) struct ActiveGuard {
    state: SharedState,
    id: OperationId,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let id = self.id;
        self.state.with(|state| state.active.remove(&id));
        debug!(operation_id = %id, "Released active operation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_guard_is_exclusive() {
        let state = SharedState::new(true);
        let id = OperationId::new();

        let guard = state.try_acquire(id).expect("first acquire");
        assert!(state.try_acquire(id).is_none());
        assert_eq!(state.snapshot().active_operations, 1);

        drop(guard);
        assert_eq!(state.snapshot().active_operations, 0);
        assert!(state.try_acquire(id).is_some());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let state = SharedState::new(true);
        let id = OperationId::new();

        let cloned = state.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = cloned.try_acquire(id).unwrap();
            panic!("remote store blew up");
        }));

        assert!(result.is_err());
        assert_eq!(state.snapshot().active_operations, 0);
    }

    #[test]
    fn test_record_success_updates_snapshot() {
        let state = SharedState::new(false);
        let at = Utc::now();
        state.record_success(at);
        state.record_failure();

        let status = state.snapshot();
        assert!(!status.is_online);
        assert_eq!(status.last_sync_date, Some(at));
        assert_eq!(status.total_synced, 1);
        assert_eq!(status.total_failed, 1);
    }
}
