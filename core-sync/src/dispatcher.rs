//! # Dispatcher
//!
//! Turns the backlog into concurrent executions.
//!
//! Every attempted operation runs in its own task. A batch is pulled from
//! the backlog under the state lock, each operation is handed to the
//! executor concurrently (the batch size is the only concurrency bound) and
//! the results are collected in batch order.
//!
//! ## Failure handling
//!
//! The executor has already spent the retry budget by the time a failure
//! reaches the dispatcher, so failures are settled here:
//!
//! - `Offline` goes back into the backlog. The operation was never pushed
//!   (or connectivity dropped between retries) and the next
//!   offline→online transition drains it again. `Cancelled` (the engine
//!   stopped during a backoff wait) goes back the same way. Re-queueing
//!   follows the normal priority rules: a `High` operation returns to the
//!   head, a `Normal` or `Low` one to the tail, behind anything submitted
//!   while it was running.
//! - `AlreadyInProgress` rejects a duplicate submission only. The running
//!   execution settles on its own, so nothing is counted or published.
//! - Everything else is terminal for the operation. It is counted in
//!   `total_failed`, published as `SyncEvent::Failed { terminal: true }` and
//!   dropped. There is no re-queue of remote failures after the retry
//!   ceiling.
//!
//! Settling happens inside the spawned task, so an outcome is recorded even
//! when the caller stops waiting for it (a dropped `force_sync`, a timed
//! out immediate sync).
//!
//! A panic inside the remote store is contained by the task boundary and
//! reported as `SyncError::Task`; the active-set entry is released during
//! the unwind.

use core_async::task::{self, describe_join_error};
use core_runtime::events::{CoreEvent, DrainTrigger, EventBus, SyncEvent};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::executor::SyncExecutor;
use crate::operation::{OperationId, OperationKind, SyncOperation, SyncOutcome, SyncReceipt};
use crate::state::SharedState;

#[derive(Clone)]
pub(crate) struct Dispatcher {
    executor: SyncExecutor,
    state: SharedState,
    event_bus: EventBus,
}

impl Dispatcher {
    pub fn new(executor: SyncExecutor, state: SharedState, event_bus: EventBus) -> Self {
        Self {
            executor,
            state,
            event_bus,
        }
    }

    /// Pulls one batch of at most `batch_size` operations and executes it.
    ///
    /// Does nothing while offline or when the backlog is empty.
    pub async fn drain_once(&self, batch_size: usize, trigger: DrainTrigger) -> Vec<SyncOutcome> {
        if !self.state.is_online() {
            debug!(trigger = %trigger, "Offline, skipping drain");
            return Vec::new();
        }

        let batch = self.state.dequeue_batch(batch_size);
        if batch.is_empty() {
            return Vec::new();
        }

        info!(trigger = %trigger, batch_size = batch.len(), "Draining sync backlog");
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::DrainStarted {
                trigger,
                batch_size: batch.len(),
            }))
            .ok();

        let attempts = batch.into_iter().map(|operation| self.run(operation));
        let outcomes = join_all(attempts).await;

        let succeeded = outcomes.iter().filter(|outcome| outcome.is_success()).count();
        let failed = outcomes.len() - succeeded;
        let remaining = self.state.pending();

        info!(
            trigger = %trigger,
            succeeded,
            failed,
            remaining,
            "Drain finished"
        );
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::DrainCompleted {
                trigger,
                succeeded,
                failed,
                remaining,
            }))
            .ok();

        outcomes
    }

    /// Drains batch after batch until the backlog is empty.
    ///
    /// Stops after a batch that sent an operation back to the backlog, so a
    /// lost connection or a stopped engine cannot spin the loop.
    pub async fn drain_all(&self, batch_size: usize, trigger: DrainTrigger) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::new();

        loop {
            let batch = self.drain_once(batch_size, trigger).await;
            if batch.is_empty() {
                break;
            }

            let requeued = batch.iter().any(|outcome| {
                matches!(outcome.result, Err(SyncError::Offline | SyncError::Cancelled))
            });
            outcomes.extend(batch);

            if requeued {
                debug!(trigger = %trigger, pending = self.state.pending(), "Stopping drain early");
                break;
            }
        }

        outcomes
    }

    /// Executes one operation outside the backlog and returns its result.
    ///
    /// The operation only enters the backlog when the attempt fails with
    /// `Offline` or `Cancelled`.
    pub async fn dispatch_one(&self, operation: SyncOperation) -> Result<SyncReceipt> {
        self.run(operation).await.result
    }

    async fn run(&self, operation: SyncOperation) -> SyncOutcome {
        let (id, kind, retry_count) = (operation.id, operation.kind(), operation.retry_count);
        let dispatcher = self.clone();

        let handle = task::spawn(async move { dispatcher.execute_and_settle(operation).await });

        handle.await.unwrap_or_else(|join_error| SyncOutcome {
            operation_id: id,
            kind,
            retry_count,
            result: Err(SyncError::Task(describe_join_error(&join_error))),
        })
    }

    /// Runs the executor in its own task and records the result.
    async fn execute_and_settle(&self, mut operation: SyncOperation) -> SyncOutcome {
        let (id, kind, retry_count) = (operation.id, operation.kind(), operation.retry_count);
        let executor = self.executor.clone();

        let handle = task::spawn(async move {
            let result = executor.execute(&mut operation).await;
            (operation, result)
        });

        match handle.await {
            Ok((operation, result)) => self.settle(operation, result),
            Err(join_error) => {
                let error = SyncError::Task(describe_join_error(&join_error));
                self.record_terminal(id, kind, &error);
                SyncOutcome {
                    operation_id: id,
                    kind,
                    retry_count,
                    result: Err(error),
                }
            }
        }
    }

    fn settle(&self, operation: SyncOperation, result: Result<SyncReceipt>) -> SyncOutcome {
        let (id, kind, retry_count) = (operation.id, operation.kind(), operation.retry_count);

        match &result {
            Ok(_) => {}
            Err(error @ (SyncError::Offline | SyncError::Cancelled)) => {
                let message = error.to_string();
                let pending = self.state.enqueue(operation);
                info!(
                    operation_id = %id,
                    kind = %kind,
                    retry_count,
                    pending,
                    reason = %message,
                    "Operation returned to backlog"
                );
                self.event_bus
                    .emit(CoreEvent::Sync(SyncEvent::Failed {
                        operation_id: id.to_string(),
                        kind: kind.as_str().to_string(),
                        message,
                        terminal: false,
                    }))
                    .ok();
            }
            Err(SyncError::AlreadyInProgress { .. }) => {
                debug!(operation_id = %id, kind = %kind, "Duplicate submission rejected");
            }
            Err(error) => self.record_terminal(id, kind, error),
        }

        SyncOutcome {
            operation_id: id,
            kind,
            retry_count,
            result,
        }
    }

    fn record_terminal(&self, id: OperationId, kind: OperationKind, error: &SyncError) {
        self.state.record_failure();
        warn!(operation_id = %id, kind = %kind, error = %error, "Operation failed");
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::Failed {
                operation_id: id.to_string(),
                kind: kind.as_str().to_string(),
                message: error.to_string(),
                terminal: true,
            }))
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::operation::Priority;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::records::{NutritionRecord, ProfileRecord, WorkoutRecord};
    use bridge_traits::{RemoteStore, SystemClock};
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    /// Accepts every profile except the ones whose user id starts with "fail"
    /// or "panic".
    struct ProfileStore;

    #[async_trait]
    impl RemoteStore for ProfileStore {
        async fn push_workout(&self, _record: &WorkoutRecord) -> BridgeResult<()> {
            Ok(())
        }

        async fn push_nutrition(&self, _record: &NutritionRecord) -> BridgeResult<()> {
            Ok(())
        }

        async fn push_profile(&self, record: &ProfileRecord) -> BridgeResult<()> {
            if record.user_id.starts_with("panic") {
                panic!("store bug");
            }
            if record.user_id.starts_with("fail") {
                return Err(BridgeError::Rejected {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn dispatcher(online: bool) -> (Dispatcher, SharedState, EventBus) {
        let state = SharedState::new(online);
        let bus = EventBus::new(64);
        let config = SyncConfig {
            backoff_base: Duration::from_millis(1),
            ..SyncConfig::default()
        };
        let executor = SyncExecutor::new(
            Arc::new(ProfileStore),
            Arc::new(SystemClock),
            state.clone(),
            bus.clone(),
            config,
        );
        (Dispatcher::new(executor, state.clone(), bus.clone()), state, bus)
    }

    fn profile_op(user_id: &str) -> SyncOperation {
        SyncOperation::new(
            ProfileRecord {
                user_id: user_id.to_string(),
                name: "Alex".to_string(),
                age: 28,
                weight: 65.0,
                height: 170.0,
                fitness_goals: Vec::new(),
            },
            Priority::Normal,
            Utc::now(),
        )
    }

    #[core_async::test]
    async fn test_drain_offline_is_noop() {
        let (dispatcher, state, _bus) = dispatcher(false);
        state.enqueue(profile_op("u-1"));

        assert!(dispatcher.drain_once(10, DrainTrigger::Manual).await.is_empty());
        assert_eq!(state.pending(), 1);
    }

    #[core_async::test]
    async fn test_drain_respects_batch_size() {
        let (dispatcher, state, _bus) = dispatcher(true);
        for i in 0..7 {
            state.enqueue(profile_op(&format!("u-{i}")));
        }

        let outcomes = dispatcher.drain_once(5, DrainTrigger::Forced).await;
        assert_eq!(outcomes.len(), 5);
        assert_eq!(state.pending(), 2);

        let rest = dispatcher.drain_all(5, DrainTrigger::Forced).await;
        assert_eq!(rest.len(), 2);
        assert_eq!(state.snapshot().total_synced, 7);
    }

    #[core_async::test]
    async fn test_terminal_failures_are_dropped() {
        let (dispatcher, state, bus) = dispatcher(true);
        let mut events = bus.subscribe();
        state.enqueue(profile_op("fail-1"));
        state.enqueue(profile_op("u-2"));

        let outcomes = dispatcher.drain_once(10, DrainTrigger::Manual).await;
        assert!(matches!(
            outcomes[0].result,
            Err(SyncError::MaxRetriesExceeded { attempts: 4, .. })
        ));
        assert_eq!(outcomes[0].retry_count, 3);
        assert!(outcomes[1].is_success());

        let status = state.snapshot();
        assert_eq!(status.pending_operations, 0);
        assert_eq!(status.total_failed, 1);

        let mut saw_terminal = false;
        while let Ok(event) = events.try_recv() {
            if let CoreEvent::Sync(SyncEvent::Failed { terminal, .. }) = event {
                saw_terminal = terminal;
            }
        }
        assert!(saw_terminal);
    }

    #[core_async::test]
    async fn test_panicking_store_is_contained() {
        let (dispatcher, state, _bus) = dispatcher(true);

        let result = dispatcher.dispatch_one(profile_op("panic-1")).await;
        assert!(matches!(result, Err(SyncError::Task(_))));

        let status = state.snapshot();
        assert_eq!(status.active_operations, 0);
        assert_eq!(status.total_failed, 1);
    }

    #[core_async::test]
    async fn test_dispatch_one_offline_requeues() {
        let (dispatcher, state, _bus) = dispatcher(false);

        let result = dispatcher.dispatch_one(profile_op("u-1")).await;
        assert!(matches!(result, Err(SyncError::Offline)));
        assert_eq!(state.pending(), 1);
        assert_eq!(state.snapshot().total_failed, 0);
    }

    #[core_async::test]
    async fn test_duplicate_is_not_counted_as_failure() {
        let (dispatcher, state, bus) = dispatcher(true);
        let mut events = bus.subscribe();
        let op = profile_op("u-1");
        let _running = state.try_acquire(op.id).expect("first acquire");

        let result = dispatcher.dispatch_one(op).await;
        assert!(matches!(result, Err(SyncError::AlreadyInProgress { .. })));

        let status = state.snapshot();
        assert_eq!(status.total_failed, 0);
        assert_eq!(status.pending_operations, 0);
        assert!(events.try_recv().is_err());
    }

    #[core_async::test]
    async fn test_requeued_normal_operation_goes_to_tail() {
        let (dispatcher, state, _bus) = dispatcher(false);
        let waiting = profile_op("u-1");
        let waiting_id = waiting.id;
        state.enqueue(waiting);

        let late = profile_op("u-2");
        let late_id = late.id;
        assert!(matches!(
            dispatcher.dispatch_one(late).await,
            Err(SyncError::Offline)
        ));

        let order: Vec<_> = state.dequeue_batch(10).iter().map(|op| op.id).collect();
        assert_eq!(order, vec![waiting_id, late_id]);
    }

    #[core_async::test]
    async fn test_dispatch_one_success_skips_backlog() {
        let (dispatcher, state, _bus) = dispatcher(true);

        let receipt = dispatcher.dispatch_one(profile_op("u-1")).await.unwrap();
        assert_eq!(receipt.attempts, 1);
        assert_eq!(state.pending(), 0);
    }
}
