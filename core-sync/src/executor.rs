//! # Sync Executor
//!
//! Runs one operation against the remote store.
//!
//! ## Workflow
//!
//! 1. Fail with `Offline` when the engine is offline
//! 2. Claim the operation id in the active-set, or fail with `AlreadyInProgress`
//! 3. Validate the payload; a rejection is terminal and never reaches the store
//! 4. Push the record through the `RemoteStore` method for its kind
//! 5. On failure, spend a retry and wait `backoff_base * 2^retry_count`, then
//!    go back to the connectivity check; once `max_retries` retries are spent
//!    the next failure ends with `MaxRetriesExceeded`
//!
//! The caller sees one result per submission, whatever the number of
//! attempts. Backoff waits end early with `Cancelled` when the engine stops.

use bridge_traits::{Clock, RemoteStore};
use core_async::sync::CancellationToken;
use core_async::time::sleep;
use core_runtime::events::{CoreEvent, EventBus, SyncEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::operation::{SyncOperation, SyncPayload, SyncReceipt};
use crate::state::SharedState;
use crate::validation;

#[derive(Clone)]
pub(crate) struct SyncExecutor {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    state: SharedState,
    event_bus: EventBus,
    config: SyncConfig,
}

impl SyncExecutor {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        clock: Arc<dyn Clock>,
        state: SharedState,
        event_bus: EventBus,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            clock,
            state,
            event_bus,
            config,
        }
    }

    /// Executes `operation`, updating its `retry_count` in place.
    pub async fn execute(&self, operation: &mut SyncOperation) -> Result<SyncReceipt> {
        if !self.state.is_online() {
            return Err(SyncError::Offline);
        }

        if operation.retry_count > self.config.max_retries {
            return Err(SyncError::MaxRetriesExceeded {
                attempts: 0,
                last_error: format!(
                    "retry count {} already above ceiling {}",
                    operation.retry_count, self.config.max_retries
                ),
            });
        }

        let _active = self.state.try_acquire(operation.id).ok_or_else(|| {
            SyncError::AlreadyInProgress {
                operation_id: operation.id.to_string(),
            }
        })?;

        validation::validate(&operation.payload)?;

        let shutdown = self.state.shutdown_token();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug!(
                operation_id = %operation.id,
                kind = %operation.kind(),
                attempt = attempts,
                "Pushing record"
            );

            let error = match self.push(&operation.payload).await {
                Ok(()) => return Ok(self.complete(operation, attempts)),
                Err(e) => e,
            };

            if operation.retry_count >= self.config.max_retries {
                warn!(
                    operation_id = %operation.id,
                    kind = %operation.kind(),
                    attempts,
                    error = %error,
                    "Retry ceiling reached"
                );
                return Err(SyncError::MaxRetriesExceeded {
                    attempts,
                    last_error: error.to_string(),
                });
            }

            operation.retry_count += 1;
            let delay = self.config.backoff_delay(operation.retry_count);
            warn!(
                operation_id = %operation.id,
                retry_count = operation.retry_count,
                backoff_ms = delay.as_millis() as u64,
                error = %error,
                "Remote push failed, backing off"
            );
            self.event_bus
                .emit(CoreEvent::Sync(SyncEvent::RetryScheduled {
                    operation_id: operation.id.to_string(),
                    retry_count: operation.retry_count,
                    delay_ms: delay.as_millis() as u64,
                    message: error.to_string(),
                }))
                .ok();

            wait_or_cancel(&shutdown, delay).await?;

            if !self.state.is_online() {
                return Err(SyncError::Offline);
            }
        }
    }

    async fn push(&self, payload: &SyncPayload) -> Result<()> {
        let result = match payload {
            SyncPayload::Workout(record) => self.store.push_workout(record).await,
            SyncPayload::Nutrition(record) => self.store.push_nutrition(record).await,
            SyncPayload::UserProfile(record) => self.store.push_profile(record).await,
        };
        result.map_err(|e| SyncError::Remote(e.to_string()))
    }

    fn complete(&self, operation: &SyncOperation, attempts: u32) -> SyncReceipt {
        let synced_at = self.clock.now();
        self.state.record_success(synced_at);

        info!(
            operation_id = %operation.id,
            kind = %operation.kind(),
            attempts,
            "Operation synced"
        );
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::Succeeded {
                operation_id: operation.id.to_string(),
                kind: operation.kind().as_str().to_string(),
                attempts,
            }))
            .ok();

        SyncReceipt {
            operation_id: operation.id,
            kind: operation.kind(),
            attempts,
            synced_at,
        }
    }
}

async fn wait_or_cancel(shutdown: &CancellationToken, delay: std::time::Duration) -> Result<()> {
    core_async::select! {
        _ = shutdown.cancelled() => Err(SyncError::Cancelled),
        _ = sleep(delay) => Ok(()),
    }
}
