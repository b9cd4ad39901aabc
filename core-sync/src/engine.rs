//! # Sync Engine
//!
//! Public entry point tying the backlog, executor, dispatcher and
//! connectivity tracker together.
//!
//! ## Overview
//!
//! The engine is an explicitly owned component. Hosts build one from a
//! [`CoreConfig`] and hand it (usually behind an `Arc`) to the producers that
//! record workouts, meals and profile changes.
//!
//! Producers either sync immediately ([`SyncEngine::sync_workout`] and
//! friends), which returns one result per record, or defer
//! ([`SyncEngine::queue_for_sync`]), which returns at once and leaves the
//! record to the next drain.
//!
//! ## Drains
//!
//! - **Periodic**: every `periodic_interval` while started, when online and
//!   the backlog is non-empty, one batch of `periodic_batch_size`
//! - **Connectivity**: the same batch right after an offline→online
//!   transition
//! - **Manual**: [`SyncEngine::process_pending_sync`], one batch
//! - **Forced**: [`SyncEngine::force_sync`], batches of `force_batch_size`
//!   until the backlog is empty
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_runtime::config::CoreConfig;
//! use core_sync::{Priority, SyncConfig, SyncEngine};
//! use std::sync::Arc;
//!
//! # async fn example(store: Arc<dyn bridge_traits::RemoteStore>) -> core_sync::Result<()> {
//! let core = CoreConfig::builder().remote_store(store).build()?;
//! let engine = SyncEngine::new(core, SyncConfig::default())?;
//! engine.start().await?;
//!
//! engine.queue_for_sync(nutrition_log, Priority::High);
//! let receipt = engine.sync_workout(workout).await?;
//!
//! engine.update_online_status(false).await;
//! let status = engine.get_sync_status();
//! println!("{} operations waiting", status.pending_operations);
//!
//! engine.stop().await;
//! # Ok(())
//! # }
//! ```

use bridge_traits::records::{NutritionRecord, ProfileRecord, WorkoutRecord};
use bridge_traits::{Clock, NetworkMonitor};
use core_async::sync::{CancellationToken, Mutex};
use core_async::task::{self, JoinHandle};
use core_async::time::{interval_at, Instant, MissedTickBehavior};
use core_runtime::config::{CoreConfig, FeatureFlags};
use core_runtime::events::{CoreEvent, DrainTrigger, EventBus, EventStream, SyncEvent};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::SyncConfig;
use crate::connectivity::{self, ConnectivityTracker};
use crate::dispatcher::Dispatcher;
use crate::error::{Result, SyncError};
use crate::executor::SyncExecutor;
use crate::operation::{OperationId, Priority, SyncOperation, SyncOutcome, SyncPayload, SyncReceipt};
use crate::state::SharedState;
use crate::status::SyncStatus;

/// Background tasks owned by a started engine
struct Lifecycle {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

/// Offline-capable sync engine
pub struct SyncEngine {
    config: SyncConfig,
    features: FeatureFlags,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    state: SharedState,
    dispatcher: Dispatcher,
    connectivity: ConnectivityTracker,
    lifecycle: Mutex<Option<Lifecycle>>,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Errors
    ///
    /// `SyncError::Config` when `config` fails validation, or
    /// `SyncError::Runtime` when `core` is inconsistent.
    pub fn new(core: CoreConfig, config: SyncConfig) -> Result<Self> {
        config.validate()?;
        core.validate()?;

        let state = SharedState::new(config.initially_online);
        let executor = SyncExecutor::new(
            core.remote_store,
            Arc::clone(&core.clock),
            state.clone(),
            core.event_bus.clone(),
            config.clone(),
        );
        let dispatcher = Dispatcher::new(executor, state.clone(), core.event_bus.clone());
        let connectivity = ConnectivityTracker::new(
            state.clone(),
            dispatcher.clone(),
            core.event_bus.clone(),
            config.periodic_batch_size,
        );

        Ok(Self {
            config,
            features: core.features,
            clock: core.clock,
            event_bus: core.event_bus,
            network_monitor: core.network_monitor,
            state,
            dispatcher,
            connectivity,
            lifecycle: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Starts the background work.
    ///
    /// Seeds connectivity from the `NetworkMonitor` when network awareness is
    /// enabled, then spawns the periodic drain (if background sync is
    /// enabled) and the network watcher.
    ///
    /// # Errors
    ///
    /// `SyncError::AlreadyStarted` if the engine is running.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.is_some() {
            return Err(SyncError::AlreadyStarted);
        }

        let shutdown = CancellationToken::new();
        self.state.with(|state| state.shutdown = shutdown.clone());

        let mut tasks = Vec::new();

        if let Some(monitor) = self.watched_monitor() {
            let online = monitor.is_connected().await;
            self.connectivity.set_online(online);

            tasks.push(task::spawn(connectivity::watch_network(
                self.connectivity.clone(),
                monitor,
                shutdown.clone(),
            )));
        }

        if self.features.enable_background_sync {
            tasks.push(task::spawn(run_periodic_drain(
                self.dispatcher.clone(),
                self.state.clone(),
                self.config.clone(),
                shutdown.clone(),
            )));
        }

        info!(
            background_sync = self.features.enable_background_sync,
            network_awareness = self.features.enable_network_awareness,
            online = self.state.is_online(),
            "Sync engine started"
        );

        *lifecycle = Some(Lifecycle { shutdown, tasks });
        Ok(())
    }

    /// Stops the background work and cancels in-flight backoff waits.
    ///
    /// A stopped engine still accepts producer calls and can be started
    /// again; until then, a failed push ends with `SyncError::Cancelled`
    /// instead of backing off. Calling `stop` on an engine that is not
    /// running does nothing.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let Some(Lifecycle { shutdown, tasks }) = self.lifecycle.lock().await.take() else {
            return;
        };

        shutdown.cancel();
        for handle in tasks {
            if let Err(e) = handle.await {
                warn!(error = %e, "Background sync task ended abnormally");
            }
        }

        info!(pending = self.state.pending(), "Sync engine stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.lifecycle.lock().await.is_some()
    }

    /// Pushes a workout now.
    ///
    /// While offline the workout is queued and `SyncError::Offline` is
    /// returned.
    #[instrument(skip(self, record), fields(record_id = %record.id))]
    pub async fn sync_workout(&self, record: WorkoutRecord) -> Result<SyncReceipt> {
        self.sync_operation(self.new_operation(record.into(), Priority::Normal))
            .await
    }

    /// Pushes a nutrition log now.
    #[instrument(skip(self, record), fields(record_id = %record.id))]
    pub async fn sync_nutrition(&self, record: NutritionRecord) -> Result<SyncReceipt> {
        self.sync_operation(self.new_operation(record.into(), Priority::Normal))
            .await
    }

    /// Pushes a profile update now.
    #[instrument(skip(self, record))]
    pub async fn sync_profile(&self, record: ProfileRecord) -> Result<SyncReceipt> {
        self.sync_operation(self.new_operation(record.into(), Priority::Normal))
            .await
    }

    /// Executes a pre-built operation outside the backlog.
    ///
    /// The operation enters the backlog only if the attempt fails with
    /// `SyncError::Offline` or `SyncError::Cancelled`.
    #[instrument(skip(self, operation), fields(operation_id = %operation.id, kind = %operation.kind()))]
    pub async fn sync_operation(&self, operation: SyncOperation) -> Result<SyncReceipt> {
        self.dispatcher.dispatch_one(operation).await
    }

    /// Adds a record to the backlog for the next drain.
    pub fn queue_for_sync(&self, payload: impl Into<SyncPayload>, priority: Priority) -> OperationId {
        let operation = self.new_operation(payload.into(), priority);
        self.enqueue(operation)
    }

    /// Adds a pre-built operation to the backlog.
    pub fn enqueue(&self, operation: SyncOperation) -> OperationId {
        let (id, kind, priority) = (operation.id, operation.kind(), operation.priority);
        let pending = self.state.enqueue(operation);

        info!(
            operation_id = %id,
            kind = %kind,
            priority = priority.as_str(),
            pending,
            "Operation queued for sync"
        );
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::Queued {
                operation_id: id.to_string(),
                kind: kind.as_str().to_string(),
                priority: priority.as_str().to_string(),
                pending,
            }))
            .ok();

        id
    }

    /// Drains one batch of `periodic_batch_size` operations.
    #[instrument(skip(self))]
    pub async fn process_pending_sync(&self) -> Vec<SyncOutcome> {
        self.dispatcher
            .drain_once(self.config.periodic_batch_size, DrainTrigger::Manual)
            .await
    }

    /// Drains the whole backlog in batches of `force_batch_size`.
    ///
    /// Returns one outcome per attempted operation. Stops early if the
    /// engine goes offline; anything left stays queued.
    #[instrument(skip(self))]
    pub async fn force_sync(&self) -> Vec<SyncOutcome> {
        self.dispatcher
            .drain_all(self.config.force_batch_size, DrainTrigger::Forced)
            .await
    }

    /// Connectivity entry point for hosts.
    ///
    /// Returns `true` when the call moved the engine from offline to online,
    /// in which case a drain has been spawned. Repeating the current value
    /// does nothing.
    #[instrument(skip(self))]
    pub async fn update_online_status(&self, online: bool) -> bool {
        self.connectivity.set_online(online).is_some()
    }

    pub fn get_sync_status(&self) -> SyncStatus {
        self.state.snapshot()
    }

    /// Subscribes to engine events.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    fn new_operation(&self, payload: SyncPayload, priority: Priority) -> SyncOperation {
        SyncOperation::new(payload, priority, self.clock.now())
    }

    fn watched_monitor(&self) -> Option<Arc<dyn NetworkMonitor>> {
        if self.features.enable_network_awareness {
            self.network_monitor.clone()
        } else {
            None
        }
    }
}

/// Periodic backlog drain.
///
/// Runs one drain per tick, inline, so ticks never overlap. The first tick
/// fires one full period after start.
async fn run_periodic_drain(
    dispatcher: Dispatcher,
    state: SharedState,
    config: SyncConfig,
    shutdown: CancellationToken,
) {
    let period = config.periodic_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        core_async::select! {
            _ = shutdown.cancelled() => {
                debug!("Periodic sync stopped");
                break;
            }
            _ = ticker.tick() => {
                if !state.is_online() || state.pending() == 0 {
                    debug!("Nothing to drain on periodic tick");
                    continue;
                }

                dispatcher
                    .drain_once(config.periodic_batch_size, DrainTrigger::Periodic)
                    .await;
            }
        }
    }
}
