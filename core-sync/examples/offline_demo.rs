//! Offline sync walkthrough
//!
//! Queues records while offline, reconnects and watches the backlog drain
//! against an in-memory remote store that fails every third push.
//!
//! Run with:
//! ```bash
//! cargo run -p core-sync --example offline_demo
//!
//! # JSON logs
//! cargo run -p core-sync --example offline_demo -- json
//! ```

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::records::{ExerciseRecord, NutritionRecord, ProfileRecord, WorkoutRecord};
use bridge_traits::time::{ConsoleLogger, LogLevel};
use bridge_traits::RemoteStore;
use chrono::Utc;
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, DrainTrigger, SyncEvent};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_sync::{Priority, SyncConfig, SyncEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Default)]
struct FlakyStore {
    calls: AtomicUsize,
}

impl FlakyStore {
    fn next_call(&self) -> BridgeResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call % 3 == 0 {
            return Err(BridgeError::Unreachable(format!("dropped request #{call}")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for FlakyStore {
    async fn push_workout(&self, _record: &WorkoutRecord) -> BridgeResult<()> {
        self.next_call()
    }

    async fn push_nutrition(&self, _record: &NutritionRecord) -> BridgeResult<()> {
        self.next_call()
    }

    async fn push_profile(&self, _record: &ProfileRecord) -> BridgeResult<()> {
        self.next_call()
    }
}

#[core_async::main]
async fn main() -> anyhow::Result<()> {
    let format = match std::env::args().nth(1).as_deref() {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Compact,
    };
    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug)
            .with_logger_sink(Arc::new(ConsoleLogger {
                min_level: LogLevel::Warn,
            })),
    )?;

    let core = CoreConfig::builder()
        .remote_store(Arc::new(FlakyStore::default()))
        .build()?;
    let engine = SyncEngine::new(
        core,
        SyncConfig {
            backoff_base: Duration::from_millis(50),
            initially_online: false,
            ..SyncConfig::default()
        },
    )?;
    let mut events = engine.subscribe();
    engine.start().await?;

    let workout = WorkoutRecord {
        id: "morning-run".to_string(),
        activity_type: "running".to_string(),
        duration_seconds: 2_700.0,
        exercises: vec![ExerciseRecord {
            name: "Tempo run".to_string(),
            sets: 1,
            reps: vec![1],
            weight: Vec::new(),
        }],
        completed_at: Utc::now(),
    };

    if let Err(e) = engine.sync_workout(workout).await {
        info!(error = %e, "Immediate sync deferred");
    }

    for day in 1..=3 {
        engine.queue_for_sync(
            NutritionRecord {
                id: format!("day-{day}"),
                date: Utc::now(),
                calories: 2_000.0 + f64::from(day) * 50.0,
                protein: 130.0,
                carbs: 210.0,
                fat: 70.0,
                meals: Vec::new(),
            },
            Priority::Normal,
        );
    }
    engine.queue_for_sync(
        ProfileRecord {
            user_id: "demo-user".to_string(),
            name: "Demo".to_string(),
            age: 30,
            weight: 70.0,
            height: 175.0,
            fitness_goals: vec!["consistency".to_string()],
        },
        Priority::High,
    );

    info!(status = ?engine.get_sync_status(), "Before reconnect");
    engine.update_online_status(true).await;

    loop {
        if let CoreEvent::Sync(SyncEvent::DrainCompleted {
            trigger: DrainTrigger::Connectivity,
            ..
        }) = events.recv().await?
        {
            break;
        }
    }

    let outcomes = engine.force_sync().await;
    info!(
        forced = outcomes.len(),
        status = ?engine.get_sync_status(),
        "Backlog drained"
    );

    engine.stop().await;
    Ok(())
}
