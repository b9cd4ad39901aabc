//! Offline-capable fitness record sync.
//!
//! Host applications depend on this crate instead of wiring the workspace
//! crates individually:
//!
//! - [`bridge`]: traits the host implements (`RemoteStore`, `NetworkMonitor`, ...)
//! - [`runtime`]: configuration, logging and the event bus
//! - [`sync`]: the sync engine
//!
//! ```rust,ignore
//! use fitsync::prelude::*;
//! use std::sync::Arc;
//!
//! let core = CoreConfig::builder()
//!     .remote_store(Arc::new(MyBackend::new()))
//!     .build()?;
//! let engine = SyncEngine::new(core, SyncConfig::default())?;
//! engine.start().await?;
//! ```

pub use bridge_traits as bridge;
pub use core_runtime as runtime;
pub use core_sync as sync;

/// Types most hosts need.
pub mod prelude {
    pub use bridge_traits::records::{
        ExerciseRecord, FoodRecord, MealRecord, NutritionRecord, ProfileRecord, WorkoutRecord,
    };
    pub use bridge_traits::{BridgeError, NetworkMonitor, RemoteStore};
    pub use core_runtime::config::CoreConfig;
    pub use core_runtime::events::{CoreEvent, EventStream, SyncEvent};
    pub use core_sync::{
        Priority, SyncConfig, SyncEngine, SyncError, SyncOutcome, SyncReceipt, SyncStatus,
    };
}
