//! # Host Bridge Traits
//!
//! Contracts between the sync core and the host application.
//!
//! ## Overview
//!
//! The core never talks to a backend, an OS reachability API or a logging
//! pipeline directly. Each of those is a capability the host injects by
//! implementing one of the traits below. The core only depends on the
//! contract, which keeps the engine deterministic under test.
//!
//! ## Traits
//!
//! ### Remote persistence
//! - [`RemoteStore`](remote::RemoteStore) - Pushes workout, nutrition and profile records
//!
//! ### Platform integration
//! - [`NetworkMonitor`](network::NetworkMonitor) - Connectivity snapshots and change streams
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). The sync engine
//! treats every error coming out of a [`RemoteStore`](remote::RemoteStore) as
//! a transient failure and retries it; implementations do not need to
//! classify their failures further.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared by the concurrent sync attempts of one dispatch batch.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::error::Result;
//! use bridge_traits::records::{NutritionRecord, ProfileRecord, WorkoutRecord};
//! use bridge_traits::remote::RemoteStore;
//! use async_trait::async_trait;
//!
//! pub struct HttpRemoteStore {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl RemoteStore for HttpRemoteStore {
//!     async fn push_workout(&self, record: &WorkoutRecord) -> Result<()> {
//!         // POST /workouts
//!         todo!()
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod network;
pub mod records;
pub mod remote;
pub mod time;

pub use error::BridgeError;

pub use network::{NetworkChangeStream, NetworkInfo, NetworkMonitor, NetworkStatus, NetworkType};
pub use records::{
    ExerciseRecord, FoodRecord, MealRecord, NutritionRecord, ProfileRecord, WorkoutRecord,
};
pub use remote::RemoteStore;
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
