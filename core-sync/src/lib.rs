//! # Offline Sync Engine
//!
//! Reconciles locally produced fitness records with a remote store under
//! intermittent connectivity.
//!
//! ## Overview
//!
//! - Queues workouts, nutrition logs and profile updates in a priority-aware
//!   backlog
//! - Pushes them through the host's `RemoteStore`, at most one execution per
//!   operation at a time
//! - Retries failed pushes with exponential backoff up to a ceiling
//! - Drains the backlog periodically, on demand and when the device comes
//!   back online
//!
//! ## Components
//!
//! - **Operations** (`operation`): Operation, payload and outcome types
//! - **Validation** (`validation`): Per-kind payload checks run before any push
//! - **Sync Queue** (`queue`): Priority-ordered backlog
//! - **Sync Executor** (`executor`): One operation against the remote store, with retries
//! - **Dispatcher** (`dispatcher`): Bounded concurrent batches from the backlog
//! - **Connectivity Tracker** (`connectivity`): Online flag and reconnect drains
//! - **Sync Engine** (`engine`): Public façade with start/stop lifecycle
//! - **Status** (`status`): Read-only snapshots

pub mod config;
mod connectivity;
mod dispatcher;
pub mod engine;
pub mod error;
mod executor;
pub mod operation;
pub mod queue;
mod state;
pub mod status;
pub mod validation;

pub use config::SyncConfig;
pub use engine::SyncEngine;
pub use error::{Result, SyncError};
pub use operation::{
    OperationId, OperationKind, Priority, SyncOperation, SyncOutcome, SyncPayload, SyncReceipt,
};
pub use queue::SyncQueue;
pub use status::SyncStatus;
