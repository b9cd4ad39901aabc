//! # Event Bus System
//!
//! Typed broadcast events for observers of the sync engine (UI badges,
//! analytics, toasts). Built on `broadcast` from `core-async`.
//!
//! ## Overview
//!
//! - **Event Types**: [`CoreEvent`] wraps per-domain enums
//! - **EventBus**: Cloneable sender handle; every clone publishes to the same channel
//! - **EventStream**: Receiver wrapper with an optional filter
//!
//! Publishing never blocks and never fails the publisher: when nobody is
//! subscribed the event is simply dropped, so emit sites call `.ok()`.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{ConnectivityEvent, CoreEvent, EventBus};
//!
//! # #[core_async::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Connectivity(ConnectivityEvent::Online)).ok();
//! assert_eq!(
//!     rx.recv().await.unwrap(),
//!     CoreEvent::Connectivity(ConnectivityEvent::Online)
//! );
//! # }
//! ```
//!
//! ## Event Types
//!
//! ### Sync Events
//! - `Queued`: Operation entered the backlog
//! - `RetryScheduled`: Remote call failed, backing off before the next attempt
//! - `Succeeded`: Operation reached the remote store
//! - `Failed`: Operation failed; `terminal` tells whether it left the system
//! - `DrainStarted` / `DrainCompleted`: A dispatch cycle ran
//!
//! ### Connectivity Events
//! - `Online` / `Offline`: Emitted on transitions only

use core_async::sync::broadcast::{self, error::RecvError, error::SendError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall further behind receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Sync(SyncEvent),
    Connectivity(ConnectivityEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Sync(e) => e.description(),
            CoreEvent::Connectivity(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Sync(SyncEvent::Failed { terminal: true, .. }) => EventSeverity::Error,
            CoreEvent::Sync(SyncEvent::Failed { .. })
            | CoreEvent::Sync(SyncEvent::RetryScheduled { .. })
            | CoreEvent::Connectivity(ConnectivityEvent::Offline) => EventSeverity::Warning,
            CoreEvent::Sync(SyncEvent::Succeeded { .. })
            | CoreEvent::Sync(SyncEvent::DrainCompleted { .. })
            | CoreEvent::Connectivity(ConnectivityEvent::Online) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Sync Events
// ============================================================================

/// What caused a drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainTrigger {
    /// Fixed-interval background tick
    Periodic,
    /// Device came back online
    Connectivity,
    /// Host called `process_pending_sync`
    Manual,
    /// Host called `force_sync`
    Forced,
}

impl DrainTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainTrigger::Periodic => "periodic",
            DrainTrigger::Connectivity => "connectivity",
            DrainTrigger::Manual => "manual",
            DrainTrigger::Forced => "forced",
        }
    }
}

impl fmt::Display for DrainTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events describing the life of sync operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SyncEvent {
    /// Operation was added to the backlog.
    Queued {
        operation_id: String,
        /// "workout", "nutrition" or "user_profile"
        kind: String,
        priority: String,
        /// Backlog size after insertion
        pending: usize,
    },
    /// A remote call failed and the operation will be retried after a delay.
    RetryScheduled {
        operation_id: String,
        retry_count: u32,
        delay_ms: u64,
        message: String,
    },
    /// Operation reached the remote store.
    Succeeded {
        operation_id: String,
        kind: String,
        /// Remote calls made, including the successful one
        attempts: u32,
    },
    /// Operation failed.
    Failed {
        operation_id: String,
        kind: String,
        message: String,
        /// `false` when the operation went back to the backlog
        terminal: bool,
    },
    /// A dispatch cycle pulled a batch from the backlog.
    DrainStarted {
        trigger: DrainTrigger,
        batch_size: usize,
    },
    /// A dispatch cycle finished.
    DrainCompleted {
        trigger: DrainTrigger,
        succeeded: usize,
        failed: usize,
        /// Backlog size when the cycle ended
        remaining: usize,
    },
}

impl SyncEvent {
    fn description(&self) -> &str {
        match self {
            SyncEvent::Queued { .. } => "Operation queued for sync",
            SyncEvent::RetryScheduled { .. } => "Sync retry scheduled",
            SyncEvent::Succeeded { .. } => "Operation synced",
            SyncEvent::Failed { .. } => "Operation failed to sync",
            SyncEvent::DrainStarted { .. } => "Draining sync backlog",
            SyncEvent::DrainCompleted { .. } => "Sync backlog drain finished",
        }
    }
}

// ============================================================================
// Connectivity Events
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl ConnectivityEvent {
    fn description(&self) -> &str {
        match self {
            ConnectivityEvent::Online => "Device is online",
            ConnectivityEvent::Offline => "Device is offline",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus; clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `Receiver` with an optional predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let sync_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Sync(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next matching event.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once every bus handle is dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Drains every matching event that is already buffered.
    pub fn drain_ready(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        events.push(event);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return events,
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
