//! Synchronization primitives.
//!
//! Async-aware locks and channels from `tokio::sync`, plus the cancellation
//! token from `tokio-util` used to stop long-running background loops.
//!
//! ```rust
//! use core_async::sync::{CancellationToken, Mutex};
//!
//! async fn example() {
//!     let counter = Mutex::new(0);
//!     *counter.lock().await += 1;
//!
//!     let token = CancellationToken::new();
//!     let child = token.child_token();
//!     token.cancel();
//!     assert!(child.is_cancelled());
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard, Semaphore, SemaphorePermit,
};
pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
