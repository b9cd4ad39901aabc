//! Task spawning.
//!
//! Spawned tasks run on the ambient Tokio runtime. A panic inside a spawned
//! task does not unwind into the caller; it surfaces as a [`JoinError`] when
//! the handle is awaited, which is how the sync engine contains misbehaving
//! remote-store implementations.
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub use tokio::task::{yield_now, JoinError, JoinHandle, JoinSet};

/// Spawns a new asynchronous task on the current runtime.
///
/// # Panics
///
/// Panics when called outside of a Tokio runtime context.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;

/// Describes why a joined task did not produce a value.
pub fn describe_join_error(err: &JoinError) -> String {
    if err.is_panic() {
        "task panicked".to_string()
    } else if err.is_cancelled() {
        "task was cancelled".to_string()
    } else {
        err.to_string()
    }
}
