//! Runtime construction helpers.
//!
//! Hosts that are not already running inside Tokio (FFI callers, blocking
//! test harnesses) use these to drive the engine's async API.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Builds a current-thread runtime with timers and I/O enabled.
pub fn current_thread() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

/// Runs the provided future to completion on a fresh current-thread runtime.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: std::future::Future,
{
    Ok(current_thread()?.block_on(future))
}
