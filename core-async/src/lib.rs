//! Async runtime facade for the fitness sync core.
//!
//! Every core crate reaches the executor through this crate instead of
//! depending on Tokio directly. Keeping the surface in one place means the
//! engine's suspension points (remote calls, backoff waits, the periodic
//! timer) all go through the same primitives, and tests can drive them with
//! Tokio's paused clock.
//!
//! # Modules
//!
//! - `task`: Task spawning and join handles
//! - `time`: Sleep, intervals and timeouts
//! - `sync`: Locks, channels and cancellation tokens
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

// Entry-point and test macros, so downstream crates never name Tokio.
pub use tokio::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

/// Waits on multiple branches, returning when the first completes.
pub use tokio::select;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
