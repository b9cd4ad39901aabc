//! Time-related operations.
//!
//! Sleeps and intervals come from `tokio::time`, so they honour
//! `tokio::time::pause()` in tests. `Instant` is re-exported from Tokio for
//! the same reason; wall-clock timestamps should come from an injected
//! `Clock` bridge instead.
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(5)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(5));
//! }
//! ```

pub use std::time::Duration;
pub use tokio::time::{
    interval, interval_at, sleep, timeout, Instant, Interval, MissedTickBehavior, Sleep,
};

/// Error returned when a [`timeout`] elapses.
pub use tokio::time::error::Elapsed;
