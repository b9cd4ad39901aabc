use std::time::Duration;

use crate::error::{Result, SyncError};

/// Sync engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Retries after the first failed remote call before giving up
    pub max_retries: u32,

    /// Delay before retry `n` is `backoff_base * 2^n`
    pub backoff_base: Duration,

    /// Period of the background drain
    pub periodic_interval: Duration,

    /// Batch size for periodic, connectivity and manual drains
    pub periodic_batch_size: usize,

    /// Batch size for `force_sync`
    pub force_batch_size: usize,

    /// Connectivity assumed until a `NetworkMonitor` or the host says otherwise
    pub initially_online: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1), // 2s, 4s, 8s
            periodic_interval: Duration::from_secs(300),
            periodic_batch_size: 10,
            force_batch_size: 5,
            initially_online: true,
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<()> {
        if self.periodic_batch_size == 0 || self.force_batch_size == 0 {
            return Err(SyncError::Config(
                "batch sizes must be greater than zero".to_string(),
            ));
        }

        if self.periodic_interval.is_zero() {
            return Err(SyncError::Config(
                "periodic_interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Wait before the retry that brings the count to `retry_count`.
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry_count);
        self.backoff_base.saturating_mul(factor)
    }
}
