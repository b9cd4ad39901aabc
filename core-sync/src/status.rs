//! Read-only engine snapshot for observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the engine, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_online: bool,
    /// Operations waiting in the backlog
    pub pending_operations: usize,
    /// Operations currently executing
    pub active_operations: usize,
    /// Time of the most recent successful push
    pub last_sync_date: Option<DateTime<Utc>>,
    /// Successful pushes since the engine was created
    pub total_synced: u64,
    /// Operations that failed terminally since the engine was created
    pub total_failed: u64,
}

impl SyncStatus {
    /// Nothing is waiting or executing.
    pub fn is_idle(&self) -> bool {
        self.pending_operations == 0 && self.active_operations == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let status = SyncStatus {
            is_online: true,
            pending_operations: 2,
            active_operations: 0,
            last_sync_date: None,
            total_synced: 7,
            total_failed: 1,
        };

        assert!(!status.is_idle());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["pendingOperations"], 2);
        assert_eq!(json["isOnline"], true);
        assert!(json["lastSyncDate"].is_null());
    }
}
