//! Network Monitoring Abstraction
//!
//! Provides connectivity snapshots and change notifications. The sync engine
//! only cares about the online/offline bit; the remaining fields are carried
//! for hosts that want to log or gate on them.

use async_trait::async_trait;

use crate::error::Result;

/// Network connection type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Cellular,
    WiFi,
    Ethernet,
    Other,
}

/// Network connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Connected,
    Disconnected,
    /// Status unknown; treated as offline by the engine
    Indeterminate,
}

/// Network information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub status: NetworkStatus,
    pub network_type: Option<NetworkType>,
    /// Whether the connection is metered (has data limits/costs)
    pub is_metered: bool,
}

impl NetworkInfo {
    /// Snapshot for a connected network of the given type
    pub fn connected(network_type: NetworkType) -> Self {
        Self {
            status: NetworkStatus::Connected,
            network_type: Some(network_type),
            is_metered: matches!(network_type, NetworkType::Cellular),
        }
    }

    /// Snapshot for a missing network
    pub fn disconnected() -> Self {
        Self {
            status: NetworkStatus::Disconnected,
            network_type: None,
            is_metered: false,
        }
    }

    /// Whether the engine should consider itself online
    pub fn is_online(&self) -> bool {
        self.status == NetworkStatus::Connected
    }
}

/// Network monitor trait
///
/// Lets the engine seed its connectivity flag at start-up and follow
/// transitions afterwards, so a backlog drains as soon as the device
/// reconnects.
///
/// # Platform Support
///
/// - **iOS**: Network framework path monitor
/// - **Android**: ConnectivityManager callbacks
/// - **Desktop**: Polling or OS notifications
///
/// Hosts that already receive reachability callbacks can skip this trait and
/// call the engine's `update_online_status` directly.
#[async_trait]
pub trait NetworkMonitor: Send + Sync {
    /// Get current network information
    async fn get_network_info(&self) -> Result<NetworkInfo>;

    /// Check if currently connected to any network
    async fn is_connected(&self) -> bool {
        matches!(self.get_network_info().await, Ok(info) if info.is_online())
    }

    /// Subscribe to network status changes
    ///
    /// Implementations should emit an update whenever the status changes.
    /// Duplicate updates are tolerated; the engine ignores non-transitions.
    async fn subscribe_changes(&self) -> Result<Box<dyn NetworkChangeStream>>;
}

/// Stream of network status changes
#[async_trait]
pub trait NetworkChangeStream: Send {
    /// Get the next network info update
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<NetworkInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_info() {
        let info = NetworkInfo::connected(NetworkType::WiFi);
        assert_eq!(info.status, NetworkStatus::Connected);
        assert_eq!(info.network_type, Some(NetworkType::WiFi));
        assert!(!info.is_metered);
        assert!(info.is_online());

        let cellular = NetworkInfo::connected(NetworkType::Cellular);
        assert!(cellular.is_metered);
    }

    #[test]
    fn test_indeterminate_is_offline() {
        let info = NetworkInfo {
            status: NetworkStatus::Indeterminate,
            network_type: None,
            is_metered: false,
        };
        assert!(!info.is_online());
        assert!(!NetworkInfo::disconnected().is_online());
    }

    struct FixedMonitor(NetworkInfo);

    #[async_trait]
    impl NetworkMonitor for FixedMonitor {
        async fn get_network_info(&self) -> Result<NetworkInfo> {
            Ok(self.0.clone())
        }

        async fn subscribe_changes(&self) -> Result<Box<dyn NetworkChangeStream>> {
            Err(crate::error::BridgeError::NotAvailable(
                "subscribe_changes".to_string(),
            ))
        }
    }

    #[core_async::test]
    async fn test_default_is_connected() {
        assert!(FixedMonitor(NetworkInfo::connected(NetworkType::Ethernet))
            .is_connected()
            .await);
        assert!(!FixedMonitor(NetworkInfo::disconnected()).is_connected().await);
    }
}
