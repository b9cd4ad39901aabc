//! # Core Configuration Module
//!
//! Dependency injection for the fitness sync core.
//!
//! ## Overview
//!
//! A [`CoreConfig`] carries every host-provided bridge the engine needs. It is
//! built with [`CoreConfigBuilder`], which fails fast with an actionable error
//! when a required capability is missing instead of letting the engine
//! discover it on the first sync attempt.
//!
//! ## Required Dependencies
//!
//! - `RemoteStore` - Where records are pushed
//!
//! ## Optional Dependencies
//!
//! - `NetworkMonitor` - Seeds and follows connectivity (required when
//!   `enable_network_awareness` is set)
//! - `Clock` - Defaults to [`SystemClock`]
//! - `EventBus` - Defaults to a fresh bus with the default buffer size
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .remote_store(Arc::new(MyRemoteStore::new()))
//!     .network_monitor(Arc::new(MyReachability::new()))
//!     .enable_network_awareness(true)
//!     .build()?;
//! ```
//!
//! Missing the remote store is reported, not panicked on:
//!
//! ```rust
//! use core_runtime::config::CoreConfig;
//! use core_runtime::Error;
//!
//! let err = CoreConfig::builder().build().unwrap_err();
//! assert!(matches!(err, Error::CapabilityMissing { .. }));
//! ```

use crate::error::{Error, Result};
use crate::events::EventBus;
use bridge_traits::{Clock, NetworkMonitor, RemoteStore, SystemClock};
use std::sync::Arc;

/// Core configuration for the fitness sync core.
#[derive(Clone)]
pub struct CoreConfig {
    /// Remote store the engine pushes records to (required)
    pub remote_store: Arc<dyn RemoteStore>,

    /// Network connectivity monitor (optional)
    pub network_monitor: Option<Arc<dyn NetworkMonitor>>,

    /// Time source for operation and sync timestamps
    pub clock: Arc<dyn Clock>,

    /// Bus the engine publishes progress events on
    pub event_bus: EventBus,

    pub features: FeatureFlags,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("remote_store", &"RemoteStore { ... }")
            .field(
                "network_monitor",
                &self
                    .network_monitor
                    .as_ref()
                    .map(|_| "NetworkMonitor { ... }"),
            )
            .field("clock", &"Clock { ... }")
            .field("event_bus", &self.event_bus)
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags control optional engine behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Run the periodic backlog drain while the engine is started
    pub enable_background_sync: bool,

    /// Follow the `NetworkMonitor` for connectivity (requires a monitor)
    pub enable_network_awareness: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_background_sync: true,
            enable_network_awareness: false,
        }
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Checks that feature flags are consistent with the injected bridges.
    pub fn validate(&self) -> Result<()> {
        if self.features.enable_network_awareness && self.network_monitor.is_none() {
            return Err(Error::CapabilityMissing {
                capability: "NetworkMonitor".to_string(),
                message: "Network awareness enabled but no NetworkMonitor provided. \
                          Disable the feature or inject a NetworkMonitor implementation."
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    remote_store: Option<Arc<dyn RemoteStore>>,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    clock: Option<Arc<dyn Clock>>,
    event_bus: Option<EventBus>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    pub fn remote_store(mut self, store: Arc<dyn RemoteStore>) -> Self {
        self.remote_store = Some(store);
        self
    }

    pub fn network_monitor(mut self, monitor: Arc<dyn NetworkMonitor>) -> Self {
        self.network_monitor = Some(monitor);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Share an existing bus so host subscribers see engine events.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn enable_background_sync(mut self, enabled: bool) -> Self {
        self.features.enable_background_sync = enabled;
        self
    }

    pub fn enable_network_awareness(mut self, enabled: bool) -> Self {
        self.features.enable_network_awareness = enabled;
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the final `CoreConfig`.
    ///
    /// # Errors
    ///
    /// `Error::CapabilityMissing` when no `RemoteStore` was provided, or when
    /// network awareness is enabled without a `NetworkMonitor`.
    pub fn build(self) -> Result<CoreConfig> {
        let remote_store = self.remote_store.ok_or_else(|| Error::CapabilityMissing {
            capability: "RemoteStore".to_string(),
            message: "A RemoteStore implementation is required to push records. \
                      Inject the host's backend client with .remote_store()."
                .to_string(),
        })?;

        let config = CoreConfig {
            remote_store,
            network_monitor: self.network_monitor,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_bus: self.event_bus.unwrap_or_default(),
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
