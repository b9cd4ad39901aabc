//! # Connectivity Tracker
//!
//! Owns the online flag's transitions.
//!
//! Going offline→online is the only transition with a side effect: it
//! spawns one drain of the backlog. Repeating the current value is a no-op
//! and publishes nothing.

use bridge_traits::network::{NetworkChangeStream, NetworkMonitor};
use core_async::sync::CancellationToken;
use core_async::task::{self, JoinHandle};
use core_runtime::events::{ConnectivityEvent, CoreEvent, DrainTrigger, EventBus};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::operation::SyncOutcome;
use crate::state::SharedState;

/// Result of applying a connectivity update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    CameOnline,
    WentOffline,
    Unchanged,
}

#[derive(Clone)]
pub(crate) struct ConnectivityTracker {
    state: SharedState,
    dispatcher: Dispatcher,
    event_bus: EventBus,
    drain_batch_size: usize,
}

impl ConnectivityTracker {
    pub fn new(
        state: SharedState,
        dispatcher: Dispatcher,
        event_bus: EventBus,
        drain_batch_size: usize,
    ) -> Self {
        Self {
            state,
            dispatcher,
            event_bus,
            drain_batch_size,
        }
    }

    /// Records the new connectivity value.
    ///
    /// Returns the drain started by an offline→online transition.
    pub fn set_online(&self, online: bool) -> Option<JoinHandle<Vec<SyncOutcome>>> {
        match self.apply(online) {
            Transition::CameOnline => {
                let dispatcher = self.dispatcher.clone();
                let batch_size = self.drain_batch_size;
                Some(task::spawn(async move {
                    dispatcher
                        .drain_once(batch_size, DrainTrigger::Connectivity)
                        .await
                }))
            }
            Transition::WentOffline | Transition::Unchanged => None,
        }
    }

    fn apply(&self, online: bool) -> Transition {
        let previous = self.state.with(|state| std::mem::replace(&mut state.online, online));

        let (transition, event) = match (previous, online) {
            (false, true) => (Transition::CameOnline, ConnectivityEvent::Online),
            (true, false) => (Transition::WentOffline, ConnectivityEvent::Offline),
            _ => {
                debug!(online, "Connectivity unchanged");
                return Transition::Unchanged;
            }
        };

        info!(online, pending = self.state.pending(), "Connectivity changed");
        self.event_bus.emit(CoreEvent::Connectivity(event)).ok();
        transition
    }
}

/// Feeds `NetworkMonitor` updates into the tracker until the stream closes
/// or `cancel` fires.
pub(crate) async fn watch_network(
    tracker: ConnectivityTracker,
    monitor: Arc<dyn NetworkMonitor>,
    cancel: CancellationToken,
) {
    let mut changes: Box<dyn NetworkChangeStream> = match monitor.subscribe_changes().await {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "Network change subscription unavailable");
            return;
        }
    };

    loop {
        core_async::select! {
            _ = cancel.cancelled() => break,
            update = changes.next() => match update {
                Some(info) => {
                    tracker.set_online(info.is_online());
                }
                None => {
                    debug!("Network change stream closed");
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::executor::SyncExecutor;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::records::{NutritionRecord, ProfileRecord, WorkoutRecord};
    use bridge_traits::{RemoteStore, SystemClock};

    struct OkStore;

    #[async_trait]
    impl RemoteStore for OkStore {
        async fn push_workout(&self, _record: &WorkoutRecord) -> BridgeResult<()> {
            Ok(())
        }

        async fn push_nutrition(&self, _record: &NutritionRecord) -> BridgeResult<()> {
            Ok(())
        }

        async fn push_profile(&self, _record: &ProfileRecord) -> BridgeResult<()> {
            Ok(())
        }
    }

    fn tracker(online: bool) -> (ConnectivityTracker, EventBus) {
        let state = SharedState::new(online);
        let bus = EventBus::new(16);
        let executor = SyncExecutor::new(
            Arc::new(OkStore),
            Arc::new(SystemClock),
            state.clone(),
            bus.clone(),
            SyncConfig::default(),
        );
        let dispatcher = Dispatcher::new(executor, state.clone(), bus.clone());
        (ConnectivityTracker::new(state, dispatcher, bus.clone(), 10), bus)
    }

    #[core_async::test]
    async fn test_only_offline_to_online_drains() {
        let (tracker, bus) = tracker(false);
        let mut events = bus.subscribe();

        let drain = tracker.set_online(true).expect("transition drains");
        assert!(drain.await.unwrap().is_empty());
        assert!(tracker.set_online(true).is_none());
        assert!(tracker.set_online(false).is_none());
        assert!(tracker.set_online(false).is_none());

        assert_eq!(
            events.try_recv().unwrap(),
            CoreEvent::Connectivity(ConnectivityEvent::Online)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            CoreEvent::Connectivity(ConnectivityEvent::Offline)
        );
        assert!(events.try_recv().is_err());
    }

    #[core_async::test]
    async fn test_apply_reports_transition() {
        let (tracker, _bus) = tracker(true);
        assert_eq!(tracker.apply(true), Transition::Unchanged);
        assert_eq!(tracker.apply(false), Transition::WentOffline);
        assert_eq!(tracker.apply(true), Transition::CameOnline);
    }
}
