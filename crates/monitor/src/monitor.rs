//! Disk monitor
//!
//! Owns the device registry and reconciles raw session events onto it.
//! All mutable state (registry plus status) sits behind one mutex, and
//! events are drained by a single worker task so deliveries are never
//! reordered relative to the OS.

use crate::parse::{extract_volume_id, parse_disk};
use crate::publisher::{ChangePublisher, DiskSetUpdate};
use crate::registry::{DiskRegistry, RemoveOutcome};
use crate::session::DiskSession;
use common::{DiskEvent, EventSource, create_event_bridge};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use types::{ServiceStatus, UsbDisk};

/// Default capacity of the bridge between the session adapter and the worker
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the device-set broadcast stream
const DISK_STREAM_CAPACITY: usize = 64;

/// Observer of removable mass-storage devices
///
/// Maintains a deduplicated view of the disks currently known to the
/// host and publishes the full set to subscribers whenever it changes.
/// The OS subscription itself lives behind the [`DiskSession`] adapter.
pub struct DiskMonitor<S: DiskSession> {
    shared: Arc<Shared>,
    session: Mutex<S>,
    worker: Mutex<Option<JoinHandle<()>>>,
    event_capacity: usize,
}

/// State and publisher shared with the worker task
struct Shared {
    /// Registry and status under one lock: snapshot atomicity and the
    /// stop-vs-inflight-event race are both settled here
    state: Mutex<State>,
    publisher: ChangePublisher,
}

struct State {
    registry: DiskRegistry,
    status: ServiceStatus,
}

impl<S: DiskSession> DiskMonitor<S> {
    /// Create a monitor over the given session adapter
    pub fn with_session(session: S) -> Self {
        Self::with_capacity(session, EVENT_CHANNEL_CAPACITY)
    }

    /// Create a monitor with an explicit event bridge capacity
    pub fn with_capacity(session: S, event_capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    registry: DiskRegistry::new(),
                    status: ServiceStatus::NotStarted,
                }),
                publisher: ChangePublisher::new(DISK_STREAM_CAPACITY),
            }),
            session: Mutex::new(session),
            worker: Mutex::new(None),
            event_capacity,
        }
    }

    /// Begin observing disk events
    ///
    /// Opens the session adapter and spawns the event worker. If the
    /// session cannot be created the status stream reports `NotStarted`
    /// and the call returns normally; the caller may retry. Calling
    /// while already observing is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_observing(&self) {
        // Session lock held across the whole start so concurrent
        // start/stop calls cannot interleave mid-transition.
        let mut session = lock(&self.session);

        if self.shared.lock_state().status == ServiceStatus::Running {
            debug!("start_observing: already observing");
            return;
        }

        let (sink, source) = create_event_bridge(self.event_capacity);

        if let Err(e) = session.open(sink) {
            warn!("observation session could not be created: {}", e);
            // Reported once through the status stream, not thrown.
            self.shared
                .publisher
                .publish_status(ServiceStatus::NotStarted);
            return;
        }

        // Mark running before the worker drains anything, so events
        // delivered during startup are not dropped by the status check.
        {
            let mut state = self.shared.lock_state();
            state.status = ServiceStatus::Running;
            self.shared.publisher.publish_status(ServiceStatus::Running);
        }

        let shared = Arc::clone(&self.shared);
        *lock(&self.worker) = Some(tokio::spawn(run_worker(shared, source)));

        info!("disk observation started");
    }

    /// Stop observing disk events
    ///
    /// Detaches the session synchronously: the adapter initiates no new
    /// deliveries after this returns. Events already queued are dropped
    /// by the worker's status check. Safe to call when already stopped.
    ///
    /// The registry is not cleared; [`DiskMonitor::snapshot`] keeps
    /// returning the last-known set until the next start.
    pub fn stop_observing(&self) {
        let mut session = lock(&self.session);
        session.close();

        {
            let mut state = self.shared.lock_state();
            if state.status != ServiceStatus::Running {
                debug!("stop_observing: not observing, nothing to do");
                return;
            }
            state.status = ServiceStatus::Stopped;
            self.shared.publisher.publish_status(ServiceStatus::Stopped);
        }

        if let Some(worker) = lock(&self.worker).take() {
            worker.abort();
        }

        info!("disk observation stopped");
    }

    /// Defensive copy of the currently-known disk set
    pub fn snapshot(&self) -> Vec<UsbDisk> {
        self.shared.lock_state().registry.snapshot()
    }

    /// The current service status, without waiting
    pub fn current_status(&self) -> ServiceStatus {
        self.shared.publisher.current_status()
    }

    /// Subscribe to device-set snapshots, forward from this point
    pub fn subscribe_disks(&self) -> broadcast::Receiver<DiskSetUpdate> {
        self.shared.publisher.subscribe_disks()
    }

    /// Subscribe to status changes with replay-last semantics
    pub fn subscribe_status(&self) -> watch::Receiver<ServiceStatus> {
        self.shared.publisher.subscribe_status()
    }
}

impl<S: DiskSession> Drop for DiskMonitor<S> {
    fn drop(&mut self) {
        self.stop_observing();
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    /// Reconcile one raw event onto the registry
    ///
    /// Parse and identity failures drop the event without mutating or
    /// publishing anything; observation of other disks continues.
    fn handle_event(&self, event: DiskEvent) {
        let mut state = self.lock_state();
        if state.status != ServiceStatus::Running {
            debug!("dropping event delivered after stop");
            return;
        }

        match event {
            DiskEvent::Appeared(desc) | DiskEvent::DescriptionChanged(desc) => {
                match parse_disk(&desc) {
                    Ok(disk) => {
                        let id = disk.id;
                        let outcome = state.registry.upsert(disk);
                        debug!(volume = %id, ?outcome, "disk description reconciled");
                        self.publisher.publish_snapshot(state.registry.snapshot());
                    }
                    Err(e) => {
                        debug!("dropping disk event: {}", e);
                    }
                }
            }
            DiskEvent::Disappeared(desc) => match extract_volume_id(&desc) {
                Ok(id) => match state.registry.remove(&id) {
                    RemoveOutcome::Removed => {
                        info!(volume = %id, "disk disconnected");
                        self.publisher.publish_snapshot(state.registry.snapshot());
                    }
                    RemoveOutcome::Absent => {
                        debug!(volume = %id, "disappearance of unknown disk ignored");
                    }
                },
                Err(e) => {
                    debug!("dropping disappearance event: {}", e);
                }
            },
        }
    }
}

/// Drain the event bridge until every sink is gone
async fn run_worker(shared: Arc<Shared>, source: EventSource) {
    debug!("disk event worker started");
    while let Ok(event) = source.recv().await {
        shared.handle_event(event);
    }
    debug!("disk event worker stopped");
}

/// Lock a mutex, recovering the guard if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::description::keys;
    use types::DiskDescription;
    use uuid::Uuid;

    fn running_shared() -> Shared {
        Shared {
            state: Mutex::new(State {
                registry: DiskRegistry::new(),
                status: ServiceStatus::Running,
            }),
            publisher: ChangePublisher::new(DISK_STREAM_CAPACITY),
        }
    }

    fn description(id: Uuid, name: &str, mount: Option<&str>) -> DiskDescription {
        let desc = DiskDescription::new()
            .with_uuid(keys::VOLUME_UUID, id)
            .with_str(keys::VOLUME_NAME, name)
            .with_int(keys::MEDIA_SIZE, 64_000_000_000)
            .with_str(keys::MEDIA_NAME, "USB HDD");
        match mount {
            Some(path) => desc.with_path(keys::VOLUME_PATH, path),
            None => desc,
        }
    }

    #[tokio::test]
    async fn test_appear_then_disappear() {
        let shared = running_shared();
        let mut rx = shared.publisher.subscribe_disks();
        let id = Uuid::new_v4();

        shared.handle_event(DiskEvent::Appeared(description(
            id,
            "BACKUP",
            Some("/Volumes/BACKUP"),
        )));

        let snapshot = rx.recv().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(snapshot[0].name, "BACKUP");
        assert!(snapshot[0].is_mounted());

        shared.handle_event(DiskEvent::Disappeared(
            DiskDescription::new().with_uuid(keys::VOLUME_UUID, id),
        ));

        let snapshot = rx.recv().await.unwrap().unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_changed_event_unmounts_in_place() {
        let shared = running_shared();
        let id = Uuid::new_v4();

        shared.handle_event(DiskEvent::Appeared(description(
            id,
            "BACKUP",
            Some("/Volumes/BACKUP"),
        )));
        shared.handle_event(DiskEvent::DescriptionChanged(description(id, "BACKUP", None)));

        let state = shared.lock_state();
        assert_eq!(state.registry.len(), 1);
        let disk = state.registry.get(&id).unwrap();
        assert!(!disk.is_mounted());
        assert_eq!(disk.mount_path, None);
    }

    #[tokio::test]
    async fn test_malformed_event_neither_mutates_nor_publishes() {
        let shared = running_shared();
        let mut rx = shared.publisher.subscribe_disks();

        // No identity at all.
        shared.handle_event(DiskEvent::Appeared(
            DiskDescription::new().with_str(keys::VOLUME_NAME, "GHOST"),
        ));
        // Identity present but not UUID-shaped.
        shared.handle_event(DiskEvent::Appeared(
            DiskDescription::new().with_str(keys::VOLUME_UUID, "not-a-uuid"),
        ));

        assert!(shared.lock_state().registry.is_empty());

        // Processing continues: a well-formed event still lands, and its
        // publish is the first thing the subscriber sees.
        let id = Uuid::new_v4();
        shared.handle_event(DiskEvent::Appeared(description(id, "GOOD", None)));

        let snapshot = rx.recv().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
    }

    #[tokio::test]
    async fn test_unknown_disappearance_is_a_noop() {
        let shared = running_shared();
        let mut rx = shared.publisher.subscribe_disks();
        let known = Uuid::new_v4();

        shared.handle_event(DiskEvent::Appeared(description(known, "KEEP", None)));
        let _ = rx.recv().await.unwrap();

        shared.handle_event(DiskEvent::Disappeared(
            DiskDescription::new().with_uuid(keys::VOLUME_UUID, Uuid::new_v4()),
        ));

        assert_eq!(shared.lock_state().registry.len(), 1);
        // Nothing was published for the unknown id.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_identical_changed_events_each_publish() {
        let shared = running_shared();
        let mut rx = shared.publisher.subscribe_disks();
        let id = Uuid::new_v4();
        let desc = description(id, "SAME", None);

        shared.handle_event(DiskEvent::DescriptionChanged(desc.clone()));
        shared.handle_event(DiskEvent::DescriptionChanged(desc));

        let first = rx.recv().await.unwrap().unwrap();
        let second = rx.recv().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].name, second[0].name);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_events_after_stop_are_dropped() {
        let shared = running_shared();
        shared.lock_state().status = ServiceStatus::Stopped;
        let mut rx = shared.publisher.subscribe_disks();

        shared.handle_event(DiskEvent::Appeared(description(
            Uuid::new_v4(),
            "LATE",
            None,
        )));

        assert!(shared.lock_state().registry.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
