//! Change publication
//!
//! Two independently-lived notification streams: full device-set
//! snapshots after every registry mutation (forward-only from
//! subscription time), and the service status with replay-last
//! semantics for late subscribers.

use tokio::sync::{broadcast, watch};
use types::{MountObservationError, ServiceStatus, UsbDisk};

/// One delivery on the device-set stream
///
/// `Ok` carries the full current snapshot; `Err` is the stream's
/// abnormal-termination value.
pub type DiskSetUpdate = Result<Vec<UsbDisk>, MountObservationError>;

/// Publisher for device-set snapshots and service status
#[derive(Debug)]
pub struct ChangePublisher {
    disk_tx: broadcast::Sender<DiskSetUpdate>,
    status_tx: watch::Sender<ServiceStatus>,
}

impl ChangePublisher {
    /// Create a publisher with the given device-set channel capacity
    pub fn new(capacity: usize) -> Self {
        let (disk_tx, _) = broadcast::channel(capacity);
        let (status_tx, _) = watch::channel(ServiceStatus::NotStarted);

        Self { disk_tx, status_tx }
    }

    /// Subscribe to device-set snapshots, forward from this point
    pub fn subscribe_disks(&self) -> broadcast::Receiver<DiskSetUpdate> {
        self.disk_tx.subscribe()
    }

    /// Subscribe to status changes; the receiver starts at the current value
    pub fn subscribe_status(&self) -> watch::Receiver<ServiceStatus> {
        self.status_tx.subscribe()
    }

    /// The most recently published status, without waiting
    pub fn current_status(&self) -> ServiceStatus {
        *self.status_tx.borrow()
    }

    /// Deliver a fresh snapshot to all device-set subscribers
    ///
    /// A send with no live subscribers is not an error; the snapshot is
    /// simply not retained.
    pub fn publish_snapshot(&self, snapshot: Vec<UsbDisk>) {
        let _ = self.disk_tx.send(Ok(snapshot));
    }

    /// Publish a status transition, retained for late subscribers
    pub fn publish_status(&self, status: ServiceStatus) {
        self.status_tx.send_replace(status);
    }

    /// Deliver the device-set stream's abnormal-termination value
    pub fn fail(&self, error: MountObservationError) {
        let _ = self.disk_tx.send(Err(error));
    }
}
