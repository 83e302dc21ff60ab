//! Async channel bridge between the session adapter and the monitor worker
//!
//! The OS arbitration layer delivers callbacks on its own background
//! context. The bridge funnels those deliveries into one bounded channel
//! so the monitor can drain them from a single serialized worker,
//! preserving OS delivery order for any given device.

use async_channel::{Receiver, Sender, bounded};
use types::DiskDescription;

/// A raw disk lifecycle event from the session adapter
#[derive(Debug, Clone)]
pub enum DiskEvent {
    /// A disk matching the session's criteria appeared
    Appeared(DiskDescription),
    /// A known disk disappeared
    Disappeared(DiskDescription),
    /// A known disk's description changed (mount, rename, ...)
    DescriptionChanged(DiskDescription),
}

impl DiskEvent {
    /// The description carried by the event
    pub fn description(&self) -> &DiskDescription {
        match self {
            DiskEvent::Appeared(d)
            | DiskEvent::Disappeared(d)
            | DiskEvent::DescriptionChanged(d) => d,
        }
    }
}

/// Handle held by the session adapter (delivery side)
///
/// This is the capability-scoped handle the adapter invokes against for
/// the session's duration; cloning is cheap and every clone feeds the
/// same serialized queue. Dropping all sinks closes the source and ends
/// the worker loop.
#[derive(Debug, Clone)]
pub struct EventSink {
    event_tx: Sender<DiskEvent>,
}

impl EventSink {
    /// Deliver an event from an async context
    pub async fn deliver(&self, event: DiskEvent) -> crate::Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| crate::Error::Channel(e.to_string()))
    }

    /// Deliver an event from a non-async delivery thread (blocking)
    pub fn deliver_blocking(&self, event: DiskEvent) -> crate::Result<()> {
        self.event_tx
            .send_blocking(event)
            .map_err(|e| crate::Error::Channel(e.to_string()))
    }
}

/// Handle held by the monitor worker (consuming side)
#[derive(Debug)]
pub struct EventSource {
    event_rx: Receiver<DiskEvent>,
}

impl EventSource {
    /// Receive the next event; errors once every sink is dropped
    pub async fn recv(&self) -> crate::Result<DiskEvent> {
        self.event_rx
            .recv()
            .await
            .map_err(|e| crate::Error::Channel(e.to_string()))
    }
}

/// Create the bridge between a session adapter and the monitor worker
///
/// Returns (EventSink for the adapter, EventSource for the worker).
pub fn create_event_bridge(capacity: usize) -> (EventSink, EventSource) {
    let (event_tx, event_rx) = bounded(capacity);

    (EventSink { event_tx }, EventSource { event_rx })
}
