//! Session adapter boundary
//!
//! The OS arbitration subsystem is an external collaborator: it owns
//! session creation, matching criteria, and callback delivery. The
//! monitor only hands it an [`EventSink`] and expects deliveries to
//! stop once `close` returns.

use common::EventSink;
use types::SessionError;

/// An OS observation session the monitor can open and close
///
/// Implementations own the delivery threading and must keep the sink
/// alive for the session's duration. `close` detaches synchronously:
/// no new deliveries may be initiated after it returns, though events
/// already queued on the bridge may still reach the worker (which
/// drops them once the monitor has stopped).
pub trait DiskSession: Send + 'static {
    /// Establish the session and begin delivering events into `sink`
    ///
    /// A failure here is non-fatal to the caller; the monitor reports
    /// `NotStarted` and the session may be retried.
    fn open(&mut self, sink: EventSink) -> Result<(), SessionError>;

    /// Detach the session; safe to call when already closed
    fn close(&mut self);
}
