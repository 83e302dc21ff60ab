//! Removable-disk observation core
//!
//! This crate maintains a deduplicated, queryable view of the removable
//! mass-storage devices currently known to the host, fed by asynchronous
//! and partially-populated descriptions from an OS arbitration session.
//!
//! It handles:
//! - Identity extraction and description parsing (tolerant of missing
//!   or mistyped fields; malformed events are dropped, never fatal)
//! - The id-keyed device registry with explicit insert/update/remove
//!   outcomes
//! - Reconciliation of appeared/disappeared/changed events onto the
//!   registry from a single serialized worker
//! - Publication of full-set snapshots and replay-last service status
//!   to subscribers
//!
//! The OS session itself lives behind the [`DiskSession`] trait; the
//! monitor never talks to the arbitration layer directly.

pub mod monitor;
pub mod parse;
pub mod publisher;
pub mod registry;
pub mod session;

pub use monitor::DiskMonitor;
pub use parse::{extract_volume_id, parse_disk};
pub use publisher::{ChangePublisher, DiskSetUpdate};
pub use registry::{DiskRegistry, RemoveOutcome, UpsertOutcome};
pub use session::DiskSession;
