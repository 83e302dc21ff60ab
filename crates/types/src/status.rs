//! Observation service status

use serde::{Deserialize, Serialize};

/// Lifecycle status of the observation service
///
/// Transitions: `NotStarted -> Running` on a successful session start,
/// `Running -> Stopped` on an explicit stop. A failed session start
/// reports `NotStarted` again (idempotent), leaving retry to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// No session has been established
    NotStarted,
    /// Session active, events are being observed
    Running,
    /// Session explicitly detached
    Stopped,
}
