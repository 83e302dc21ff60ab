//! Device registry
//!
//! The authoritative, deduplicated set of currently-known disks, keyed
//! by volume UUID. Holds at most one record per id; mutations report an
//! explicit outcome so callers can decide whether to publish.

use std::collections::HashMap;
use types::UsbDisk;
use uuid::Uuid;

/// Outcome of [`DiskRegistry::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record with this id existed before
    Inserted,
    /// An existing record with this id was replaced in place
    Updated,
}

/// Outcome of [`DiskRegistry::remove`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// A record with this id existed and was deleted
    Removed,
    /// No record with this id was known (no-op, not an error)
    Absent,
}

/// Registry of currently-known removable disks, keyed by volume UUID
#[derive(Debug, Default)]
pub struct DiskRegistry {
    disks: HashMap<Uuid, UsbDisk>,
}

impl DiskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `disk.id`
    ///
    /// Always replaces the whole record; no field-level diffing is
    /// performed, so re-upserting identical fields still reports
    /// `Updated`.
    pub fn upsert(&mut self, disk: UsbDisk) -> UpsertOutcome {
        match self.disks.insert(disk.id, disk) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        }
    }

    /// Delete the record with the given id, if known
    pub fn remove(&mut self, id: &Uuid) -> RemoveOutcome {
        match self.disks.remove(id) {
            Some(_) => RemoveOutcome::Removed,
            None => RemoveOutcome::Absent,
        }
    }

    /// Look up a record by id
    pub fn get(&self, id: &Uuid) -> Option<&UsbDisk> {
        self.disks.get(id)
    }

    /// Defensive copy of the full current set; order is not meaningful
    pub fn snapshot(&self) -> Vec<UsbDisk> {
        self.disks.values().cloned().collect()
    }

    /// Number of known disks
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    /// Whether no disks are known
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }
}
