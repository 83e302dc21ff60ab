//! Removable disk device record

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use uuid::Uuid;

/// One removable mass-storage device currently known to the monitor
///
/// Identity is the OS-assigned volume UUID; it is the only field that
/// participates in equality and hashing. All other fields may change
/// between observations of the same device (a disk can go from
/// unmounted to mounted without changing identity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsbDisk {
    /// Stable volume UUID assigned by the OS
    pub id: Uuid,
    /// Human-readable volume name
    pub name: String,
    /// Filesystem mount path, present only while mounted
    pub mount_path: Option<PathBuf>,
    /// Raw capacity in bytes as reported by the OS
    pub size_bytes: u64,
    /// Underlying physical media name, distinct from the volume name
    pub media_name: String,
}

impl UsbDisk {
    /// Whether the disk is currently mounted
    pub fn is_mounted(&self) -> bool {
        self.mount_path.is_some()
    }
}

impl PartialEq for UsbDisk {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UsbDisk {}

impl Hash for UsbDisk {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
