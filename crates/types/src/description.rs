//! Loosely-typed disk descriptions
//!
//! The OS arbitration layer delivers disk state as a dictionary of
//! heterogeneous values keyed by well-known strings. `DiskDescription`
//! models that dictionary with typed accessors that return `Option`
//! instead of panicking, so every type-coercion failure lands in the
//! parser's normal failure path.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Well-known description keys delivered by the arbitration layer
pub mod keys {
    /// Human-readable volume name
    pub const VOLUME_NAME: &str = "VolumeName";
    /// OS-assigned volume UUID, the stable device identity
    pub const VOLUME_UUID: &str = "VolumeUUID";
    /// Filesystem mount path, absent while unmounted
    pub const VOLUME_PATH: &str = "VolumePath";
    /// Media capacity in bytes
    pub const MEDIA_SIZE: &str = "MediaSize";
    /// Physical media name
    pub const MEDIA_NAME: &str = "MediaName";
    /// Physical interconnect type (e.g. "USB")
    pub const DEVICE_PROTOCOL: &str = "DeviceProtocol";
}

/// One value in a disk description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionValue {
    /// String value
    Str(String),
    /// Signed integer value (sizes arrive as signed 64-bit counts)
    Int(i64),
    /// Native UUID value
    Uuid(Uuid),
    /// Filesystem path value
    Path(PathBuf),
    /// Boolean value
    Bool(bool),
}

/// A partially-populated disk description from the OS layer
///
/// Descriptions are not guaranteed to carry every key; accessors return
/// `None` both for absent keys and for values of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiskDescription {
    entries: HashMap<String, DescriptionValue>,
}

impl DiskDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a key, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: DescriptionValue) {
        self.entries.insert(key.into(), value);
    }

    /// Builder-style insert of a string value
    pub fn with_str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, DescriptionValue::Str(value.into()));
        self
    }

    /// Builder-style insert of an integer value
    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.insert(key, DescriptionValue::Int(value));
        self
    }

    /// Builder-style insert of a native UUID value
    pub fn with_uuid(mut self, key: &str, value: Uuid) -> Self {
        self.insert(key, DescriptionValue::Uuid(value));
        self
    }

    /// Builder-style insert of a path value
    pub fn with_path(mut self, key: &str, value: impl Into<PathBuf>) -> Self {
        self.insert(key, DescriptionValue::Path(value.into()));
        self
    }

    /// Remove a value under a key, returning it if present
    pub fn remove(&mut self, key: &str) -> Option<DescriptionValue> {
        self.entries.remove(key)
    }

    /// Raw value under a key, if present
    pub fn get(&self, key: &str) -> Option<&DescriptionValue> {
        self.entries.get(key)
    }

    /// String value under a key, or `None` if absent or mistyped
    pub fn str_field(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(DescriptionValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer value under a key, or `None` if absent or mistyped
    pub fn int_field(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(DescriptionValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Native UUID value under a key, or `None` if absent or mistyped
    ///
    /// Identity extraction additionally accepts a string rendering; see
    /// the monitor's parser.
    pub fn uuid_field(&self, key: &str) -> Option<Uuid> {
        match self.entries.get(key) {
            Some(DescriptionValue::Uuid(u)) => Some(*u),
            _ => None,
        }
    }

    /// Path value under a key, or `None` if absent or mistyped
    pub fn path_field(&self, key: &str) -> Option<&Path> {
        match self.entries.get(key) {
            Some(DescriptionValue::Path(p)) => Some(p),
            _ => None,
        }
    }

    /// Boolean value under a key, or `None` if absent or mistyped
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(DescriptionValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Number of entries in the description
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the description carries no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let id = Uuid::new_v4();
        let desc = DiskDescription::new()
            .with_str(keys::VOLUME_NAME, "BACKUP")
            .with_int(keys::MEDIA_SIZE, 64_000_000_000)
            .with_uuid(keys::VOLUME_UUID, id)
            .with_path(keys::VOLUME_PATH, "/Volumes/BACKUP");

        assert_eq!(desc.str_field(keys::VOLUME_NAME), Some("BACKUP"));
        assert_eq!(desc.int_field(keys::MEDIA_SIZE), Some(64_000_000_000));
        assert_eq!(desc.uuid_field(keys::VOLUME_UUID), Some(id));
        assert_eq!(
            desc.path_field(keys::VOLUME_PATH),
            Some(Path::new("/Volumes/BACKUP"))
        );
    }

    #[test]
    fn test_accessors_reject_mistyped_values() {
        let desc = DiskDescription::new().with_str(keys::MEDIA_SIZE, "not a number");

        assert_eq!(desc.int_field(keys::MEDIA_SIZE), None);
        assert_eq!(desc.str_field(keys::MEDIA_SIZE), Some("not a number"));
        assert_eq!(desc.uuid_field(keys::MEDIA_SIZE), None);
    }

    #[test]
    fn test_absent_keys_are_none() {
        let desc = DiskDescription::new();
        assert_eq!(desc.str_field(keys::VOLUME_NAME), None);
        assert_eq!(desc.path_field(keys::VOLUME_PATH), None);
        assert!(desc.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let desc = DiskDescription::new()
            .with_str(keys::VOLUME_NAME, "BACKUP")
            .with_int(keys::MEDIA_SIZE, 512);

        let encoded = serde_json::to_string(&desc).unwrap();
        let decoded: DiskDescription = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, desc);
    }
}
