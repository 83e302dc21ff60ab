//! Shared types for usb-disk-monitor
//!
//! This crate defines the data model shared between the monitor core and
//! its front ends: the `UsbDisk` device record, the loosely-typed
//! `DiskDescription` delivered by the OS arbitration layer, the service
//! status enum, and the error taxonomy.

pub mod description;
pub mod device;
pub mod error;
pub mod status;

pub use description::{DescriptionValue, DiskDescription, keys};
pub use device::UsbDisk;
pub use error::{DescriptionError, MountObservationError, SessionError};
pub use status::ServiceStatus;
