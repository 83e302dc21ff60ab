//! Common utilities for usb-disk-monitor
//!
//! This crate provides the async channel bridge that carries raw disk
//! events from the session adapter's delivery context into the monitor's
//! serialized worker, plus logging setup and shared error handling.

pub mod channel;
pub mod error;
pub mod logging;

pub use channel::{DiskEvent, EventSink, EventSource, create_event_bridge};
pub use error::{Error, Result};
pub use logging::setup_logging;
