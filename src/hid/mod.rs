//! HID transport seam.
//!
//! `DeviceLink` talks to the controller only through these traits, so the
//! USB backend can be swapped (or faked in tests) without touching the
//! change-suppression logic.

#[cfg(feature = "native-hid")]
mod native;

#[cfg(feature = "native-hid")]
pub use native::HidApiBackend;

use crate::device::DeviceFilter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("no matching HID device connected")]
    NotFound,
    #[error("device unavailable: {0}")]
    Unavailable(String),
    #[error("write failed: {0}")]
    WriteFailure(String),
    #[error("incomplete write: sent {sent} of {expected} bytes")]
    IncompleteWrite { sent: usize, expected: usize },
}

/// An open, writable stream to one HID device.
pub trait ReportStream: Send {
    /// Write one output report, returning the number of bytes accepted.
    /// A count short of `report.len()` is treated as a failed write by the caller.
    fn write_report(&mut self, report: &[u8]) -> Result<usize, LinkError>;

    /// Release the underlying handle. Called at most once.
    fn close(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

/// Finds and opens devices.
pub trait HidBackend: Send {
    /// Open the first connected device accepted by `filter`.
    fn open(&mut self, filter: &DeviceFilter) -> Result<Box<dyn ReportStream>, LinkError>;
}
