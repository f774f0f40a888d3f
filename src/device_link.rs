//! Ownership of the single light bar connection.
//!
//! Every method is fail-soft: a missing or misbehaving controller degrades to
//! "no lighting", it never surfaces an error to the game's event handlers.

use crate::color::Color;
use crate::device::{encode_report, DeviceFilter};
use crate::hid::{HidBackend, LinkError, ReportStream};
use crate::logging::LogSink;
use std::sync::Arc;

/// What `send_color` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// No device open, nothing attempted.
    Closed,
    /// Same color as the last attempt, write skipped.
    Suppressed,
    /// Report written.
    Written,
    /// Write attempted and failed; the link stays open.
    Failed,
}

pub struct DeviceLink {
    backend: Box<dyn HidBackend>,
    filter: DeviceFilter,
    stream: Option<Box<dyn ReportStream>>,
    /// Last color a write was attempted for. Not a delivery receipt.
    last_sent: Option<Color>,
    log: Arc<dyn LogSink>,
}

impl DeviceLink {
    pub fn new(backend: Box<dyn HidBackend>, log: Arc<dyn LogSink>) -> Self {
        Self::with_filter(backend, DeviceFilter::dualshock4(), log)
    }

    pub fn with_filter(
        backend: Box<dyn HidBackend>,
        filter: DeviceFilter,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            backend,
            filter,
            stream: None,
            last_sent: None,
            log,
        }
    }

    /// Open the first matching controller. Returns whether a stream is now held.
    ///
    /// An already-open link keeps its handle.
    pub fn open(&mut self) -> bool {
        if self.stream.is_some() {
            return true;
        }

        match self.backend.open(&self.filter) {
            Ok(stream) => {
                self.stream = Some(stream);
                true
            }
            Err(e) => {
                self.log.warn(&format!("Error finding DualShock 4: {}", e));
                false
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Set the light bar color, at most one write per distinct color.
    pub fn send_color(&mut self, color: Color) -> SendOutcome {
        let Some(stream) = self.stream.as_mut() else {
            return SendOutcome::Closed;
        };

        if self.last_sent.is_some_and(|last| last.approx_eq(&color)) {
            return SendOutcome::Suppressed;
        }

        self.last_sent = Some(color);

        let report = encode_report(color);
        let written = stream.write_report(&report).and_then(|sent| {
            if sent < report.len() {
                return Err(LinkError::IncompleteWrite {
                    sent,
                    expected: report.len(),
                });
            }
            Ok(sent)
        });

        match written {
            Ok(_) => {
                let [r, g, b] = color.to_rgb8();
                self.log.log(&format!("Sent LED color: R{} G{} B{}", r, g, b));
                SendOutcome::Written
            }
            Err(e) => {
                self.log.warn(&format!("Error writing to DualShock 4: {}", e));
                SendOutcome::Failed
            }
        }
    }

    /// Release the stream if held. Safe to call any number of times.
    pub fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.close() {
                self.log.warn(&format!("Error closing stream: {}", e));
            }
        }
    }
}

impl Drop for DeviceLink {
    fn drop(&mut self) {
        self.close();
    }
}
