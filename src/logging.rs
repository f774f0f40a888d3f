//! Diagnostic output.
//!
//! Components never reach for a global logger: they receive an `Arc<dyn LogSink>`
//! at construction. The default sink forwards to `tracing`; a host that has its
//! own log window can pass an adapter instead.

use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Free-text log sink supplied by the embedder.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);

    /// Something went wrong but the caller carries on.
    fn warn(&self, message: &str) {
        self.log(message);
    }
}

/// Sink that forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "ds4_lightbar", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "ds4_lightbar", "{}", message);
    }
}

/// Holds messages produced before a subscriber exists, for [`BufferedSink::replay`].
#[derive(Debug, Default)]
pub struct BufferedSink {
    lines: Mutex<Vec<(bool, String)>>,
}

impl BufferedSink {
    /// Forward everything collected so far to `sink`, in order, and forget it.
    pub fn replay(&self, sink: &dyn LogSink) {
        let lines = match self.lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(_) => return,
        };
        for (is_warning, message) in lines {
            if is_warning {
                sink.warn(&message);
            } else {
                sink.log(&message);
            }
        }
    }

    fn push(&self, is_warning: bool, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((is_warning, message.to_string()));
        }
    }
}

impl LogSink for BufferedSink {
    fn log(&self, message: &str) {
        self.push(false, message);
    }

    fn warn(&self, message: &str) {
        self.push(true, message);
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `default_filter`.
///
/// Returns false if a global subscriber was already installed (by the host or
/// an earlier call), which is not an error.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
