//! DualShock 4 light bar driven by game events.
//!
//! Location changes pick a color by keyword, health changes blend from red to
//! green, and every color goes through a [`DeviceLink`] that writes at most
//! once per distinct color. The host's event system stays outside: the
//! embedder wires a [`LightbarSession`]'s [`HostHooks`] into it.

pub mod color;
pub mod color_policy;
pub mod config;
pub mod device;
pub mod device_link;
pub mod hid;
pub mod host;
pub mod logging;
pub mod session;

pub use color::Color;
pub use color_policy::{
    map_health, map_location, ColorPolicy, HealthGradient, LocationPalette, LocationRule,
};
pub use config::LightbarConfig;
pub use device::DeviceFilter;
pub use device_link::{DeviceLink, SendOutcome};
#[cfg(feature = "native-hid")]
pub use hid::HidApiBackend;
pub use hid::{HidBackend, LinkError, ReportStream};
pub use host::{HealthSource, HealthState, HostHooks};
pub use logging::{BufferedSink, LogSink, TracingSink};
pub use session::LightbarSession;

/// Default startup for a host without its own log window: load the user
/// config, install a `tracing` subscriber and open the controller.
///
/// Messages from loading the config are held until the subscriber exists, so
/// the configured `log_filter` applies to them too.
#[cfg(feature = "native-hid")]
pub fn run() -> LightbarSession {
    use std::sync::Arc;

    let early = BufferedSink::default();
    let loaded = config::load_config(&early);
    let filter = loaded
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| LightbarConfig::default().log_filter);
    logging::init(&filter);

    let log: Arc<dyn LogSink> = Arc::new(TracingSink);
    early.replay(log.as_ref());

    let config = loaded.unwrap_or_else(|e| {
        log.warn(&format!("Failed to load config, using defaults: {:#}", e));
        LightbarConfig::default()
    });

    LightbarSession::start_native(&config, log)
}
