//! Lifecycle glue between the game host and the light bar.
//!
//! The embedder creates one [`LightbarSession`] when the mod initializes,
//! registers its [`HostHooks`] handlers with the host's event dispatch, and
//! calls [`LightbarSession::shutdown`] when unloading. Dropping the session is
//! an equivalent shutdown, so the device is released exactly once either way.
//!
//! The session holds no locks. If the host can fire events from more than one
//! thread, the embedder must serialize calls (e.g. keep the session behind a
//! `Mutex`).

use crate::color_policy::ColorPolicy;
use crate::config::LightbarConfig;
use crate::device_link::{DeviceLink, SendOutcome};
use crate::hid::HidBackend;
use crate::host::{HealthSource, HostHooks};
use crate::logging::LogSink;
use std::sync::Arc;

pub struct LightbarSession {
    policy: ColorPolicy,
    log: Arc<dyn LogSink>,
    shut_down: bool,
}

impl LightbarSession {
    /// Build the pipeline and try to open the controller.
    ///
    /// A missing controller is not an error: the session runs with lighting
    /// disabled.
    pub fn start(
        config: &LightbarConfig,
        backend: Box<dyn HidBackend>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        log.log("Initializing");

        let mut link = DeviceLink::new(backend, log.clone());
        if link.open() {
            log.log("DualShock 4 successfully opened.");
        } else {
            log.warn("No DualShock 4 found or it's in use. Close DS4Windows/Steam Input.");
        }

        let palette = config.palette();
        let policy = ColorPolicy::with_mapping(link, palette, config.health, log.clone());

        log.log("Initialized");

        Self {
            policy,
            log,
            shut_down: false,
        }
    }

    /// Start with the real USB backend.
    #[cfg(feature = "native-hid")]
    pub fn start_native(config: &LightbarConfig, log: Arc<dyn LogSink>) -> Self {
        Self::start(config, Box::new(crate::hid::HidApiBackend::new()), log)
    }

    pub fn is_device_open(&self) -> bool {
        self.policy.link().is_open()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Release the controller. Only the first call does anything.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.policy.link_mut().close();
        self.log.log("Unloaded");
    }
}

impl HostHooks for LightbarSession {
    fn on_location_changed(&mut self, old: &str, new: &str) -> SendOutcome {
        self.policy.on_location_changed(old, new)
    }

    fn on_update(&mut self, host: &dyn HealthSource) -> Option<SendOutcome> {
        self.policy.on_update(host)
    }

    fn on_damage_taken(&mut self, host: &dyn HealthSource, hazard_kind: i32, amount: i32) -> i32 {
        self.policy.on_damage_taken(host, hazard_kind, amount)
    }
}

impl Drop for LightbarSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
