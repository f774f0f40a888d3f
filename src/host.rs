//! What the core needs from, and offers to, the game host.

use crate::device_link::SendOutcome;

/// Player health at one instant. Pulled on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthState {
    pub current: i32,
    pub max: i32,
}

/// Read access to the host's health data.
///
/// `None` means the host is not ready yet (no player loaded); that is routine
/// during startup and is skipped without logging.
pub trait HealthSource {
    fn health(&self) -> Option<HealthState>;
}

impl<F> HealthSource for F
where
    F: Fn() -> Option<HealthState>,
{
    fn health(&self) -> Option<HealthState> {
        self()
    }
}

/// Handlers the embedder registers with the host's event dispatch at startup
/// and removes at shutdown.
pub trait HostHooks {
    /// Active scene changed from `old` to `new`.
    fn on_location_changed(&mut self, old: &str, new: &str) -> SendOutcome;

    /// Per-frame update tick.
    fn on_update(&mut self, host: &dyn HealthSource) -> Option<SendOutcome>;

    /// Player took damage. Must return `amount` unchanged.
    fn on_damage_taken(&mut self, host: &dyn HealthSource, hazard_kind: i32, amount: i32) -> i32;
}
