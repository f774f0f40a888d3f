//! Maps game signals (current location, player health) to light bar colors.

use crate::color::Color;
use crate::device_link::{DeviceLink, SendOutcome};
use crate::host::{HealthSource, HealthState};
use crate::logging::LogSink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Location keyword and the color it selects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRule {
    pub keyword: String,
    pub color: Color,
}

impl LocationRule {
    pub fn new(keyword: &str, color: Color) -> Self {
        Self {
            keyword: keyword.to_string(),
            color,
        }
    }
}

/// Ordered keyword rules; the first rule whose keyword appears in the
/// location name wins.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPalette {
    rules: Vec<LocationRule>,
    fallback: Color,
}

impl LocationPalette {
    pub fn new(rules: Vec<LocationRule>, fallback: Color) -> Self {
        Self { rules, fallback }
    }

    pub fn resolve(&self, location: &str) -> Color {
        self.rules
            .iter()
            .find(|rule| location.contains(rule.keyword.as_str()))
            .map(|rule| rule.color)
            .unwrap_or(self.fallback)
    }
}

impl Default for LocationPalette {
    fn default() -> Self {
        Self::new(default_location_rules(), Color::WHITE)
    }
}

/// Built-in rules, highest priority first.
pub fn default_location_rules() -> Vec<LocationRule> {
    vec![
        LocationRule::new("City", Color::GRAY),
        LocationRule::new("Fungus", Color::GREEN),
        LocationRule::new("White_Palace", Color::CYAN),
    ]
}

/// Health bar gradient: `empty` at zero health, `full` at max health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthGradient {
    pub empty: Color,
    pub full: Color,
}

impl HealthGradient {
    /// `None` when `max <= 0`, there is no meaningful ratio then.
    pub fn color_for(&self, current: i32, max: i32) -> Option<Color> {
        if max <= 0 {
            return None;
        }
        let t = (current as f32 / max as f32).clamp(0.0, 1.0);
        Some(self.empty.lerp(self.full, t))
    }
}

impl Default for HealthGradient {
    fn default() -> Self {
        Self {
            empty: Color::RED,
            full: Color::GREEN,
        }
    }
}

/// Color for a location name using the built-in rules.
pub fn map_location(location: &str) -> Color {
    LocationPalette::default().resolve(location)
}

/// Red-to-green health color using the built-in gradient.
pub fn map_health(current: i32, max: i32) -> Option<Color> {
    HealthGradient::default().color_for(current, max)
}

/// Turns host events into light bar updates.
///
/// Owns the [`DeviceLink`]; all calls are expected on one thread.
pub struct ColorPolicy {
    link: DeviceLink,
    palette: LocationPalette,
    gradient: HealthGradient,
    last_health: Option<i32>,
    log: Arc<dyn LogSink>,
}

impl ColorPolicy {
    pub fn new(link: DeviceLink, log: Arc<dyn LogSink>) -> Self {
        Self::with_mapping(
            link,
            LocationPalette::default(),
            HealthGradient::default(),
            log,
        )
    }

    pub fn with_mapping(
        link: DeviceLink,
        palette: LocationPalette,
        gradient: HealthGradient,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            link,
            palette,
            gradient,
            last_health: None,
            log,
        }
    }

    pub fn link(&self) -> &DeviceLink {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut DeviceLink {
        &mut self.link
    }

    /// Scene change. Only the new location's name matters.
    pub fn on_location_changed(&mut self, old: &str, new: &str) -> SendOutcome {
        self.log.log(&format!("Scene changed: {} -> {}", old, new));

        if !self.link.is_open() {
            self.log.log("DualShock not open, skipping LED update.");
            return SendOutcome::Closed;
        }

        let color = self.palette.resolve(new);
        let outcome = self.link.send_color(color);
        self.log.log(&format!("LED set to {}", color));
        outcome
    }

    /// Recompute the health color from a fresh host snapshot.
    ///
    /// Returns `None` when nothing was sent: link closed, host not ready,
    /// `max <= 0`, or health unchanged since the last computation.
    pub fn update_health(&mut self, health: Option<HealthState>) -> Option<SendOutcome> {
        if !self.link.is_open() {
            return None;
        }
        let health = health?;
        if health.max <= 0 {
            return None;
        }
        if self.last_health == Some(health.current) {
            return None;
        }
        self.last_health = Some(health.current);

        let color = self.gradient.color_for(health.current, health.max)?;
        Some(self.link.send_color(color))
    }

    /// Per-frame tick.
    pub fn on_update(&mut self, host: &dyn HealthSource) -> Option<SendOutcome> {
        self.update_health(host.health())
    }

    /// Damage hook. Observes only: `amount` is always handed back unchanged.
    pub fn on_damage_taken(
        &mut self,
        host: &dyn HealthSource,
        _hazard_kind: i32,
        amount: i32,
    ) -> i32 {
        self.update_health(host.health());
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_link::tests::{FakeBackend, Recorder};
    use crate::logging::tests::MemorySink;

    fn policy(connected: bool) -> (ColorPolicy, Arc<Recorder>, Arc<MemorySink>) {
        let (backend, recorder) = if connected {
            FakeBackend::connected()
        } else {
            FakeBackend::missing()
        };
        let sink = Arc::new(MemorySink::default());
        let mut link = DeviceLink::new(Box::new(backend), sink.clone());
        link.open();
        (ColorPolicy::new(link, sink.clone()), recorder, sink)
    }

    fn health(current: i32, max: i32) -> Option<HealthState> {
        Some(HealthState { current, max })
    }

    #[test]
    fn location_keywords() {
        assert_eq!(map_location("Fungus_Wastes_01"), Color::GREEN);
        assert_eq!(map_location("Tutorial_Room"), Color::WHITE);
        assert_eq!(map_location("Ruins_City_02"), Color::GRAY);
        assert_eq!(map_location("White_Palace_03"), Color::CYAN);
    }

    #[test]
    fn location_priority_order() {
        assert_eq!(map_location("City_Fungus"), Color::GRAY);
        assert_eq!(map_location("Fungus_City"), Color::GRAY);
        assert_eq!(map_location("White_Palace_Fungus"), Color::GREEN);
    }

    #[test]
    fn location_match_is_case_sensitive() {
        assert_eq!(map_location("city_outskirts"), Color::WHITE);
    }

    #[test]
    fn health_gradient_values() {
        assert_eq!(map_health(0, 50), Some(Color::RED));
        assert_eq!(map_health(50, 50), Some(Color::GREEN));
        assert_eq!(map_health(50, 100), Some(Color::new(0.5, 0.5, 0.0)));

        let quarter = map_health(1, 4).unwrap();
        assert!(quarter.approx_eq(&Color::new(0.75, 0.25, 0.0)));
    }

    #[test]
    fn health_ratio_is_clamped() {
        assert_eq!(map_health(150, 100), Some(Color::GREEN));
        assert_eq!(map_health(-5, 100), Some(Color::RED));
    }

    #[test]
    fn health_without_max_is_none() {
        assert_eq!(map_health(5, 0), None);
        assert_eq!(map_health(0, -3), None);
    }

    #[test]
    fn custom_palette_order() {
        let palette = LocationPalette::new(
            vec![
                LocationRule::new("Crossroads", Color::RED),
                LocationRule::new("Cross", Color::CYAN),
            ],
            Color::GRAY,
        );
        assert_eq!(palette.resolve("Crossroads_04"), Color::RED);
        assert_eq!(palette.resolve("Cross_Fork"), Color::CYAN);
        assert_eq!(palette.resolve("Abyss"), Color::GRAY);
    }

    #[test]
    fn scene_change_sends_location_color() {
        let (mut policy, recorder, sink) = policy(true);

        assert_eq!(
            policy.on_location_changed("Town", "Fungus_Wastes_01"),
            SendOutcome::Written
        );
        assert_eq!(recorder.last_rgb(), Some([0, 255, 0]));
        assert!(sink.contains("Scene changed: Town -> Fungus_Wastes_01"));
        assert!(sink.contains("LED set to RGB(0.000, 1.000, 0.000)"));
    }

    #[test]
    fn scene_change_without_device_is_skipped() {
        let (mut policy, recorder, sink) = policy(false);

        assert_eq!(
            policy.on_location_changed("a", "Ruins_City"),
            SendOutcome::Closed
        );
        assert_eq!(recorder.writes(), 0);
        assert!(sink.contains("DualShock not open, skipping LED update."));
    }

    #[test]
    fn same_health_short_circuits() {
        let (mut policy, recorder, _) = policy(true);

        assert_eq!(
            policy.update_health(health(50, 100)),
            Some(SendOutcome::Written)
        );
        assert_eq!(policy.update_health(health(50, 100)), None);
        assert_eq!(recorder.writes(), 1);
        assert_eq!(recorder.last_rgb(), Some([127, 127, 0]));
    }

    #[test]
    fn health_skipped_when_host_not_ready() {
        let (mut policy, recorder, _) = policy(true);

        assert_eq!(policy.update_health(None), None);
        assert_eq!(policy.update_health(health(3, 0)), None);
        assert_eq!(recorder.writes(), 0);

        // A skipped snapshot must not poison the short-circuit
        assert_eq!(
            policy.update_health(health(3, 5)),
            Some(SendOutcome::Written)
        );
    }

    #[test]
    fn damage_hook_passes_amount_through() {
        let (mut policy, recorder, _) = policy(true);
        let host = || health(2, 5);

        assert_eq!(policy.on_damage_taken(&host, 1, 1), 1);
        assert_eq!(policy.on_damage_taken(&host, 0, 0), 0);
        assert_eq!(policy.on_damage_taken(&host, 3, -7), -7);
        assert_eq!(policy.on_damage_taken(&host, 2, i32::MAX), i32::MAX);
        assert_eq!(recorder.writes(), 1);
    }

    #[test]
    fn damage_hook_passes_amount_through_without_device() {
        let (mut policy, _, _) = policy(false);
        let host = || -> Option<HealthState> { None };
        assert_eq!(policy.on_damage_taken(&host, 1, 2), 2);
    }

    #[test]
    fn tick_follows_health_changes() {
        let (mut policy, recorder, _) = policy(true);

        policy.on_update(&|| health(5, 5));
        policy.on_update(&|| health(5, 5));
        policy.on_update(&|| health(0, 5));

        assert_eq!(recorder.writes(), 2);
        assert_eq!(recorder.last_rgb(), Some([255, 0, 0]));
    }
}
