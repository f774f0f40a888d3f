use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest per-channel difference still treated as "the same color".
pub const CHANNEL_TOLERANCE: f32 = 1e-6;

/// Normalized RGB color, every channel in `[0.0, 1.0]`.
///
/// Serialized as a plain `[r, g, b]` array so config files stay short.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
}

impl Color {
    pub const RED: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Color = Color {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const CYAN: Color = Color {
        r: 0.0,
        g: 1.0,
        b: 1.0,
    };
    pub const GRAY: Color = Color {
        r: 0.5,
        g: 0.5,
        b: 0.5,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Build a color, clamping each channel into `[0.0, 1.0]`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
        }
    }

    pub fn r(&self) -> f32 {
        self.r
    }

    pub fn g(&self) -> f32 {
        self.g
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    /// Linear interpolation from `self` (t = 0) to `other` (t = 1).
    /// `t` is clamped, so the result never leaves the segment.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = clamp_unit(t);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Per-channel comparison within [`CHANNEL_TOLERANCE`].
    pub fn approx_eq(&self, other: &Color) -> bool {
        (self.r - other.r).abs() <= CHANNEL_TOLERANCE
            && (self.g - other.g).abs() <= CHANNEL_TOLERANCE
            && (self.b - other.b).abs() <= CHANNEL_TOLERANCE
    }

    /// 8-bit channels for the wire: `clamp(c) * 255`, truncated.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Color::new(r, g, b)
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({:.3}, {:.3}, {:.3})", self.r, self.g, self.b)
    }
}

fn clamp_unit(v: f32) -> f32 {
    // NaN maps to 0 rather than poisoning the channel
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn to_byte(channel: f32) -> u8 {
    (clamp_unit(channel) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range_channels() {
        let c = Color::new(-0.5, 1.5, 0.25);
        assert_eq!(c.r(), 0.0);
        assert_eq!(c.g(), 1.0);
        assert_eq!(c.b(), 0.25);
    }

    #[test]
    fn nan_channel_becomes_zero() {
        let c = Color::new(f32::NAN, 0.5, 0.5);
        assert_eq!(c.r(), 0.0);
    }

    #[test]
    fn bytes_are_truncated_not_rounded() {
        // 0.5 * 255 = 127.5
        assert_eq!(Color::GRAY.to_rgb8(), [127, 127, 127]);
        assert_eq!(Color::WHITE.to_rgb8(), [255, 255, 255]);
        assert_eq!(Color::new(0.999, 0.0, 0.0).to_rgb8(), [254, 0, 0]);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(Color::RED.lerp(Color::GREEN, 0.0), Color::RED);
        assert_eq!(Color::RED.lerp(Color::GREEN, 1.0), Color::GREEN);
        assert_eq!(
            Color::RED.lerp(Color::GREEN, 0.5),
            Color::new(0.5, 0.5, 0.0)
        );
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(Color::RED.lerp(Color::GREEN, 2.0), Color::GREEN);
        assert_eq!(Color::RED.lerp(Color::GREEN, -1.0), Color::RED);
    }

    #[test]
    fn approx_eq_tolerates_float_noise() {
        let a = Color::new(0.3, 0.6, 0.9);
        let b = Color::new(0.3 + 1e-7, 0.6, 0.9 - 1e-7);
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&Color::new(0.31, 0.6, 0.9)));
    }

    #[test]
    fn display_format() {
        assert_eq!(Color::GRAY.to_string(), "RGB(0.500, 0.500, 0.500)");
    }
}
