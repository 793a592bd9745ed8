//! Color space helpers shared by the color nodes.
//!
//! Channels are handled as unit floats internally and quantized back to bytes
//! with rounding.

use texgraph_core::Rgba;
use texgraph_core::convert::unit_to_byte;

/// HSV (Hue, Saturation, Value) color, all components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue (0-1, wraps around).
    pub h: f32,
    /// Saturation (0-1).
    pub s: f32,
    /// Value/Brightness (0-1).
    pub v: f32,
}

impl Hsv {
    /// Creates a new HSV color.
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Converts an RGB color, ignoring alpha.
    pub fn from_rgba(color: Rgba) -> Self {
        let r = f32::from(color.r) / 255.0;
        let g = f32::from(color.g) / 255.0;
        let b = f32::from(color.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;

        if d <= f32::EPSILON {
            return Self::new(0.0, 0.0, max);
        }

        let s = d / max;
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self::new(h / 6.0, s, max)
    }

    /// Converts to an RGB color with the given alpha.
    ///
    /// Hue wraps; saturation and value are clamped to `[0, 1]`.
    pub fn to_rgba(self, alpha: u8) -> Rgba {
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);
        let h = self.h.rem_euclid(1.0) * 6.0;

        let i = h.floor();
        let f = h - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match i as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgba::new(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b), alpha)
    }
}

/// Linear interpolation between two bytes, `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f32::from(a) * (1.0 - t) + f32::from(b) * t).round() as u8
}

/// Per-channel interpolation, alpha included.
#[inline]
pub fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    Rgba::new(
        lerp_u8(a.r, b.r, t),
        lerp_u8(a.g, b.g, t),
        lerp_u8(a.b, b.b, t),
        lerp_u8(a.a, b.a, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries_to_hsv() {
        let red = Hsv::from_rgba(Rgba::rgb(255, 0, 0));
        assert!(red.h.abs() < 1e-6);
        assert!((red.s - 1.0).abs() < 1e-6);
        assert!((red.v - 1.0).abs() < 1e-6);

        let green = Hsv::from_rgba(Rgba::rgb(0, 255, 0));
        assert!((green.h - 1.0 / 3.0).abs() < 1e-6);

        let blue = Hsv::from_rgba(Rgba::rgb(0, 0, 255));
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let gray = Hsv::from_rgba(Rgba::gray(128));
        assert_eq!(gray.s, 0.0);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.to_rgba(255), Rgba::gray(128));
    }

    #[test]
    fn test_round_trip_preserves_color() {
        for color in [
            Rgba::rgb(12, 200, 99),
            Rgba::rgb(255, 128, 0),
            Rgba::rgb(1, 2, 3),
            Rgba::rgb(250, 10, 240),
        ] {
            let back = Hsv::from_rgba(color).to_rgba(color.a);
            assert!(color.r.abs_diff(back.r) <= 1, "{:?} vs {:?}", color, back);
            assert!(color.g.abs_diff(back.g) <= 1, "{:?} vs {:?}", color, back);
            assert!(color.b.abs_diff(back.b) <= 1, "{:?} vs {:?}", color, back);
        }
    }

    #[test]
    fn test_hue_wraps() {
        let a = Hsv::new(0.25, 1.0, 1.0).to_rgba(255);
        let b = Hsv::new(1.25, 1.0, 1.0).to_rgba(255);
        let c = Hsv::new(-0.75, 1.0, 1.0).to_rgba(255);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgba::new(10, 20, 30, 40);
        let b = Rgba::new(200, 100, 0, 255);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 2.0), b);
        assert_eq!(lerp_u8(0, 255, 0.5), 128);
    }
}
