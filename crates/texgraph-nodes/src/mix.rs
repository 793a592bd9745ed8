//! Two-input color blending.
//!
//! `in_color1` is the base layer and `in_color2` the blend layer. The blend is
//! computed per channel in `[0, 1]`, keeps the base alpha, and is then mixed
//! back over the base by the per-pixel factor.

use std::sync::Arc;

use texgraph_core::convert::unit_to_byte;
use texgraph_core::{
    ChoiceList, ColorRaster, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort,
    Outputs, Ports, RasterSize, Rgba, TypedValue,
};

use crate::color::lerp_color;

/// Blend mode for [`MixColor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Blend layer replaces the base.
    #[default]
    Mix,
    /// Per-channel minimum.
    Darken,
    /// Product.
    Multiply,
    /// Per-channel maximum.
    Lighten,
    /// Inverse product of inverses.
    Screen,
    /// Sum.
    Add,
    /// Multiply or screen depending on the base.
    Overlay,
    /// Gentle overlay driven by the blend layer.
    SoftLight,
    /// Base plus twice the blend minus one.
    LinearLight,
    /// Absolute difference.
    Difference,
    /// Difference with lower contrast.
    Exclusion,
    /// Base minus blend.
    Subtract,
    /// Base over blend.
    Divide,
}

impl BlendMode {
    /// Option labels, in index order.
    pub const LABELS: &'static [&'static str] = &[
        "Mix",
        "Darken",
        "Multiply",
        "Lighten",
        "Screen",
        "Add",
        "Overlay",
        "Soft Light",
        "Linear Light",
        "Difference",
        "Exclusion",
        "Subtract",
        "Divide",
    ];

    /// Get blend mode from index, clamping out-of-range values to the last.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => BlendMode::Mix,
            1 => BlendMode::Darken,
            2 => BlendMode::Multiply,
            3 => BlendMode::Lighten,
            4 => BlendMode::Screen,
            5 => BlendMode::Add,
            6 => BlendMode::Overlay,
            7 => BlendMode::SoftLight,
            8 => BlendMode::LinearLight,
            9 => BlendMode::Difference,
            10 => BlendMode::Exclusion,
            11 => BlendMode::Subtract,
            _ => BlendMode::Divide,
        }
    }

    /// Blends one channel. Inputs and result are unit floats; the result is
    /// not clamped.
    pub fn channel(self, base: f32, blend: f32) -> f32 {
        match self {
            BlendMode::Mix => blend,
            BlendMode::Darken => base.min(blend),
            BlendMode::Multiply => base * blend,
            BlendMode::Lighten => base.max(blend),
            BlendMode::Screen => 1.0 - (1.0 - base) * (1.0 - blend),
            BlendMode::Add => base + blend,
            BlendMode::Overlay => {
                if base < 0.5 {
                    2.0 * base * blend
                } else {
                    1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
                }
            }
            BlendMode::SoftLight => {
                if blend < 0.5 {
                    2.0 * base * blend + base * base * (1.0 - 2.0 * blend)
                } else {
                    2.0 * base * (1.0 - blend) + base.sqrt() * (2.0 * blend - 1.0)
                }
            }
            BlendMode::LinearLight => {
                if blend < 0.5 {
                    base + 2.0 * blend - 1.0
                } else {
                    base + 2.0 * (blend - 0.5)
                }
            }
            BlendMode::Difference => (base - blend).abs(),
            BlendMode::Exclusion => base + blend - 2.0 * base * blend,
            BlendMode::Subtract => base - blend,
            BlendMode::Divide => {
                if blend == 0.0 {
                    1.0
                } else {
                    base / blend
                }
            }
        }
    }

    /// Blends two colors, keeping the base alpha.
    pub fn blend(self, base: Rgba, layer: Rgba) -> Rgba {
        let ch = |b: u8, l: u8| {
            unit_to_byte(self.channel(f32::from(b) / 255.0, f32::from(l) / 255.0))
        };
        Rgba::new(ch(base.r, layer.r), ch(base.g, layer.g), ch(base.b, layer.b), base.a)
    }
}

/// Blends two colors with a selectable [`BlendMode`].
pub struct MixColor {
    ports: Ports,
}

impl MixColor {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "mix_color";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(
                InputPort::new("in_blending_mode", "Mode", DataKind::Number)
                    .with_default(ChoiceList::new(BlendMode::LABELS)),
            )
            .register_input(
                InputPort::new("in_factor", "Factor", DataKind::Grayscale)
                    .with_default(0.0)
                    .with_range(0.0, 1.0)
                    .with_description("Factor of the effect"),
            )
            .register_input(InputPort::new("in_color1", "Color1", DataKind::Color).with_default(Rgba::WHITE))
            .register_input(InputPort::new("in_color2", "Color2", DataKind::Color).with_default(Rgba::BLACK))
            .register_output(OutputPort::new("out_result", "Result", DataKind::Color));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let mode = BlendMode::from_index(inputs.required::<f32>("in_blending_mode")? as usize);
        let factor = inputs.required::<Arc<GrayscaleRaster>>("in_factor")?;
        let base = inputs.required::<Arc<ColorRaster>>("in_color1")?;
        let layer = inputs.required::<Arc<ColorRaster>>("in_color2")?;

        let result = ColorRaster::from_fn(size, |x, y| {
            let b = base.get(x, y).unwrap_or_default();
            let l = layer.get(x, y).unwrap_or_default();
            let t = f32::from(factor.get(x, y).unwrap_or(0)) / 255.0;
            lerp_color(b, mode.blend(b, l), t)
        });
        Ok(Outputs::new().with("out_result", TypedValue::color(result)))
    }
}

impl_node!(MixColor);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::literal_inputs;
    use texgraph_core::Node;

    const SIZE: RasterSize = RasterSize::new(2, 2);

    fn mix(node: &MixColor) -> Arc<ColorRaster> {
        let out = node.calculate(&literal_inputs(node, SIZE), SIZE).unwrap();
        out.get("out_result").and_then(|v| v.as_color()).cloned().unwrap()
    }

    #[test]
    fn test_zero_factor_keeps_base() {
        let node = MixColor::new();
        assert!(mix(&node).pixels().iter().all(|&p| p == Rgba::WHITE));
    }

    #[test]
    fn test_full_factor_mix_takes_layer() {
        let mut node = MixColor::new();
        node.ports_mut().set_input_value("in_factor", 1.0);
        assert!(mix(&node).pixels().iter().all(|&p| p == Rgba::BLACK));
    }

    #[test]
    fn test_half_factor_interpolates() {
        let mut node = MixColor::new();
        node.ports_mut().set_input_value("in_factor", 0.5);
        let p = mix(&node).pixels()[0];
        assert!(p.r.abs_diff(128) <= 1, "{p:?}");
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_factor_literal_is_clamped() {
        let mut node = MixColor::new();
        assert!(node.ports_mut().set_input_value("in_factor", 4.0));
        assert_eq!(node.ports().input_value::<f32>("in_factor"), Some(1.0));
    }

    #[test]
    fn test_blend_channels() {
        assert_eq!(BlendMode::Multiply.channel(0.5, 0.5), 0.25);
        assert_eq!(BlendMode::Screen.channel(0.5, 0.5), 0.75);
        assert_eq!(BlendMode::Add.channel(0.75, 0.5), 1.25);
        assert_eq!(BlendMode::Overlay.channel(0.25, 0.5), 0.25);
        assert_eq!(BlendMode::Overlay.channel(0.75, 0.5), 0.75);
        assert_eq!(BlendMode::Difference.channel(0.25, 0.75), 0.5);
        assert_eq!(BlendMode::Exclusion.channel(0.5, 0.5), 0.5);
        assert_eq!(BlendMode::Divide.channel(0.5, 0.0), 1.0);
        assert_eq!(BlendMode::Divide.channel(0.25, 0.5), 0.5);
        assert_eq!(BlendMode::LinearLight.channel(0.5, 0.25), 0.0);
        assert_eq!(BlendMode::SoftLight.channel(0.25, 0.5), 0.25);
    }

    #[test]
    fn test_blend_clamps_and_keeps_base_alpha() {
        let base = Rgba::new(200, 100, 0, 90);
        let layer = Rgba::new(200, 50, 10, 255);
        let added = BlendMode::Add.blend(base, layer);
        assert_eq!(added, Rgba::new(255, 150, 10, 90));
        let sub = BlendMode::Subtract.blend(base, layer);
        assert_eq!(sub, Rgba::new(0, 50, 0, 90));
    }

    #[test]
    fn test_every_mode_stays_in_range() {
        for (i, _) in BlendMode::LABELS.iter().enumerate() {
            let mode = BlendMode::from_index(i);
            for b in [0u8, 64, 128, 255] {
                for l in [0u8, 64, 128, 255] {
                    let out = mode.blend(Rgba::gray(b), Rgba::gray(l));
                    assert_eq!(out.a, 255, "{mode:?}");
                }
            }
        }
        assert_eq!(BlendMode::from_index(12), BlendMode::Divide);
        assert_eq!(BlendMode::from_index(40), BlendMode::Divide);
    }
}
