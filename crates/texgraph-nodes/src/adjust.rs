//! Single-input color adjustments.

use std::sync::Arc;

use texgraph_core::{
    ColorRaster, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort, Outputs,
    Ports, RasterSize, Rgba, TypedValue,
};

use crate::color::{Hsv, lerp_color};

/// Hue shift plus saturation and value scaling.
///
/// A hue of 0.5 is neutral; the shift wraps around the color wheel. The
/// adjusted color is mixed over the original by `fac`.
pub struct HsvAdjust {
    ports: Ports,
}

impl HsvAdjust {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "hsv";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(
                InputPort::new("in_hue", "Hue", DataKind::Number)
                    .with_default(0.5)
                    .with_range(0.0, 1.0),
            )
            .register_input(InputPort::new("in_saturation", "Saturation", DataKind::Number).with_default(1.0))
            .register_input(InputPort::new("in_value", "Value", DataKind::Number).with_default(1.0))
            .register_input(
                InputPort::new("in_fac", "Fac", DataKind::Number)
                    .with_default(1.0)
                    .with_range(0.0, 1.0),
            )
            .register_input(InputPort::new("in_color", "Color", DataKind::Color).with_default(Rgba::WHITE))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, _size: RasterSize) -> Result<Outputs, InputError> {
        let hue = inputs.required::<f32>("in_hue")?;
        let saturation = inputs.required::<f32>("in_saturation")?;
        let value = inputs.required::<f32>("in_value")?;
        let fac = inputs.required::<f32>("in_fac")?;
        let color = inputs.required::<Arc<ColorRaster>>("in_color")?;

        let adjusted = color.map(|&orig| {
            let hsv = Hsv::from_rgba(orig);
            let shifted = Hsv::new(
                (hsv.h + hue - 0.5).rem_euclid(1.0),
                (hsv.s * saturation).clamp(0.0, 1.0),
                (hsv.v * value).clamp(0.0, 1.0),
            );
            lerp_color(orig, shifted.to_rgba(orig.a), fac)
        });
        Ok(Outputs::new().with("out_color", TypedValue::color(adjusted)))
    }
}

impl_node!(HsvAdjust);

/// Inverts RGB, mixed over the original by a per-pixel factor. Alpha is kept.
pub struct InvertColor {
    ports: Ports,
}

impl InvertColor {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "invert_color";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(
                InputPort::new("in_factor", "Factor", DataKind::Grayscale)
                    .with_default(0.0)
                    .with_range(0.0, 1.0)
                    .with_description("Factor of the effect"),
            )
            .register_input(InputPort::new("in_color", "Color", DataKind::Color))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let factor = inputs.required::<Arc<GrayscaleRaster>>("in_factor")?;
        let color = inputs.required::<Arc<ColorRaster>>("in_color")?;

        let inverted = ColorRaster::from_fn(size, |x, y| {
            let orig = color.get(x, y).unwrap_or_default();
            let flipped = Rgba::new(255 - orig.r, 255 - orig.g, 255 - orig.b, orig.a);
            let t = f32::from(factor.get(x, y).unwrap_or(0)) / 255.0;
            lerp_color(orig, flipped, t)
        });
        Ok(Outputs::new().with("out_color", TypedValue::color(inverted)))
    }
}

impl_node!(InvertColor);
