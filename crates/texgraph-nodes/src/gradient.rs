//! Gradient texture.

use std::sync::Arc;

use texgraph_core::convert::unit_to_byte;
use texgraph_core::{
    ChoiceList, ColorRaster, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort,
    Outputs, Ports, RasterSize, Rgba, TypedValue, Vec2, VectorField,
};

/// Gradient profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientType {
    /// `t = x`
    #[default]
    Linear,
    /// `t = x²`
    Quadratic,
    /// Smoothstep of `x`.
    Easing,
    /// Distance from the centre, reaching 1 at the edge midpoints.
    Radial,
    /// `t = (x + y) / 2`
    Diagonal,
}

impl GradientType {
    /// Option labels, in index order.
    pub const LABELS: &'static [&'static str] = &["Linear", "Quadratic", "Easing", "Radial", "Diagonal"];

    /// Get gradient type from index, clamping out-of-range values to the last.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => GradientType::Linear,
            1 => GradientType::Quadratic,
            2 => GradientType::Easing,
            3 => GradientType::Radial,
            _ => GradientType::Diagonal,
        }
    }

    /// Ramp value at normalized coordinate `p`, clamped to `[0, 1]`.
    pub fn eval(self, p: Vec2) -> f32 {
        let t = match self {
            GradientType::Linear => p.x,
            GradientType::Quadratic => p.x * p.x,
            GradientType::Easing => {
                let t = p.x.clamp(0.0, 1.0);
                t * t * (3.0 - 2.0 * t)
            }
            GradientType::Radial => (p - Vec2::splat(0.5)).length() * 2.0,
            GradientType::Diagonal => (p.x + p.y) / 2.0,
        };
        t.clamp(0.0, 1.0)
    }
}

/// Grayscale ramp across the raster.
///
/// Without a vector input the coordinate runs from 0 at the first pixel to 1
/// at the last along each axis; a connected vector field supplies the
/// coordinates directly.
pub struct GradientTexture {
    ports: Ports,
}

impl GradientTexture {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "gradient_texture";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(
                InputPort::new("in_gradient_type", "Type", DataKind::Number)
                    .with_default(ChoiceList::new(GradientType::LABELS)),
            )
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color))
            .register_output(OutputPort::new("out_grayscale", "Grayscale", DataKind::Grayscale));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let kind = GradientType::from_index(inputs.required::<f32>("in_gradient_type")? as usize);
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;

        let span = |n: u32| if n > 1 { (n - 1) as f32 } else { 1.0 };
        let (sx, sy) = (span(size.width), span(size.height));

        let gray = GrayscaleRaster::from_fn(size, |x, y| {
            let p = match vector.as_deref().and_then(|f| f.get(x, y)) {
                Some(v) => v,
                None => Vec2::new(x as f32 / sx, y as f32 / sy),
            };
            unit_to_byte(kind.eval(p))
        });
        let color: ColorRaster = gray.map(|&v| Rgba::gray(v));

        Ok(Outputs::new()
            .with("out_color", TypedValue::color(color))
            .with("out_grayscale", TypedValue::grayscale(gray)))
    }
}

impl_node!(GradientTexture);
