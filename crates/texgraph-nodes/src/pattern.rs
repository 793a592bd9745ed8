//! Geometric pattern generators.
//!
//! All three patterns work in pixel units and accept an optional vector field
//! that offsets each sample position. Each emits a color raster and its luma.

use std::sync::Arc;

use texgraph_core::{
    ColorRaster, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort, Outputs,
    Ports, RasterSize, Rgba, TypedValue, Vec2, VectorField,
};

fn offset(field: Option<&VectorField>, x: u32, y: u32) -> Vec2 {
    field.and_then(|f| f.get(x, y)).unwrap_or(Vec2::ZERO)
}

fn color_and_luma(color: ColorRaster) -> Outputs {
    let gray: GrayscaleRaster = color.map(|p| p.luma());
    Outputs::new()
        .with("out_color", TypedValue::color(color))
        .with("out_grayscale", TypedValue::grayscale(gray))
}

/// Checkerboard of two colors with square cells `scale` pixels wide.
pub struct CheckerPattern {
    ports: Ports,
}

impl CheckerPattern {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "checker_pattern";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(InputPort::new("in_color1", "Color1", DataKind::Color).with_default(Rgba::WHITE))
            .register_input(InputPort::new("in_color2", "Color2", DataKind::Color).with_default(Rgba::BLACK))
            .register_input(InputPort::new("in_scale", "Scale", DataKind::Number).with_default(1))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color))
            .register_output(OutputPort::new("out_grayscale", "Grayscale", DataKind::Grayscale));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;
        let first = inputs.required::<Arc<ColorRaster>>("in_color1")?;
        let second = inputs.required::<Arc<ColorRaster>>("in_color2")?;
        // Cell width in whole pixels; anything below one collapses to one.
        let scale = (inputs.required::<f32>("in_scale")? as i64).max(1);

        let color = ColorRaster::from_fn(size, |x, y| {
            let d = offset(vector.as_deref(), x, y);
            let sx = i64::from(x) + d.x as i64;
            let sy = i64::from(y) + d.y as i64;
            let parity = (sx.div_euclid(scale) + sy.div_euclid(scale)).rem_euclid(2);
            let source = if parity == 0 { &first } else { &second };
            source.get(x, y).unwrap_or_default()
        });
        Ok(color_and_luma(color))
    }
}

impl_node!(CheckerPattern);

/// Circle outline or disc centred at `(center_x, center_y)` in pixels.
///
/// Pixels outside the shape are transparent.
pub struct CirclePattern {
    ports: Ports,
}

impl CirclePattern {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "circle_pattern";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(InputPort::new("in_color", "Color", DataKind::Color).with_default(Rgba::BLACK))
            .register_input(InputPort::new("in_center_x", "Center X", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_center_y", "Center Y", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_radius", "Radius", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_is_filling", "Filling", DataKind::Number).with_default(false))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color))
            .register_output(OutputPort::new("out_grayscale", "Grayscale", DataKind::Grayscale));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;
        let fill = inputs.required::<Arc<ColorRaster>>("in_color")?;
        let center = Vec2::new(
            inputs.required::<f32>("in_center_x")?,
            inputs.required::<f32>("in_center_y")?,
        );
        let radius = inputs.required::<f32>("in_radius")?;
        let filled = inputs.required::<f32>("in_is_filling")? != 0.0;

        let outer = (radius + 0.5) * (radius + 0.5);
        let inner = (radius - 0.5) * (radius - 0.5);

        let color = ColorRaster::from_fn(size, |x, y| {
            let sample = Vec2::new(x as f32, y as f32) + offset(vector.as_deref(), x, y);
            let dist_sq = sample.distance_squared(center);
            let inside = if filled {
                dist_sq <= outer
            } else {
                dist_sq >= inner && dist_sq <= outer
            };
            if inside {
                fill.get(x, y).unwrap_or_default()
            } else {
                Rgba::TRANSPARENT
            }
        });
        Ok(color_and_luma(color))
    }
}

impl_node!(CirclePattern);

/// Axis-aligned rectangle outline or fill, top-left at `(x, y)` in pixels.
pub struct RectanglePattern {
    ports: Ports,
}

impl RectanglePattern {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "rectangle_pattern";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(InputPort::new("in_color", "Color", DataKind::Color).with_default(Rgba::BLACK))
            .register_input(InputPort::new("in_x", "X", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_y", "Y", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_size_x", "Size X", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_size_y", "Size Y", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_is_filling", "Fill", DataKind::Number).with_default(false))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color))
            .register_output(OutputPort::new("out_grayscale", "Grayscale", DataKind::Grayscale));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;
        let fill = inputs.required::<Arc<ColorRaster>>("in_color")?;
        let left = inputs.required::<f32>("in_x")?;
        let top = inputs.required::<f32>("in_y")?;
        let right = left + inputs.required::<f32>("in_size_x")?;
        let bottom = top + inputs.required::<f32>("in_size_y")?;
        let filled = inputs.required::<f32>("in_is_filling")? != 0.0;

        let color = ColorRaster::from_fn(size, |x, y| {
            let s = Vec2::new(x as f32, y as f32) + offset(vector.as_deref(), x, y);
            let inside = s.x >= left && s.x <= right && s.y >= top && s.y <= bottom;
            // Outline pixels lie within one pixel of an edge.
            let draw = inside
                && (filled
                    || (s.x - left).abs() < 1.0
                    || (s.x - right).abs() < 1.0
                    || (s.y - top).abs() < 1.0
                    || (s.y - bottom).abs() < 1.0);
            if draw {
                fill.get(x, y).unwrap_or_default()
            } else {
                Rgba::TRANSPARENT
            }
        });
        Ok(color_and_luma(color))
    }
}

impl_node!(RectanglePattern);
