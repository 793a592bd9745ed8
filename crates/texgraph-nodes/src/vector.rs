//! Vector field operators.
//!
//! Vector fields carry per-pixel texture coordinates or offsets. When no field
//! is connected, [`Mapping`] starts from the pixel position in `[0, 1)`.

use std::sync::Arc;

use texgraph_core::convert::unit_to_byte;
use texgraph_core::{
    ChoiceList, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort, Outputs,
    Ports, RasterSize, TypedValue, Vec2, VectorField,
};

/// How [`Mapping`] applies its transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MappingType {
    /// Scale, rotate, then translate.
    #[default]
    Point,
    /// Inverse of `Point`: translate back, rotate back, unscale.
    Texture,
    /// Scale and rotate, no translation.
    Vector,
}

impl MappingType {
    /// Option labels, in index order.
    pub const LABELS: &'static [&'static str] = &["Point", "Texture", "Vector"];

    /// Get mapping type from index, clamping out-of-range values to the last.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => MappingType::Point,
            1 => MappingType::Texture,
            _ => MappingType::Vector,
        }
    }

    /// Transforms `v`. `rotation` is in degrees.
    pub fn apply(self, v: Vec2, location: Vec2, rotation: f32, scale: Vec2) -> Vec2 {
        match self {
            MappingType::Point => rotate(v * scale, rotation) + location,
            MappingType::Texture => {
                let safe = Vec2::new(
                    if scale.x == 0.0 { 1.0 } else { scale.x },
                    if scale.y == 0.0 { 1.0 } else { scale.y },
                );
                rotate(v - location, -rotation) / safe
            }
            MappingType::Vector => rotate(v * scale, rotation),
        }
    }
}

fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Translates, rotates and scales a vector field.
///
/// Location and scale read both components of their fields; rotation reads
/// only the x component, in degrees.
pub struct Mapping {
    ports: Ports,
}

impl Mapping {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "mapping";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(
                InputPort::new("in_type", "Type", DataKind::Number)
                    .with_default(ChoiceList::new(MappingType::LABELS)),
            )
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(InputPort::new("in_location", "Location", DataKind::VectorField))
            .register_input(InputPort::new("in_rotation", "Rotation", DataKind::VectorField))
            .register_input(InputPort::new("in_scale", "Scale", DataKind::VectorField))
            .register_output(OutputPort::new("out_vector", "Vector", DataKind::VectorField));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let kind = MappingType::from_index(inputs.required::<f32>("in_type")? as usize);
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;
        let location = inputs.optional::<Arc<VectorField>>("in_location")?;
        let rotation = inputs.optional::<Arc<VectorField>>("in_rotation")?;
        let scale = inputs.optional::<Arc<VectorField>>("in_scale")?;

        let sample = |field: &Option<Arc<VectorField>>, x: u32, y: u32| {
            field.as_deref().and_then(|f| f.get(x, y))
        };
        let (w, h) = (size.width as f32, size.height as f32);

        let out = VectorField::from_fn(size, |x, y| {
            let v = sample(&vector, x, y).unwrap_or_else(|| Vec2::new(x as f32 / w, y as f32 / h));
            kind.apply(
                v,
                sample(&location, x, y).unwrap_or(Vec2::ZERO),
                sample(&rotation, x, y).map_or(0.0, |r| r.x),
                sample(&scale, x, y).unwrap_or(Vec2::ONE),
            )
        });
        Ok(Outputs::new().with("out_vector", TypedValue::vector_field(out)))
    }
}

impl_node!(Mapping);

/// Packs two grayscale channels into a vector field, each scaled to `[0, 1]`.
pub struct CombineXy {
    ports: Ports,
}

impl CombineXy {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "combine_xy";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_x", "X", DataKind::Grayscale).with_default(0.0))
            .register_input(InputPort::new("in_y", "Y", DataKind::Grayscale).with_default(0.0))
            .register_output(OutputPort::new("out_vector", "Vector", DataKind::VectorField));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let xs = inputs.required::<Arc<GrayscaleRaster>>("in_x")?;
        let ys = inputs.required::<Arc<GrayscaleRaster>>("in_y")?;
        let out = VectorField::from_fn(size, |x, y| {
            let vx = f32::from(xs.get(x, y).unwrap_or(0)) / 255.0;
            let vy = f32::from(ys.get(x, y).unwrap_or(0)) / 255.0;
            Vec2::new(vx, vy)
        });
        Ok(Outputs::new().with("out_vector", TypedValue::vector_field(out)))
    }
}

impl_node!(CombineXy);

/// Splits a vector field into two grayscale channels, clamping each
/// component to `[0, 1]`. An unconnected input yields black.
pub struct SeparateXy {
    ports: Ports,
}

impl SeparateXy {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "separate_xy";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_output(OutputPort::new("out_x", "X", DataKind::Grayscale))
            .register_output(OutputPort::new("out_y", "Y", DataKind::Grayscale));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, _size: RasterSize) -> Result<Outputs, InputError> {
        let field = inputs.required_or_else::<Arc<VectorField>>("in_vector", |s| {
            Arc::new(VectorField::new(s))
        })?;
        let xs: GrayscaleRaster = field.map(|v| unit_to_byte(v.x));
        let ys: GrayscaleRaster = field.map(|v| unit_to_byte(v.y));
        Ok(Outputs::new()
            .with("out_x", TypedValue::grayscale(xs))
            .with("out_y", TypedValue::grayscale(ys)))
    }
}

impl_node!(SeparateXy);
