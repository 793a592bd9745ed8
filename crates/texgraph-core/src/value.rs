//! Runtime values flowing along graph connections.

use core::fmt;
use std::sync::Arc;

use crate::buffer::{ColorRaster, GrayscaleRaster, RasterSize, VectorField};
use crate::convert;

/// The declared kind of a port and of the values it carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// RGBA raster.
    Color,
    /// Single-channel raster.
    Grayscale,
    /// 2D vector per pixel.
    VectorField,
    /// A single scalar.
    Number,
}

impl DataKind {
    /// All kinds, in declaration order.
    pub const ALL: [DataKind; 4] = [
        DataKind::Color,
        DataKind::Grayscale,
        DataKind::VectorField,
        DataKind::Number,
    ];

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            DataKind::Color => "Color",
            DataKind::Grayscale => "Grayscale",
            DataKind::VectorField => "Vector",
            DataKind::Number => "Number",
        }
    }

    /// Returns true if values of this kind may be wired into a port of kind `to`.
    ///
    /// See [`convert::can_convert`].
    #[inline]
    pub fn converts_to(self, to: DataKind) -> bool {
        convert::can_convert(self, to)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value produced by a node output or derived from an input literal.
///
/// Rasters are reference counted: a cached output and every downstream
/// consumer share the same buffer.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// RGBA raster.
    Color(Arc<ColorRaster>),
    /// Single-channel raster.
    Grayscale(Arc<GrayscaleRaster>),
    /// Vector field.
    VectorField(Arc<VectorField>),
    /// Scalar.
    Number(f32),
}

impl TypedValue {
    /// Wraps an owned color raster.
    pub fn color(raster: ColorRaster) -> Self {
        Self::Color(Arc::new(raster))
    }

    /// Wraps an owned grayscale raster.
    pub fn grayscale(raster: GrayscaleRaster) -> Self {
        Self::Grayscale(Arc::new(raster))
    }

    /// Wraps an owned vector field.
    pub fn vector_field(field: VectorField) -> Self {
        Self::VectorField(Arc::new(field))
    }

    /// The kind of this value.
    pub fn kind(&self) -> DataKind {
        match self {
            TypedValue::Color(_) => DataKind::Color,
            TypedValue::Grayscale(_) => DataKind::Grayscale,
            TypedValue::VectorField(_) => DataKind::VectorField,
            TypedValue::Number(_) => DataKind::Number,
        }
    }

    /// Raster size, or `None` for a scalar.
    pub fn size(&self) -> Option<RasterSize> {
        match self {
            TypedValue::Color(r) => Some(r.size()),
            TypedValue::Grayscale(r) => Some(r.size()),
            TypedValue::VectorField(r) => Some(r.size()),
            TypedValue::Number(_) => None,
        }
    }

    /// Returns true if this value can be reused for an evaluation at `size`.
    ///
    /// Scalars are size independent; rasters must match exactly.
    pub fn is_valid_for(&self, size: RasterSize) -> bool {
        self.size().is_none_or(|s| s == size)
    }

    /// Converts this value to `to`, producing rasters of `size` where a
    /// scalar is broadcast. Returns `None` when the conversion is not allowed.
    pub fn convert(&self, to: DataKind, size: RasterSize) -> Option<TypedValue> {
        if self.kind() == to {
            return Some(self.clone());
        }
        let converted = match (self, to) {
            (TypedValue::Color(c), DataKind::Grayscale) => {
                TypedValue::grayscale(convert::color_to_grayscale(c))
            }
            (TypedValue::Color(c), DataKind::VectorField) => {
                TypedValue::vector_field(convert::color_to_vector(c))
            }
            (TypedValue::Grayscale(g), DataKind::Color) => {
                TypedValue::color(convert::grayscale_to_color(g))
            }
            (TypedValue::Grayscale(g), DataKind::VectorField) => {
                TypedValue::vector_field(convert::grayscale_to_vector(g))
            }
            (TypedValue::Grayscale(g), DataKind::Number) => {
                TypedValue::Number(convert::grayscale_to_number(g))
            }
            (TypedValue::Number(v), DataKind::Color) => {
                TypedValue::color(convert::number_to_color(*v, size))
            }
            (TypedValue::Number(v), DataKind::Grayscale) => {
                TypedValue::grayscale(convert::number_to_grayscale(*v, size))
            }
            _ => return None,
        };
        Some(converted)
    }

    /// Returns the color raster if this is a `Color` value.
    pub fn as_color(&self) -> Option<&Arc<ColorRaster>> {
        match self {
            TypedValue::Color(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the scalar if this is a `Number` value.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            TypedValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}
