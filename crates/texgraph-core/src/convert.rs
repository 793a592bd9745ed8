//! Conversion policy between [`DataKind`]s.
//!
//! The compatibility relation is deliberately asymmetric: a scalar may be
//! broadcast into a raster and a color may be reduced to luma, but a vector
//! field converts to nothing else.
//!
//! | from \ to   | Color | Grayscale | Vector | Number |
//! |-------------|:-----:|:---------:|:------:|:------:|
//! | Color       |   ✓   |     ✓     |   ✓    |        |
//! | Grayscale   |   ✓   |     ✓     |   ✓    |   ✓    |
//! | Vector      |       |           |   ✓    |        |
//! | Number      |   ✓   |     ✓     |        |   ✓    |

use glam::Vec2;

use crate::buffer::{ColorRaster, GrayscaleRaster, RasterSize, Rgba, VectorField};
use crate::value::DataKind;

/// Returns true if a value of kind `from` may feed a port of kind `to`.
pub fn can_convert(from: DataKind, to: DataKind) -> bool {
    use DataKind::{Color, Grayscale, Number, VectorField};
    from == to
        || matches!(
            (from, to),
            (Color, Grayscale | VectorField)
                | (Grayscale, Color | VectorField | Number)
                | (Number, Color | Grayscale)
        )
}

/// Maps a unit value to a byte, clamping to `[0, 1]` first.
#[inline]
pub fn unit_to_byte(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Per-pixel luma (`0.299R + 0.587G + 0.114B`).
pub fn color_to_grayscale(color: &ColorRaster) -> GrayscaleRaster {
    color.map(|p| p.luma())
}

/// Replicates each gray sample into R = G = B with full alpha.
pub fn grayscale_to_color(gray: &GrayscaleRaster) -> ColorRaster {
    gray.map(|&v| Rgba::gray(v))
}

/// Maps a sample `v` in `[0, 1]` to the vector `(0, -v)`.
pub fn grayscale_to_vector(gray: &GrayscaleRaster) -> VectorField {
    gray.map(|&v| Vec2::new(0.0, -f32::from(v) / 255.0))
}

/// Maps the R and G channels from `[0, 255]` to `[-1, 1]`.
pub fn color_to_vector(color: &ColorRaster) -> VectorField {
    color.map(|p| {
        Vec2::new(
            f32::from(p.r) / 127.5 - 1.0,
            f32::from(p.g) / 127.5 - 1.0,
        )
    })
}

/// Mean sample in `[0, 1]`. An empty raster yields 0.
pub fn grayscale_to_number(gray: &GrayscaleRaster) -> f32 {
    let pixels = gray.pixels();
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
    (sum as f64 / pixels.len() as f64 / 255.0) as f32
}

/// Fills a grayscale raster of `size` with the clamped scalar.
pub fn number_to_grayscale(v: f32, size: RasterSize) -> GrayscaleRaster {
    GrayscaleRaster::filled(size, unit_to_byte(v))
}

/// Fills an opaque gray color raster of `size` with the clamped scalar.
pub fn number_to_color(v: f32, size: RasterSize) -> ColorRaster {
    ColorRaster::filled(size, Rgba::gray(unit_to_byte(v)))
}
