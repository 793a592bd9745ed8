//! Pixel rasters exchanged between nodes.
//!
//! A [`Raster`] is a row-major 2D buffer of samples with a fixed [`RasterSize`].
//! Three sample types are used by the graph:
//!
//! - [`ColorRaster`]: 8-bit RGBA pixels ([`Rgba`])
//! - [`GrayscaleRaster`]: 8-bit single-channel samples
//! - [`VectorField`]: per-pixel 2D vectors ([`glam::Vec2`])

use core::fmt;
use core::str::FromStr;

use glam::Vec2;

/// Width and height of a raster in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterSize {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl RasterSize {
    /// Creates a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Total number of pixels.
    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if either dimension is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for RasterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error returned when parsing a `WIDTHxHEIGHT` string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid raster size '{0}', expected WIDTHxHEIGHT (e.g. 64x64)")]
pub struct ParseSizeError(String);

impl FromStr for RasterSize {
    type Err = ParseSizeError;

    /// Parses `"64x32"`, or a single number for a square size.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError(s.to_string());
        let trimmed = s.trim();
        match trimmed.split_once(['x', 'X']) {
            Some((w, h)) => {
                let width = w.trim().parse().map_err(|_| err())?;
                let height = h.trim().parse().map_err(|_| err())?;
                Ok(Self::new(width, height))
            }
            None => trimmed.parse().map(Self::square).map_err(|_| err()),
        }
    }
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque gray with R = G = B = `v`.
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Rec. 601 luma, rounded to the nearest byte.
    #[inline]
    pub fn luma(self) -> u8 {
        let y = 0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b);
        y.round().clamp(0.0, 255.0) as u8
    }

    /// Returns the channels as an array in RGBA order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// A row-major 2D buffer of samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<P> {
    size: RasterSize,
    pixels: Vec<P>,
}

/// RGBA color raster.
pub type ColorRaster = Raster<Rgba>;
/// Single-channel 8-bit raster.
pub type GrayscaleRaster = Raster<u8>;
/// Per-pixel 2D vectors.
pub type VectorField = Raster<Vec2>;

impl<P: Copy + Default> Raster<P> {
    /// Creates a raster with every sample set to `P::default()`.
    pub fn new(size: RasterSize) -> Self {
        Self::filled(size, P::default())
    }
}

impl<P: Copy> Raster<P> {
    /// Creates a raster with every sample set to `value`.
    pub fn filled(size: RasterSize, value: P) -> Self {
        Self {
            size,
            pixels: vec![value; size.area()],
        }
    }

    /// Builds a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(size: RasterSize, mut f: impl FnMut(u32, u32) -> P) -> Self {
        let mut pixels = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.push(f(x, y));
            }
        }
        Self { size, pixels }
    }

    /// Wraps an existing sample vector. Returns `None` if its length does not
    /// match `size`.
    pub fn from_pixels(size: RasterSize, pixels: Vec<P>) -> Option<Self> {
        (pixels.len() == size.area()).then_some(Self { size, pixels })
    }

    /// Raster dimensions.
    #[inline]
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }

    /// Sample at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<P> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Writes the sample at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: P) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = value;
        }
    }

    /// Fills every sample with `value`.
    pub fn fill(&mut self, value: P) {
        self.pixels.fill(value);
    }

    /// All samples in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// Mutable access to all samples in row-major order.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Consumes the raster, returning its samples.
    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    /// Applies `f` to every sample, producing a raster of the same size.
    pub fn map<Q: Copy>(&self, f: impl FnMut(&P) -> Q) -> Raster<Q> {
        Raster {
            size: self.size,
            pixels: self.pixels.iter().map(f).collect(),
        }
    }
}

impl ColorRaster {
    /// Flattens the raster into an `RGBA8` byte vector.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }
}
