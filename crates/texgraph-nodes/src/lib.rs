//! texgraph nodes - built-in node kinds
//!
//! Every node here is a plain struct owning its [`Ports`](texgraph_core::Ports)
//! declaration plus a pure `compute` function:
//!
//! - [`NoiseTexture`] - fractal Perlin noise with domain distortion
//! - [`VoronoiTexture`] - cellular distance field with per-cell colors
//! - [`GradientTexture`] - linear, quadratic, easing, radial and diagonal ramps
//! - [`CheckerPattern`], [`CirclePattern`], [`RectanglePattern`] - geometric patterns
//! - [`MixColor`] - two-color blend with 13 blend modes
//! - [`HsvAdjust`], [`InvertColor`] - color adjustment
//! - [`Mapping`], [`CombineXy`], [`SeparateXy`] - vector field operators
//! - [`MathNode`] - scalar arithmetic
//! - [`ValueNode`], [`RgbNode`] - constants
//! - [`TextureOutput`] - the graph sink
//!
//! ## Example
//!
//! ```rust
//! use texgraph_core::{Inputs, Node, RasterSize, TypedValue};
//! use texgraph_nodes::GradientTexture;
//!
//! let gradient = GradientTexture::new();
//! let size = RasterSize::new(8, 1);
//! let inputs = Inputs::new(size).with("in_gradient_type", TypedValue::Number(0.0));
//! let outputs = gradient.calculate(&inputs, size).unwrap();
//! assert!(outputs.get("out_grayscale").is_some());
//! ```

/// Implements [`Node`](texgraph_core::Node) for a struct with a `ports: Ports`
/// field and an inherent `compute(&self, &Inputs, RasterSize)`, plus the
/// `Default` and `boxed` boilerplate every kind shares.
macro_rules! impl_node {
    ($ty:ident) => {
        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $ty {
            /// Boxed constructor, usable as a catalog factory.
            pub fn boxed() -> Box<dyn texgraph_core::Node> {
                Box::new(Self::new())
            }
        }

        impl texgraph_core::Node for $ty {
            fn ports(&self) -> &texgraph_core::Ports {
                &self.ports
            }

            fn ports_mut(&mut self) -> &mut texgraph_core::Ports {
                &mut self.ports
            }

            fn calculate(
                &self,
                inputs: &texgraph_core::Inputs,
                size: texgraph_core::RasterSize,
            ) -> Result<texgraph_core::Outputs, texgraph_core::InputError> {
                self.compute(inputs, size)
            }
        }
    };
}

pub mod adjust;
pub mod color;
pub mod gradient;
pub mod input;
pub mod math;
pub mod mix;
pub mod noise;
pub mod output;
pub mod pattern;
pub mod perlin;
pub mod vector;
pub mod voronoi;

// Re-export main types at crate root
pub use adjust::{HsvAdjust, InvertColor};
pub use color::Hsv;
pub use gradient::{GradientTexture, GradientType};
pub use input::{RgbNode, ValueNode};
pub use math::{MathNode, MathOp};
pub use mix::{BlendMode, MixColor};
pub use noise::NoiseTexture;
pub use output::TextureOutput;
pub use pattern::{CheckerPattern, CirclePattern, RectanglePattern};
pub use perlin::Perlin2D;
pub use vector::{CombineXy, Mapping, MappingType, SeparateXy};
pub use voronoi::{DistanceMetric, VoronoiFeature, VoronoiTexture};
