//! Fractal Perlin noise texture.

use std::sync::{Arc, LazyLock};

use texgraph_core::convert::unit_to_byte;
use texgraph_core::{
    ColorRaster, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort, Outputs,
    Ports, Raster, RasterSize, TypedValue, Vec2, VectorField,
};

use crate::color::Hsv;
use crate::perlin::Perlin2D;

static PERLIN: LazyLock<Perlin2D> = LazyLock::new(|| Perlin2D::new(0));

/// Frequency multiplier of the distortion lookup.
const DISTORTION_FREQUENCY: f32 = 4.0;

/// Upper bound on whole octaves.
const MAX_DETAIL: f32 = 15.0;

/// Fractal Brownian motion over [`Perlin2D`].
///
/// Sample coordinates are the pixel position in `[0, 1)` plus the optional
/// vector input. `detail` sets the octave count; its fractional part blends
/// in one more octave. With `normalize` on, the field is stretched to span
/// the full range; otherwise negative values are cut to zero.
///
/// Outputs the field as grayscale and as a hue sweep.
pub struct NoiseTexture {
    ports: Ports,
}

impl NoiseTexture {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "noise_texture";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_normalize", "Normalize", DataKind::Number).with_default(true))
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(InputPort::new("in_scale", "Scale", DataKind::Number).with_default(5.0))
            .register_input(
                InputPort::new("in_detail", "Detail", DataKind::Number)
                    .with_default(2.0)
                    .with_range(0.0, MAX_DETAIL),
            )
            .register_input(
                InputPort::new("in_roughness", "Roughness", DataKind::Number)
                    .with_default(0.5)
                    .with_range(0.0, 1.0)
                    .with_description("Amplitude falloff between octaves"),
            )
            .register_input(InputPort::new("in_lacunarity", "Lacunarity", DataKind::Number).with_default(2.0))
            .register_input(InputPort::new("in_distortion", "Distortion", DataKind::Number).with_default(0.0))
            .register_output(OutputPort::new("out_grayscale", "Factor", DataKind::Grayscale))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let normalize = inputs.required::<f32>("in_normalize")? != 0.0;
        let scale = inputs.required::<f32>("in_scale")?;
        let detail = inputs.required::<f32>("in_detail")?.clamp(0.0, MAX_DETAIL);
        let roughness = inputs.required::<f32>("in_roughness")?;
        let lacunarity = inputs.required::<f32>("in_lacunarity")?;
        let distortion = inputs.required::<f32>("in_distortion")?;
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;

        let octaves = FractalParams {
            scale,
            detail,
            roughness,
            lacunarity,
        };
        let (w, h) = (size.width as f32, size.height as f32);

        let field = Raster::from_fn(size, |x, y| {
            let mut coord = Vec2::new(x as f32 / w, y as f32 / h);
            if let Some(v) = vector.as_deref().and_then(|f| f.get(x, y)) {
                coord += v;
            }
            if distortion != 0.0 {
                let d = PERLIN.sample(
                    coord.x * DISTORTION_FREQUENCY,
                    coord.y * DISTORTION_FREQUENCY,
                );
                coord += Vec2::splat(distortion * d);
            }
            octaves.sample(&PERLIN, coord)
        });

        let values = remap(field.into_pixels(), normalize);
        let gray = GrayscaleRaster::from_fn(size, |x, y| {
            unit_to_byte(values[(y * size.width + x) as usize])
        });
        let color = ColorRaster::from_fn(size, |x, y| {
            Hsv::new(values[(y * size.width + x) as usize], 1.0, 1.0).to_rgba(255)
        });

        Ok(Outputs::new()
            .with("out_grayscale", TypedValue::grayscale(gray))
            .with("out_color", TypedValue::color(color)))
    }
}

impl_node!(NoiseTexture);

struct FractalParams {
    scale: f32,
    detail: f32,
    roughness: f32,
    lacunarity: f32,
}

impl FractalParams {
    fn sample(&self, noise: &Perlin2D, p: Vec2) -> f32 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.scale;

        let whole = self.detail.floor();
        for _ in 0..whole as u32 {
            value += amplitude * noise.sample(p.x * frequency, p.y * frequency);
            frequency *= self.lacunarity;
            amplitude *= self.roughness;
        }

        let fraction = self.detail - whole;
        if fraction > 0.0 {
            value += fraction * amplitude * noise.sample(p.x * frequency, p.y * frequency);
        }
        value
    }
}

/// Maps raw fBm values into `[0, 1]`.
fn remap(mut values: Vec<f32>, normalize: bool) -> Vec<f32> {
    if normalize {
        let (min, max) = values
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let mut range = max - min;
        if range < 1e-7 {
            range = 1.0;
        }
        for v in &mut values {
            *v = ((*v - min) / range).clamp(0.0, 1.0);
        }
    } else {
        for v in &mut values {
            *v = v.clamp(0.0, 1.0);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::literal_inputs;
    use texgraph_core::Node;

    const SIZE: RasterSize = RasterSize::new(32, 32);

    fn gray(outputs: &Outputs) -> Arc<GrayscaleRaster> {
        match outputs.get("out_grayscale") {
            Some(TypedValue::Grayscale(g)) => Arc::clone(g),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn test_noise_outputs_both_ports() {
        let node = NoiseTexture::new();
        let outputs = node.calculate(&literal_inputs(&node, SIZE), SIZE).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs.get("out_color").unwrap().size(), Some(SIZE));
        assert_eq!(gray(&outputs).size(), SIZE);
    }

    #[test]
    fn test_noise_normalized_spans_full_range() {
        let node = NoiseTexture::new();
        let outputs = node.calculate(&literal_inputs(&node, SIZE), SIZE).unwrap();
        let g = gray(&outputs);
        assert_eq!(g.pixels().iter().copied().min(), Some(0));
        assert_eq!(g.pixels().iter().copied().max(), Some(255));
    }

    #[test]
    fn test_noise_is_deterministic() {
        let node = NoiseTexture::new();
        let inputs = literal_inputs(&node, SIZE);
        let a = node.calculate(&inputs, SIZE).unwrap();
        let b = node.calculate(&inputs, SIZE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_scale_changes_content() {
        let mut node = NoiseTexture::new();
        let before = gray(&node.calculate(&literal_inputs(&node, SIZE), SIZE).unwrap());
        assert!(node.ports_mut().set_input_value("in_scale", 9.0));
        let after = gray(&node.calculate(&literal_inputs(&node, SIZE), SIZE).unwrap());
        assert_ne!(before.pixels(), after.pixels());
    }

    #[test]
    fn test_zero_detail_is_flat() {
        let mut node = NoiseTexture::new();
        node.ports_mut().set_input_value("in_detail", 0.0);
        node.ports_mut().set_input_value("in_normalize", false);
        let g = gray(&node.calculate(&literal_inputs(&node, SIZE), SIZE).unwrap());
        assert!(g.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_remap_flat_field() {
        let flat = remap(vec![0.3; 4], true);
        assert!(flat.iter().all(|&v| v == 0.0));
        let cut = remap(vec![-0.5, 0.25, 2.0], false);
        assert_eq!(cut, vec![0.0, 0.25, 1.0]);
    }
}
