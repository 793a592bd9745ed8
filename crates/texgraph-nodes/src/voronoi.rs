//! Cellular (Worley) texture.
//!
//! Feature points sit one per cell of a `scale × scale` grid over the unit
//! square, jittered by `randomness` with a fixed-seed generator so the layout
//! is stable across evaluations.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use texgraph_core::convert::unit_to_byte;
use texgraph_core::{
    ChoiceList, ColorRaster, DataKind, GrayscaleRaster, InputError, InputPort, Inputs, OutputPort,
    Outputs, Ports, Raster, RasterSize, Rgba, TypedValue, Vec2, VectorField,
};

/// Seed of the feature point jitter.
const POINT_SEED: u64 = 0;

/// Largest grid side; keeps the per-pixel scan bounded.
const MAX_GRID: u32 = 256;

/// Which distance the grayscale output reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoronoiFeature {
    /// Distance to the nearest point.
    #[default]
    F1,
    /// Distance to the second nearest point.
    F2,
    /// Mean of F1 and F2.
    SmoothF1,
}

impl VoronoiFeature {
    /// Option labels, in index order.
    pub const LABELS: &'static [&'static str] = &["F1", "F2", "Smooth F1"];

    /// Get feature from index (for port control).
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => VoronoiFeature::F2,
            2 => VoronoiFeature::SmoothF1,
            _ => VoronoiFeature::F1,
        }
    }
}

/// Distance function between a sample and a feature point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Sum of axis distances.
    Manhattan,
    /// Largest axis distance.
    Chebyshev,
}

impl DistanceMetric {
    /// Option labels, in index order.
    pub const LABELS: &'static [&'static str] = &["Euclidean", "Manhattan", "Chebyshev"];

    /// Get metric from index (for port control).
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => DistanceMetric::Manhattan,
            2 => DistanceMetric::Chebyshev,
            _ => DistanceMetric::Euclidean,
        }
    }

    /// Distance between `a` and `b`.
    #[inline]
    pub fn distance(self, a: Vec2, b: Vec2) -> f32 {
        let d = (a - b).abs();
        match self {
            DistanceMetric::Euclidean => d.length(),
            DistanceMetric::Manhattan => d.x + d.y,
            DistanceMetric::Chebyshev => d.max_element(),
        }
    }
}

/// Voronoi texture node.
///
/// The grayscale output is the chosen feature distance, min/max normalized
/// when `normalize` is on. The color output paints each pixel with a stable
/// pseudo-random color of its nearest cell.
pub struct VoronoiTexture {
    ports: Ports,
}

impl VoronoiTexture {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "voronoi_texture";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(
                InputPort::new("in_feature", "Feature", DataKind::Number)
                    .with_default(ChoiceList::new(VoronoiFeature::LABELS)),
            )
            .register_input(
                InputPort::new("in_metric", "Metric", DataKind::Number)
                    .with_default(ChoiceList::new(DistanceMetric::LABELS)),
            )
            .register_input(InputPort::new("in_normalize", "Normalize", DataKind::Number).with_default(true))
            .register_input(InputPort::new("in_vector", "Vector", DataKind::VectorField))
            .register_input(InputPort::new("in_scale", "Scale", DataKind::Number).with_default(5.0))
            .register_input(
                InputPort::new("in_randomness", "Randomness", DataKind::Number)
                    .with_default(1.0)
                    .with_range(0.0, 1.0)
                    .with_description("Randomness of the effect"),
            )
            .register_output(OutputPort::new("out_grayscale", "Distance", DataKind::Grayscale))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let feature = VoronoiFeature::from_index(inputs.required::<f32>("in_feature")? as usize);
        let metric = DistanceMetric::from_index(inputs.required::<f32>("in_metric")? as usize);
        let normalize = inputs.required::<f32>("in_normalize")? != 0.0;
        let scale = inputs.required::<f32>("in_scale")?;
        let randomness = inputs.required::<f32>("in_randomness")?;
        let vector = inputs.optional::<Arc<VectorField>>("in_vector")?;

        let points = feature_points(scale, randomness, POINT_SEED);
        let (w, h) = (size.width as f32, size.height as f32);

        let cells: Raster<(f32, usize)> = Raster::from_fn(size, |x, y| {
            let mut coord = Vec2::new(x as f32 / w, y as f32 / h);
            if let Some(v) = vector.as_deref().and_then(|f| f.get(x, y)) {
                coord += v;
            }
            let (nearest, f1, f2) = two_nearest(&points, coord, metric);
            let value = match feature {
                VoronoiFeature::F1 => f1,
                VoronoiFeature::F2 => f2,
                VoronoiFeature::SmoothF1 => 0.5 * (f1 + f2),
            };
            (value, nearest)
        });

        let (min, max) = cells
            .pixels()
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &(v, _)| (lo.min(v), hi.max(v)));
        let mut range = max - min;
        if range < 1e-6 {
            range = 1.0;
        }

        let gray: GrayscaleRaster = cells.map(|&(v, _)| {
            let v = if normalize { (v - min) / range } else { v };
            unit_to_byte(v)
        });
        let color: ColorRaster = cells.map(|&(_, id)| cell_color(id));

        Ok(Outputs::new()
            .with("out_grayscale", TypedValue::grayscale(gray))
            .with("out_color", TypedValue::color(color)))
    }
}

impl_node!(VoronoiTexture);

/// One jittered point per grid cell, row-major, in unit coordinates.
///
/// The grid side is `scale` truncated and clamped to `1..=256`.
pub fn feature_points(scale: f32, randomness: f32, seed: u64) -> Vec<Vec2> {
    let grid = (scale.max(1.0) as u32).min(MAX_GRID);
    let side = grid as f32;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity((grid * grid) as usize);
    for gy in 0..grid {
        for gx in 0..grid {
            let jx: f32 = rng.random_range(-0.5..0.5);
            let jy: f32 = rng.random_range(-0.5..0.5);
            points.push(Vec2::new(
                (gx as f32 + 0.5 + randomness * jx) / side,
                (gy as f32 + 0.5 + randomness * jy) / side,
            ));
        }
    }
    points
}

/// Returns `(index of nearest, F1, F2)`. With a single point F2 equals F1.
fn two_nearest(points: &[Vec2], p: Vec2, metric: DistanceMetric) -> (usize, f32, f32) {
    let mut nearest = 0;
    let mut f1 = f32::MAX;
    let mut f2 = f32::MAX;
    for (i, &point) in points.iter().enumerate() {
        let d = metric.distance(p, point);
        if d < f1 {
            f2 = f1;
            f1 = d;
            nearest = i;
        } else if d < f2 {
            f2 = d;
        }
    }
    if f2 == f32::MAX {
        f2 = f1;
    }
    (nearest, f1, f2)
}

/// Stable opaque color for a cell index.
pub fn cell_color(id: usize) -> Rgba {
    let mut rng = StdRng::seed_from_u64(id as u64);
    Rgba::rgb(rng.random(), rng.random(), rng.random())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::literal_inputs;
    use texgraph_core::Node;

    const SIZE: RasterSize = RasterSize::new(24, 24);

    #[test]
    fn test_feature_points_grid() {
        let points = feature_points(4.0, 0.0, 0);
        assert_eq!(points.len(), 16);
        assert_eq!(points[0], Vec2::new(0.125, 0.125));
        assert_eq!(points[5], Vec2::new(0.375, 0.375));
    }

    #[test]
    fn test_feature_points_stay_in_cell() {
        let points = feature_points(5.0, 1.0, 3);
        for (i, p) in points.iter().enumerate() {
            let (gx, gy) = ((i % 5) as f32, (i / 5) as f32);
            assert!(p.x >= gx / 5.0 && p.x <= (gx + 1.0) / 5.0, "{p:?}");
            assert!(p.y >= gy / 5.0 && p.y <= (gy + 1.0) / 5.0, "{p:?}");
        }
        assert_eq!(points, feature_points(5.0, 1.0, 3));
    }

    #[test]
    fn test_degenerate_scale_yields_one_point() {
        assert_eq!(feature_points(0.0, 1.0, 0).len(), 1);
        assert_eq!(feature_points(-3.0, 1.0, 0).len(), 1);
    }

    #[test]
    fn test_metrics() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, -4.0);
        assert_eq!(DistanceMetric::Euclidean.distance(a, b), 5.0);
        assert_eq!(DistanceMetric::Manhattan.distance(a, b), 7.0);
        assert_eq!(DistanceMetric::Chebyshev.distance(a, b), 4.0);
    }

    #[test]
    fn test_two_nearest() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.3, 0.0)];
        let (id, f1, f2) = two_nearest(&points, Vec2::new(0.2, 0.0), DistanceMetric::Euclidean);
        assert_eq!(id, 2);
        assert!((f1 - 0.1).abs() < 1e-6);
        assert!((f2 - 0.2).abs() < 1e-6);

        let (_, f1, f2) = two_nearest(&points[..1], Vec2::new(0.5, 0.0), DistanceMetric::Euclidean);
        assert_eq!(f1, f2);
    }

    #[test]
    fn test_cell_color_is_stable_and_opaque() {
        assert_eq!(cell_color(7), cell_color(7));
        assert_eq!(cell_color(7).a, 255);
    }

    #[test]
    fn test_voronoi_outputs() {
        let node = VoronoiTexture::new();
        let outputs = node.calculate(&literal_inputs(&node, SIZE), SIZE).unwrap();
        let Some(TypedValue::Grayscale(g)) = outputs.get("out_grayscale") else {
            panic!("missing grayscale output");
        };
        assert_eq!(g.pixels().iter().copied().min(), Some(0));
        assert_eq!(g.pixels().iter().copied().max(), Some(255));
        assert_eq!(outputs.get("out_color").unwrap().kind(), DataKind::Color);
    }

    #[test]
    fn test_f2_never_below_f1() {
        let mut f1_node = VoronoiTexture::new();
        f1_node.ports_mut().set_input_value("in_normalize", false);
        let mut f2_node = VoronoiTexture::new();
        f2_node.ports_mut().set_input_value("in_normalize", false);
        f2_node.ports_mut().set_input_value("in_feature", 1);

        let f1 = f1_node.calculate(&literal_inputs(&f1_node, SIZE), SIZE).unwrap();
        let f2 = f2_node.calculate(&literal_inputs(&f2_node, SIZE), SIZE).unwrap();
        let (Some(TypedValue::Grayscale(a)), Some(TypedValue::Grayscale(b))) =
            (f1.get("out_grayscale"), f2.get("out_grayscale"))
        else {
            panic!("missing grayscale output");
        };
        for (lo, hi) in a.pixels().iter().zip(b.pixels()) {
            assert!(lo <= hi);
        }
    }
}
