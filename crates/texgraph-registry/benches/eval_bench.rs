//! Criterion benchmarks for graph evaluation over the built-in nodes.
//!
//! Two axes:
//!
//! - **Cold**: every evaluation follows an edit, so the whole chain recalculates
//! - **Cached**: the graph is clean and evaluation answers from node caches
//!
//! Run with: `cargo bench -p texgraph-registry`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use texgraph_core::{Connection, Evaluator, NodeId, RasterSize};
use texgraph_registry::builtin_evaluator;

const SIZES: &[u32] = &[32, 64, 128, 256];

// ---------------------------------------------------------------------------
// Graph constructors
// ---------------------------------------------------------------------------

/// `kind` → output. Returns the graph and the source node.
fn make_single(kind: &str) -> (Evaluator, NodeId) {
    let mut graph = builtin_evaluator();
    let source = graph.add_node(kind);
    let output = graph.add_node("texture_output");
    graph
        .add_connection(Connection::new(source, "out_color", output, "in_color"))
        .unwrap();
    (graph, source)
}

/// Typical material chain: noise and voronoi mixed, then hue shifted.
fn make_material() -> (Evaluator, NodeId) {
    let mut graph = builtin_evaluator();
    let noise = graph.add_node("noise_texture");
    let voronoi = graph.add_node("voronoi_texture");
    let mix = graph.add_node("mix_color");
    let hsv = graph.add_node("hsv");
    let output = graph.add_node("texture_output");

    graph.set_node_input_value(mix, "in_blending_mode", 2);
    graph.set_node_input_value(mix, "in_factor", 0.6);
    for connection in [
        Connection::new(noise, "out_color", mix, "in_color1"),
        Connection::new(voronoi, "out_color", mix, "in_color2"),
        Connection::new(mix, "out_result", hsv, "in_color"),
        Connection::new(hsv, "out_color", output, "in_color"),
    ] {
        graph.add_connection(connection).unwrap();
    }
    (graph, noise)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_cold(c: &mut Criterion, name: &str, make: impl Fn() -> (Evaluator, NodeId)) {
    let mut group = c.benchmark_group(format!("{name}/cold"));

    for &side in SIZES {
        let size = RasterSize::square(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            let (mut graph, head) = make();
            b.iter(|| {
                graph.mark_dirty(head);
                black_box(graph.evaluate_final_output(black_box(size)).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_cached(c: &mut Criterion, name: &str, make: impl Fn() -> (Evaluator, NodeId)) {
    let mut group = c.benchmark_group(format!("{name}/cached"));

    for &side in SIZES {
        let size = RasterSize::square(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            let (mut graph, _) = make();
            graph.evaluate_final_output(size).unwrap();
            b.iter(|| black_box(graph.evaluate_final_output(black_box(size)).unwrap()))
        });
    }

    group.finish();
}

fn bench_noise(c: &mut Criterion) {
    bench_cold(c, "noise", || make_single("noise_texture"));
}

fn bench_voronoi(c: &mut Criterion) {
    bench_cold(c, "voronoi", || make_single("voronoi_texture"));
}

fn bench_gradient(c: &mut Criterion) {
    bench_cold(c, "gradient", || make_single("gradient_texture"));
}

fn bench_material(c: &mut Criterion) {
    bench_cold(c, "material", make_material);
    bench_cached(c, "material", make_material);
}

criterion_group!(
    benches,
    bench_noise,
    bench_voronoi,
    bench_gradient,
    bench_material,
);

criterion_main!(benches);
