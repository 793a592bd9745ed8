//! Property-based tests for the texgraph graph evaluator.
//!
//! Random connection sequences are applied to a small graph of summing nodes;
//! the tests check the DAG invariant, the single-incoming-edge invariant,
//! invalidation reach and cache determinism.

use std::collections::{BTreeSet, HashMap, HashSet};

use proptest::prelude::*;
use texgraph_core::convert::{color_to_grayscale, grayscale_to_color};
use texgraph_core::{
    Connection, DataKind, Evaluator, GrayscaleRaster, GraphError, InputError, InputPort, Inputs,
    Node, NodeCatalog, NodeCategory, NodeDescriptor, NodeId, OutputPort, Outputs, Ports,
    RasterSize, TypedValue,
};

const SIZE: RasterSize = RasterSize::new(4, 4);
const INPUT_PORTS: [&str; 2] = ["in_a", "in_b"];

/// Sums its two inputs and an offset literal.
struct Sum {
    ports: Ports,
}

impl Node for Sum {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn calculate(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError> {
        let total = inputs.required::<f32>("in_a")?
            + inputs.required::<f32>("in_b")?
            + inputs.required::<f32>("in_offset")?;
        let gray = GrayscaleRaster::filled(size, (total * 10.0) as u8);
        Ok(Outputs::new()
            .with("out_sum", TypedValue::Number(total))
            .with("out_gray", TypedValue::grayscale(gray)))
    }
}

fn sum_node() -> Box<dyn Node> {
    let mut ports = Ports::new();
    ports
        .register_input(InputPort::new("in_a", "A", DataKind::Number).with_default(0.0))
        .register_input(InputPort::new("in_b", "B", DataKind::Number).with_default(0.0))
        .register_input(InputPort::new("in_offset", "Offset", DataKind::Number).with_default(1.0))
        .register_output(OutputPort::new("out_sum", "Sum", DataKind::Number))
        .register_output(OutputPort::new("out_gray", "Gray", DataKind::Grayscale));
    Box::new(Sum { ports })
}

fn graph_with(nodes: usize) -> (Evaluator, Vec<NodeId>) {
    let mut catalog = NodeCatalog::new();
    catalog.register(
        NodeDescriptor {
            kind: "sum",
            name: "Sum",
            description: "Adds inputs",
            category: NodeCategory::Converter,
        },
        sum_node,
    );
    let mut graph = Evaluator::new(catalog);
    let ids = (0..nodes).map(|_| graph.add_node("sum")).collect();
    (graph, ids)
}

fn edge(ids: &[NodeId], (from, to, port, gray): (usize, usize, usize, bool)) -> Connection {
    let source_port = if gray { "out_gray" } else { "out_sum" };
    Connection::new(
        ids[from % ids.len()],
        source_port,
        ids[to % ids.len()],
        INPUT_PORTS[port % INPUT_PORTS.len()],
    )
}

fn snapshot(graph: &Evaluator) -> BTreeSet<Connection> {
    graph.connections().copied().collect()
}

/// Kahn's algorithm over the current connection set.
fn is_acyclic(graph: &Evaluator) -> bool {
    let mut indegree: HashMap<NodeId, usize> = graph.nodes().map(|n| (n.id(), 0)).collect();
    let mut edges: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for c in graph.connections() {
        *indegree.entry(c.target_node).or_default() += 1;
        edges.entry(c.source_node).or_default().push(c.target_node);
    }
    let mut ready: Vec<NodeId> = indegree.iter().filter(|(_, d)| **d == 0).map(|(id, _)| *id).collect();
    let mut visited = 0;
    while let Some(id) = ready.pop() {
        visited += 1;
        for target in edges.get(&id).into_iter().flatten() {
            let d = indegree.get_mut(target).unwrap();
            *d -= 1;
            if *d == 0 {
                ready.push(*target);
            }
        }
    }
    visited == indegree.len()
}

fn downstream_closure(graph: &Evaluator, start: NodeId) -> HashSet<NodeId> {
    let mut seen = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        for c in graph.connections().filter(|c| c.source_node == id) {
            if seen.insert(c.target_node) {
                stack.push(c.target_node);
            }
        }
    }
    seen
}

fn edges_strategy() -> impl Strategy<Value = Vec<(usize, usize, usize, bool)>> {
    prop::collection::vec((0usize..8, 0usize..8, 0usize..2, any::<bool>()), 0..24)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any sequence of connection attempts leaves a DAG, and every rejected
    /// attempt leaves the connection set untouched.
    #[test]
    fn connections_stay_acyclic(nodes in 2usize..8, edges in edges_strategy()) {
        let (mut graph, ids) = graph_with(nodes);
        for e in edges {
            let before = snapshot(&graph);
            let c = edge(&ids, e);
            match graph.add_connection(c) {
                Ok(()) => prop_assert!(graph.connections().any(|x| *x == c)),
                Err(GraphError::CycleDetected { .. } | GraphError::DuplicateConnection) => {
                    prop_assert_eq!(&before, &snapshot(&graph));
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            prop_assert!(is_acyclic(&graph));
        }
    }

    /// Every input port has at most one incoming connection, and the fan-out
    /// index agrees with the target index.
    #[test]
    fn single_incoming_edge(nodes in 2usize..8, edges in edges_strategy(), deletions in prop::collection::vec(0usize..8, 0..4)) {
        let (mut graph, ids) = graph_with(nodes);
        for e in edges {
            let _ = graph.add_connection(edge(&ids, e));
        }
        for d in deletions {
            graph.delete_node(ids[d % ids.len()]);
        }

        let mut targets = HashSet::new();
        for c in graph.connections() {
            prop_assert!(targets.insert((c.target_node, c.target_port)));
            prop_assert_eq!(graph.incoming_connection(c.target_node, c.target_port), Some(c));
        }
        let fan_out: usize = graph
            .nodes()
            .flat_map(|n| n.ports().outputs().iter().map(move |p| (n.id(), p.id)))
            .map(|(id, port)| graph.outgoing_connections(id, port).len())
            .sum();
        prop_assert_eq!(fan_out, graph.connection_count());
    }

    /// Editing a literal on one node marks exactly its downstream closure dirty.
    #[test]
    fn literal_edit_invalidates_downstream(
        nodes in 2usize..8,
        edges in edges_strategy(),
        pick in 0usize..8,
        offset in -4.0f32..4.0,
    ) {
        let (mut graph, ids) = graph_with(nodes);
        for e in edges {
            let _ = graph.add_connection(edge(&ids, e));
        }
        for &id in &ids {
            graph.evaluate(id, "out_sum", SIZE).unwrap();
        }
        prop_assert!(ids.iter().all(|&id| !graph.is_dirty(id)));

        let edited = ids[pick % ids.len()];
        prop_assert!(graph.set_node_input_value(edited, "in_offset", offset));

        let expected = downstream_closure(&graph, edited);
        for &id in &ids {
            prop_assert_eq!(graph.is_dirty(id), expected.contains(&id), "node {}", id);
        }
    }

    /// Connecting into a node marks exactly the target's downstream closure dirty.
    #[test]
    fn connection_invalidates_downstream(nodes in 3usize..8, edges in edges_strategy(), extra in (0usize..8, 0usize..8, 0usize..2, any::<bool>())) {
        let (mut graph, ids) = graph_with(nodes);
        for e in edges {
            let _ = graph.add_connection(edge(&ids, e));
        }
        for &id in &ids {
            graph.evaluate(id, "out_sum", SIZE).unwrap();
        }

        let c = edge(&ids, extra);
        if graph.add_connection(c).is_ok() {
            let expected = downstream_closure(&graph, c.target_node);
            for &id in &ids {
                prop_assert_eq!(graph.is_dirty(id), expected.contains(&id));
            }
        } else {
            prop_assert!(ids.iter().all(|&id| !graph.is_dirty(id)));
        }
    }

    /// A clean node's cache equals a forced recalculation.
    #[test]
    fn cache_matches_recalculation(nodes in 2usize..8, edges in edges_strategy(), pick in 0usize..8) {
        let (mut graph, ids) = graph_with(nodes);
        for e in edges {
            let _ = graph.add_connection(edge(&ids, e));
        }
        let id = ids[pick % ids.len()];
        let cached = graph.evaluate(id, "out_gray", SIZE).unwrap();
        prop_assert!(!graph.is_dirty(id));

        graph.mark_dirty(id);
        let fresh = graph.evaluate(id, "out_gray", SIZE).unwrap();
        prop_assert_eq!(cached, fresh);
    }

    /// Gray → color → gray reproduces every sample within one step.
    #[test]
    fn grayscale_color_round_trip(samples in prop::collection::vec(any::<u8>(), 64)) {
        let gray = GrayscaleRaster::from_pixels(RasterSize::new(8, 8), samples).unwrap();
        let back = color_to_grayscale(&grayscale_to_color(&gray));
        for (a, b) in gray.pixels().iter().zip(back.pixels()) {
            prop_assert!(a.abs_diff(*b) <= 1, "{} vs {}", a, b);
        }
    }
}
