//! Node graph store and evaluator.
//!
//! The graph is edited through [`Evaluator`] mutations (add/remove nodes and
//! connections, edit literals) and evaluated lazily on demand:
//!
//! - **Topology**: connections are indexed by target port (at most one per
//!   input) and by source port (fan-out list). Every insertion is checked for
//!   type compatibility and cycles, so the graph is a DAG at all times.
//! - **Invalidation**: each node carries a dirty flag. An edit marks the node
//!   and everything downstream of it dirty, stopping at nodes already dirty.
//! - **Evaluation**: a depth-first post-order walk from the requested output.
//!   Clean nodes return their cached outputs when the cached raster size
//!   matches the request; everything else is recalculated and re-cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use texgraph_core::{Connection, RasterSize};
//!
//! let mut graph = texgraph_registry::builtin_evaluator();
//! let noise = graph.add_node("noise_texture");
//! let output = graph.add_node("texture_output");
//!
//! graph.set_node_input_value(noise, "in_scale", 5.0);
//! graph.add_connection(Connection::new(noise, "out_color", output, "in_color"))?;
//!
//! let image = graph.evaluate_final_output(RasterSize::new(64, 64))?;
//! ```

pub mod catalog;
pub mod evaluator;
pub mod observer;

use core::fmt;

use crate::node::{Node, Outputs};
use crate::port::{PortId, Ports};

pub use catalog::{NodeCatalog, NodeCategory, NodeDescriptor, NodeFactory};
pub use evaluator::Evaluator;
pub use observer::{GraphObserver, ObserverHandle};

/// Unique identifier for a node in the graph.
///
/// Ids are assigned sequentially from 1 and never reused within an
/// evaluator. `0` is reserved as [`NodeId::INVALID`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel returned when a node could not be created.
    pub const INVALID: NodeId = NodeId(0);

    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Returns false for the [`INVALID`](Self::INVALID) sentinel.
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A directed edge from an output port to an input port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Connection {
    /// Producing node.
    pub source_node: NodeId,
    /// Output port on the producing node.
    pub source_port: PortId,
    /// Consuming node.
    pub target_node: NodeId,
    /// Input port on the consuming node.
    pub target_port: PortId,
}

impl Connection {
    /// Creates a connection from `source_node.source_port` to
    /// `target_node.target_port`.
    pub const fn new(
        source_node: NodeId,
        source_port: PortId,
        target_node: NodeId,
        target_port: PortId,
    ) -> Self {
        Self {
            source_node,
            source_port,
            target_node,
            target_port,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} → {}.{}",
            self.source_node, self.source_port, self.target_node, self.target_port
        )
    }
}

/// A live node instance with its evaluation state.
pub struct GraphNode {
    id: NodeId,
    name: String,
    kind: &'static str,
    pub(crate) node: Box<dyn Node>,
    /// Cached outputs may be stale.
    pub(crate) dirty: bool,
    /// Outputs from the last `calculate`.
    pub(crate) cache: Outputs,
}

impl GraphNode {
    pub(crate) fn new(id: NodeId, name: String, kind: &'static str, node: Box<dyn Node>) -> Self {
        Self {
            id,
            name,
            kind,
            node,
            dirty: true,
            cache: Outputs::new(),
        }
    }

    /// Node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display name, e.g. `"Noise Texture #3"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Catalog kind this node was created from.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The node's port table.
    pub fn ports(&self) -> &Ports {
        self.node.ports()
    }

    /// The node implementation.
    pub fn node(&self) -> &dyn Node {
        self.node.as_ref()
    }

    /// Returns true for the terminal output node.
    pub fn is_sink(&self) -> bool {
        self.node.is_sink()
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
