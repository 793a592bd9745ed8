//! Integer ids for pins and links, kept in step with a graph.
//!
//! Node editor widgets identify pins ("attributes") and links by plain
//! integers. [`AttributeMap`] hands those out and translates both ways between
//! them and the graph's `(NodeId, PortId)` pairs and [`Connection`]s.
//!
//! ```text
//! Evaluator ──► GraphObserver ──► AttributeMap
//!                                     │
//!     widget pin id ◄── input_attr / output_attr
//!     widget pin id ──► pin(attr) ──► (NodeId, PortId)
//!     widget link id ◄─► link_id / connection
//! ```
//!
//! Ids are never reused: deleting a node and creating a new one gives the new
//! node's pins fresh ids, so a widget can never confuse the two.

use core::fmt;
use std::collections::HashMap;

use texgraph_core::{Connection, Evaluator, GraphNode, GraphObserver, NodeId, PortId};

/// Widget id of an input or output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(pub u32);

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AttrId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Widget id of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LinkId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Which side of a node a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinSide {
    /// Input port.
    Input,
    /// Output port.
    Output,
}

/// The graph port behind an [`AttrId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin {
    /// Owning node.
    pub node: NodeId,
    /// Port id on that node.
    pub port: PortId,
    /// Input or output.
    pub side: PinSide,
}

/// Bidirectional map between graph ports/connections and widget ids.
///
/// Register it as an observer (`Rc<RefCell<AttributeMap>>`) so it follows
/// every mutation, or call [`sync_with`](Self::sync_with) to rebuild it from a
/// graph that was edited while it was detached.
#[derive(Debug, Default)]
pub struct AttributeMap {
    inputs: HashMap<NodeId, HashMap<PortId, AttrId>>,
    outputs: HashMap<NodeId, HashMap<PortId, AttrId>>,
    pins: HashMap<AttrId, Pin>,
    links: HashMap<Connection, LinkId>,
    connections: HashMap<LinkId, Connection>,
    next_attr: u32,
    next_link: u32,
}

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map populated from the current state of `graph`.
    pub fn from_graph(graph: &Evaluator) -> Self {
        let mut map = Self::new();
        map.sync_with(graph);
        map
    }

    /// Discards every mapping and re-registers all nodes and connections of
    /// `graph`.
    ///
    /// New ids continue from the previous counters, so ids handed out before
    /// the rebuild are never given to a different pin or link.
    pub fn sync_with(&mut self, graph: &Evaluator) {
        self.inputs.clear();
        self.outputs.clear();
        self.pins.clear();
        self.links.clear();
        self.connections.clear();

        for node in graph.nodes() {
            self.register_node(node);
        }
        for connection in graph.connections() {
            self.register_connection(*connection);
        }
    }

    // --- Forward lookups ---

    /// Pin id of an input port.
    pub fn input_attr(&self, node: NodeId, port: &str) -> Option<AttrId> {
        self.inputs.get(&node)?.get(port).copied()
    }

    /// Pin id of an output port.
    pub fn output_attr(&self, node: NodeId, port: &str) -> Option<AttrId> {
        self.outputs.get(&node)?.get(port).copied()
    }

    /// Link id of a connection.
    pub fn link_id(&self, connection: &Connection) -> Option<LinkId> {
        self.links.get(connection).copied()
    }

    // --- Backward lookups ---

    /// The port behind a pin id.
    pub fn pin(&self, attr: AttrId) -> Option<Pin> {
        self.pins.get(&attr).copied()
    }

    /// The connection behind a link id.
    pub fn connection(&self, link: LinkId) -> Option<Connection> {
        self.connections.get(&link).copied()
    }

    /// Builds the connection a user drew between two pins.
    ///
    /// The pins may be given in either order; returns `None` unless exactly
    /// one is an output and the other an input.
    pub fn connection_between(&self, a: AttrId, b: AttrId) -> Option<Connection> {
        let (a, b) = (self.pin(a)?, self.pin(b)?);
        let (source, target) = match (a.side, b.side) {
            (PinSide::Output, PinSide::Input) => (a, b),
            (PinSide::Input, PinSide::Output) => (b, a),
            _ => return None,
        };
        Some(Connection::new(
            source.node,
            source.port,
            target.node,
            target.port,
        ))
    }

    // --- Counts ---

    /// Number of live pins.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Number of live links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty() && self.links.is_empty()
    }

    // --- Internal helpers ---

    fn allocate_attr(&mut self) -> AttrId {
        let id = AttrId(self.next_attr);
        self.next_attr += 1;
        id
    }

    fn register_node(&mut self, node: &GraphNode) {
        let id = node.id();
        for port in node.ports().inputs() {
            let attr = self.allocate_attr();
            self.inputs.entry(id).or_default().insert(port.id, attr);
            self.pins.insert(attr, Pin { node: id, port: port.id, side: PinSide::Input });
        }
        for port in node.ports().outputs() {
            let attr = self.allocate_attr();
            self.outputs.entry(id).or_default().insert(port.id, attr);
            self.pins.insert(attr, Pin { node: id, port: port.id, side: PinSide::Output });
        }
    }

    fn register_connection(&mut self, connection: Connection) {
        if self.links.contains_key(&connection) {
            return;
        }
        let link = LinkId(self.next_link);
        self.next_link += 1;
        self.links.insert(connection, link);
        self.connections.insert(link, connection);
    }

    fn unregister_connection(&mut self, connection: &Connection) {
        if let Some(link) = self.links.remove(connection) {
            self.connections.remove(&link);
        }
    }
}

impl GraphObserver for AttributeMap {
    fn on_node_added(&mut self, node: &GraphNode) {
        self.register_node(node);
    }

    fn on_node_removed(&mut self, id: NodeId) {
        self.inputs.remove(&id);
        self.outputs.remove(&id);
        self.pins.retain(|_, pin| pin.node != id);

        // Usually empty: the evaluator reports a node's connections removed first.
        let stale: Vec<Connection> = self
            .links
            .keys()
            .filter(|c| c.source_node == id || c.target_node == id)
            .copied()
            .collect();
        for connection in &stale {
            self.unregister_connection(connection);
        }
    }

    fn on_connection_added(&mut self, connection: &Connection) {
        self.register_connection(*connection);
    }

    fn on_connection_removed(&mut self, connection: &Connection) {
        self.unregister_connection(connection);
    }
}
