//! Graph store, mutation API and memoized evaluation.
//!
//! [`Evaluator`] is the single owner of the graph: nodes, both connection
//! indices, the per-node dirty flags and output caches. Everything outside it
//! reads the graph through shared references or observes it through
//! [`GraphObserver`] notifications.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use crate::buffer::{ColorRaster, RasterSize, Rgba};
use crate::convert::can_convert;
use crate::error::{EvalError, GraphError};
use crate::node::Inputs;
use crate::port::{LiteralValue, PortId};
use crate::value::{DataKind, TypedValue};

use super::catalog::NodeCatalog;
use super::observer::{GraphObserver, ObserverHandle, ObserverList};
use super::{Connection, GraphNode, NodeId};

/// Owns a node graph and evaluates it on demand.
///
/// All mutations are validated before anything changes: a rejected call
/// leaves nodes, connections and caches exactly as they were.
///
/// The evaluator is single-threaded (observers are `Rc<RefCell<_>>`). Hosts
/// that render on another thread should evaluate here and hand the resulting
/// `Arc<ColorRaster>` across.
pub struct Evaluator {
    catalog: NodeCatalog,
    nodes: BTreeMap<NodeId, GraphNode>,
    /// Target port → its single incoming connection.
    inputs: BTreeMap<(NodeId, PortId), Connection>,
    /// Source port → fan-out list, in insertion order.
    outputs: HashMap<(NodeId, PortId), Vec<Connection>>,
    next_id: u32,
    observers: ObserverList,
}

impl Evaluator {
    /// Creates an empty graph that instantiates nodes from `catalog`.
    pub fn new(catalog: NodeCatalog) -> Self {
        Self {
            catalog,
            nodes: BTreeMap::new(),
            inputs: BTreeMap::new(),
            outputs: HashMap::new(),
            next_id: 1,
            observers: ObserverList::default(),
        }
    }

    // --- Nodes ---

    /// Creates a node of `kind`.
    ///
    /// Returns [`NodeId::INVALID`] if the kind is not in the catalog.
    pub fn add_node(&mut self, kind: &str) -> NodeId {
        self.try_add_node(kind).unwrap_or(NodeId::INVALID)
    }

    /// Creates a node of `kind`, reporting unknown kinds as an error.
    pub fn try_add_node(&mut self, kind: &str) -> Result<NodeId, GraphError> {
        let Some(descriptor) = self.catalog.get(kind) else {
            #[cfg(feature = "tracing")]
            tracing::debug!("graph_add: unknown node kind '{kind}'");
            return Err(GraphError::UnknownNodeKind(kind.to_string()));
        };
        let (kind, display_name) = (descriptor.kind, descriptor.name);
        let node = self
            .catalog
            .create(kind)
            .ok_or_else(|| GraphError::UnknownNodeKind(kind.to_string()))?;

        let id = NodeId(self.next_id);
        self.next_id += 1;
        let name = format!("{display_name} #{}", id.index());
        self.nodes.insert(id, GraphNode::new(id, name, kind, node));

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: {kind} node {id}");
        if let Some(node) = self.nodes.get(&id) {
            self.observers.notify(|o| o.on_node_added(node));
        }
        Ok(id)
    }

    /// Deletes a node and every connection touching it.
    ///
    /// Returns false if the node does not exist.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let input_ports: Vec<PortId> = node.ports().inputs().iter().map(|p| p.id).collect();
        let output_ports: Vec<PortId> = node.ports().outputs().iter().map(|p| p.id).collect();

        for port in input_ports {
            if let Some(connection) = self.inputs.get(&(id, port)).copied() {
                self.remove_connection_internal(&connection);
            }
        }
        for port in output_ports {
            // Snapshot: removal mutates the fan-out list being walked.
            let fan_out = self.outputs.get(&(id, port)).cloned().unwrap_or_default();
            for connection in &fan_out {
                self.remove_connection_internal(connection);
            }
        }

        self.nodes.remove(&id);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: node {id}");
        self.observers.notify(|o| o.on_node_removed(id));
        true
    }

    /// Writes a literal on an input port and invalidates the node.
    ///
    /// Returns false if the node or port does not exist or the value does
    /// not fit the port.
    pub fn set_node_input_value(
        &mut self,
        id: NodeId,
        port: &str,
        value: impl Into<LiteralValue>,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if !node.node.ports_mut().set_input_value(port, value) {
            #[cfg(feature = "tracing")]
            tracing::debug!("graph_set: rejected literal for {id}.{port}");
            return false;
        }
        self.mark_dirty(id);
        true
    }

    /// Renames a node. Names are cosmetic and need not be unique.
    pub fn set_node_name(&mut self, id: NodeId, name: impl Into<String>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_name(name.into());
                true
            }
            None => false,
        }
    }

    // --- Connections ---

    /// Installs a connection.
    ///
    /// Fails if an endpoint is missing, the port kinds are incompatible, the
    /// identical connection already exists, or the edge would close a cycle.
    /// If the target input is already fed by another connection, that
    /// connection is removed first (observers see the removal, then the
    /// addition).
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        let evicted = match self.validate_connection(&connection) {
            Ok(evicted) => evicted,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("graph_connect: rejected {connection}: {err}");
                return Err(err);
            }
        };

        if let Some(old) = evicted {
            self.remove_connection_internal(&old);
        }

        self.inputs
            .insert((connection.target_node, connection.target_port), connection);
        self.outputs
            .entry((connection.source_node, connection.source_port))
            .or_default()
            .push(connection);
        self.mark_dirty(connection.target_node);

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {connection}");
        self.observers.notify(|o| o.on_connection_added(&connection));
        Ok(())
    }

    /// Removes a connection.
    ///
    /// Returns false if the target input is not fed by exactly this connection.
    pub fn delete_connection(&mut self, connection: &Connection) -> bool {
        let Some(port) = self.input_port_id(connection.target_node, connection.target_port) else {
            return false;
        };
        match self.inputs.get(&(connection.target_node, port)) {
            Some(existing) if existing == connection => {
                let existing = *existing;
                self.remove_connection_internal(&existing);
                true
            }
            _ => false,
        }
    }

    /// Returns true if an edge `source → target` would close a cycle.
    ///
    /// Walks backward from `source` through existing input connections and
    /// reports whether `target` is reachable. A self-loop is a cycle.
    pub fn would_create_cycle(&self, source: NodeId, target: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![source];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(self.incoming(current).map(|c| c.source_node));
        }
        false
    }

    // --- Invalidation ---

    /// Marks `id` and everything downstream of it dirty.
    ///
    /// Propagation stops at nodes that are already dirty: their downstream
    /// closure is dirty too, because evaluation cleans a node only together
    /// with all of its upstream.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&current) else {
                continue;
            };
            if node.dirty {
                continue;
            }
            node.dirty = true;
            #[cfg(feature = "tracing")]
            tracing::trace!("graph_dirty: {current}");

            for port in node.node.ports().outputs() {
                if let Some(fan_out) = self.outputs.get(&(current, port.id)) {
                    stack.extend(fan_out.iter().map(|c| c.target_node));
                }
            }
        }
    }

    /// Returns true if the node's cache may be stale (or the node is absent).
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_none_or(|n| n.dirty)
    }

    // --- Evaluation ---

    /// Evaluates one output port of a node at `size`.
    ///
    /// Clean nodes answer from their cache when the cached value is valid for
    /// `size`. Otherwise every input is resolved (connected ports recursively,
    /// unconnected ports from their literal), the node is recalculated, and
    /// its outputs replace the cache.
    pub fn evaluate(
        &mut self,
        id: NodeId,
        port: &str,
        size: RasterSize,
    ) -> Result<TypedValue, EvalError> {
        let node = self.nodes.get(&id).ok_or(EvalError::NodeNotFound(id))?;
        if node.is_sink() {
            return Err(EvalError::NotEvaluable(id));
        }
        if !node.dirty
            && let Some(cached) = node.cache.get(port)
            && cached.is_valid_for(size)
        {
            #[cfg(feature = "tracing")]
            tracing::trace!("graph_eval: cache hit {id}.{port}");
            return Ok(cached.clone());
        }

        let declared: Vec<(PortId, Option<LiteralValue>)> = node
            .ports()
            .inputs()
            .iter()
            .map(|p| (p.id, p.value))
            .collect();

        let mut inputs = Inputs::new(size);
        for (input_port, literal) in declared {
            if let Some(connection) = self.inputs.get(&(id, input_port)).copied() {
                let value = self.evaluate(connection.source_node, connection.source_port, size)?;
                inputs.insert(input_port, value);
            } else if let Some(literal) = literal {
                inputs.insert(input_port, literal.to_typed(size));
            }
        }

        let node = self.nodes.get_mut(&id).ok_or(EvalError::NodeNotFound(id))?;
        #[cfg(feature = "tracing")]
        tracing::trace!("graph_eval: calculate {id} ({}) at {size}", node.kind());
        let outputs = node
            .node
            .calculate(&inputs, size)
            .map_err(|source| EvalError::Input { node: id, source })?;
        node.cache = outputs;
        node.dirty = false;

        match node.cache.get(port) {
            Some(value) => Ok(value.clone()),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!("graph_eval: {id} did not produce '{port}', using cleared raster");
                Ok(TypedValue::color(ColorRaster::new(size)))
            }
        }
    }

    /// Evaluates the graph's output node at `size`.
    ///
    /// Uses the sink with the lowest id. Returns a flat black raster when
    /// there is no sink, its color input is unconnected, or the connected
    /// value cannot be converted to color.
    pub fn evaluate_final_output(&mut self, size: RasterSize) -> Result<Arc<ColorRaster>, EvalError> {
        match self.nodes.values().find(|n| n.is_sink()).map(GraphNode::id) {
            Some(sink) => self.evaluate_output_node(sink, size),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!("graph_eval: no output node, using black");
                Ok(black(size))
            }
        }
    }

    /// Evaluates the value feeding the color input of sink `id`.
    ///
    /// Same fallbacks as [`evaluate_final_output`](Self::evaluate_final_output).
    /// Any node that is not a sink is `NotEvaluable`.
    pub fn evaluate_output_node(
        &mut self,
        id: NodeId,
        size: RasterSize,
    ) -> Result<Arc<ColorRaster>, EvalError> {
        let node = self.nodes.get(&id).ok_or(EvalError::NodeNotFound(id))?;
        if !node.is_sink() {
            return Err(EvalError::NotEvaluable(id));
        }
        let Some(port) = node
            .ports()
            .inputs()
            .iter()
            .find(|p| p.kind == DataKind::Color)
            .map(|p| p.id)
        else {
            return Ok(black(size));
        };
        let Some(connection) = self.inputs.get(&(id, port)).copied() else {
            return Ok(black(size));
        };

        let value = self.evaluate(connection.source_node, connection.source_port, size)?;
        match value.convert(DataKind::Color, size) {
            Some(TypedValue::Color(raster)) => Ok(raster),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!("graph_eval: {} output not convertible to color", value.kind());
                Ok(black(size))
            }
        }
    }

    // --- Read access ---

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// All connections, ordered by target node and port.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.inputs.values()
    }

    /// The connection feeding `port` on node `id`, if any.
    pub fn incoming_connection(&self, id: NodeId, port: &str) -> Option<&Connection> {
        let port = self.input_port_id(id, port)?;
        self.inputs.get(&(id, port))
    }

    /// Connections leaving output `port` on node `id`, in insertion order.
    pub fn outgoing_connections(&self, id: NodeId, port: &str) -> &[Connection] {
        self.output_port_id(id, port)
            .and_then(|port| self.outputs.get(&(id, port)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The cached value of an output port, regardless of dirtiness.
    pub fn cached_output(&self, id: NodeId, port: &str) -> Option<&TypedValue> {
        self.nodes.get(&id)?.cache.get(port)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of connections.
    pub fn connection_count(&self) -> usize {
        self.inputs.len()
    }

    /// The catalog nodes are created from.
    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    // --- Observers ---

    /// Subscribes an observer. Observers are notified in registration order.
    pub fn add_observer<O: GraphObserver + 'static>(
        &mut self,
        observer: Rc<RefCell<O>>,
    ) -> ObserverHandle {
        self.observers.add(observer)
    }

    /// Unsubscribes an observer. Returns false for an unknown handle.
    pub fn remove_observer(&mut self, handle: ObserverHandle) -> bool {
        self.observers.remove(handle)
    }

    /// Number of subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // --- Internal helpers ---

    /// Canonical id of an input port, or `None` if node or port is missing.
    fn input_port_id(&self, id: NodeId, port: &str) -> Option<PortId> {
        self.nodes.get(&id)?.ports().input(port).map(|p| p.id)
    }

    fn output_port_id(&self, id: NodeId, port: &str) -> Option<PortId> {
        self.nodes.get(&id)?.ports().output(port).map(|p| p.id)
    }

    /// Connections feeding any input of `id`.
    fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Connection> {
        self.inputs
            .range((id, "")..)
            .take_while(move |((target, _), _)| *target == id)
            .map(|(_, c)| c)
    }

    /// Checks every rejection rule without mutating anything.
    ///
    /// On success returns the connection that currently occupies the target
    /// input, which must be evicted.
    fn validate_connection(&self, c: &Connection) -> Result<Option<Connection>, GraphError> {
        let source = self
            .nodes
            .get(&c.source_node)
            .ok_or(GraphError::NodeNotFound(c.source_node))?;
        let target = self
            .nodes
            .get(&c.target_node)
            .ok_or(GraphError::NodeNotFound(c.target_node))?;

        let source_port =
            source
                .ports()
                .output(c.source_port)
                .ok_or_else(|| GraphError::PortNotFound {
                    node: c.source_node,
                    port: c.source_port.to_string(),
                })?;
        let target_port =
            target
                .ports()
                .input(c.target_port)
                .ok_or_else(|| GraphError::PortNotFound {
                    node: c.target_node,
                    port: c.target_port.to_string(),
                })?;

        if !can_convert(source_port.kind, target_port.kind) {
            return Err(GraphError::TypeIncompatible {
                from: source_port.kind,
                to: target_port.kind,
            });
        }

        let occupant = self.inputs.get(&(c.target_node, c.target_port)).copied();
        if occupant.as_ref() == Some(c) {
            return Err(GraphError::DuplicateConnection);
        }

        if self.would_create_cycle(c.source_node, c.target_node) {
            return Err(GraphError::CycleDetected {
                source_node: c.source_node,
                target_node: c.target_node,
            });
        }

        Ok(occupant)
    }

    /// Unlinks a connection known to be in both indices, invalidates its
    /// target and notifies observers.
    fn remove_connection_internal(&mut self, c: &Connection) {
        self.inputs.remove(&(c.target_node, c.target_port));
        let key = (c.source_node, c.source_port);
        if let Some(fan_out) = self.outputs.get_mut(&key) {
            fan_out.retain(|existing| existing != c);
            if fan_out.is_empty() {
                self.outputs.remove(&key);
            }
        }
        self.mark_dirty(c.target_node);

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: {c}");
        self.observers.notify(|o| o.on_connection_removed(c));
    }
}

impl core::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Evaluator")
            .field("nodes", &self.nodes.len())
            .field("connections", &self.inputs.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

fn black(size: RasterSize) -> Arc<ColorRaster> {
    Arc::new(ColorRaster::filled(size, Rgba::BLACK))
}
