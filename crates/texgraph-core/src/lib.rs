//! texgraph core: typed values, nodes and the graph evaluator.
//!
//! This crate holds the engine behind procedural pixel textures: a graph of
//! computation nodes wired output-to-input, evaluated lazily into a raster.
//!
//! # Core Abstractions
//!
//! ## Values
//!
//! - [`TypedValue`] - Color raster, grayscale raster, vector field or number
//! - [`DataKind`] and [`can_convert`] - the conversion policy between kinds
//! - [`Raster`], [`RasterSize`], [`Rgba`] - pixel buffers
//!
//! ## Nodes
//!
//! - [`Node`] - object-safe trait with a pure `calculate`
//! - [`Ports`], [`InputPort`], [`OutputPort`] - port declarations
//! - [`LiteralValue`] - authored values on unconnected inputs
//! - [`Inputs`] / [`Outputs`] - per-evaluation value maps
//!
//! ## Graph
//!
//! - [`Evaluator`] - graph store, mutation API and memoized evaluation
//! - [`NodeCatalog`] - kind-keyed node factories
//! - [`GraphObserver`] - mutation notifications for UI adapters
//!
//! # Features
//!
//! - `tracing` (default): debug logs for graph mutations, trace logs for
//!   evaluation
//! - `serde`: `Serialize`/`Deserialize` for [`RasterSize`] and [`Rgba`]

pub mod buffer;
pub mod convert;
pub mod error;
pub mod graph;
pub mod node;
pub mod port;
pub mod value;

pub use buffer::{
    ColorRaster, GrayscaleRaster, ParseSizeError, Raster, RasterSize, Rgba, VectorField,
};
pub use convert::can_convert;
pub use error::{EvalError, GraphError, InputError};
pub use graph::{
    Connection, Evaluator, GraphNode, GraphObserver, NodeCatalog, NodeCategory, NodeDescriptor,
    NodeFactory, NodeId, ObserverHandle,
};
pub use node::{InputValue, Inputs, Node, Outputs};
pub use port::{
    ChoiceList, InputPort, LiteralType, LiteralValue, OutputPort, PortId, PortMetadata, Ports,
};
pub use value::{DataKind, TypedValue};

/// Re-exported so node crates share one vector type.
pub use glam::Vec2;
