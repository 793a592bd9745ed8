//! Editor-side bookkeeping for texgraph node graphs.
//!
//! Node editor widgets address pins and links by integer ids. This crate keeps
//! those ids in step with an [`Evaluator`](texgraph_core::Evaluator) by
//! observing its mutations, so the core graph never has to know about UI
//! numbering.
//!
//! # Modules
//!
//! - [`attributes`]: pin and link id allocation with lookups in both directions

pub mod attributes;

pub use attributes::{AttrId, AttributeMap, LinkId, Pin, PinSide};
