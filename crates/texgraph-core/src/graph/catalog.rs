//! Kind-keyed factory table for node creation.
//!
//! The catalog maps a stable kind id (lowercase, no spaces) to a descriptor and
//! a constructor. The evaluator owns one and instantiates nodes through it; UIs
//! enumerate it to build "add node" menus.

use crate::node::Node;

/// Grouping used to organise the "add node" menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Constant sources (value, RGB).
    Input,
    /// Procedural textures (noise, voronoi, gradient).
    Texture,
    /// Geometric patterns (checker, circle, rectangle).
    Pattern,
    /// Color operators (mix, HSV, invert).
    Color,
    /// Vector operators (mapping, combine/separate XY).
    Vector,
    /// Scalar operators (math).
    Converter,
    /// Graph output.
    Output,
}

impl NodeCategory {
    /// All categories in menu order.
    pub const ALL: [NodeCategory; 7] = [
        NodeCategory::Input,
        NodeCategory::Texture,
        NodeCategory::Pattern,
        NodeCategory::Color,
        NodeCategory::Vector,
        NodeCategory::Converter,
        NodeCategory::Output,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeCategory::Input => "Input",
            NodeCategory::Texture => "Texture",
            NodeCategory::Pattern => "Pattern",
            NodeCategory::Color => "Color",
            NodeCategory::Vector => "Vector",
            NodeCategory::Converter => "Converter",
            NodeCategory::Output => "Output",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            NodeCategory::Input => "Constant values and colors",
            NodeCategory::Texture => "Noise, cellular and gradient generators",
            NodeCategory::Pattern => "Checkerboards and geometric shapes",
            NodeCategory::Color => "Blending, hue/saturation and inversion",
            NodeCategory::Vector => "Coordinate transforms and vector packing",
            NodeCategory::Converter => "Arithmetic on scalar values",
            NodeCategory::Output => "Final texture output",
        }
    }
}

/// Describes a creatable node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Unique identifier for the kind (lowercase, no spaces).
    pub kind: &'static str,
    /// Human-readable name, also the prefix of new node names.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Menu category.
    pub category: NodeCategory,
}

/// Factory function type for creating nodes.
pub type NodeFactory = fn() -> Box<dyn Node>;

struct CatalogEntry {
    descriptor: NodeDescriptor,
    factory: NodeFactory,
}

/// Registry of creatable node kinds, in registration order.
#[derive(Default)]
pub struct NodeCatalog {
    entries: Vec<CatalogEntry>,
}

impl NodeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind. Registering an existing kind replaces it in place.
    pub fn register(&mut self, descriptor: NodeDescriptor, factory: NodeFactory) {
        let entry = CatalogEntry {
            descriptor,
            factory,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.descriptor.kind == entry.descriptor.kind)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Looks up a kind's descriptor.
    pub fn get(&self, kind: &str) -> Option<&NodeDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.kind == kind)
            .map(|e| &e.descriptor)
    }

    /// Instantiates a node of `kind`.
    ///
    /// Returns `None` if the kind is not registered.
    pub fn create(&self, kind: &str) -> Option<Box<dyn Node>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.kind == kind)
            .map(|e| (e.factory)())
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Descriptors in `category`, in registration order.
    pub fn in_category(&self, category: NodeCategory) -> Vec<&NodeDescriptor> {
        self.descriptors()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Returns true if `kind` is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl core::fmt::Debug for NodeCatalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.descriptor.kind))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RasterSize;
    use crate::error::InputError;
    use crate::node::{Inputs, Outputs};
    use crate::port::{OutputPort, Ports};
    use crate::value::{DataKind, TypedValue};

    struct Constant {
        ports: Ports,
    }

    impl Constant {
        fn boxed() -> Box<dyn Node> {
            let mut ports = Ports::new();
            ports.register_output(OutputPort::new("out_value", "Value", DataKind::Number));
            Box::new(Self { ports })
        }
    }

    impl Node for Constant {
        fn ports(&self) -> &Ports {
            &self.ports
        }
        fn ports_mut(&mut self) -> &mut Ports {
            &mut self.ports
        }
        fn calculate(&self, _: &Inputs, _: RasterSize) -> Result<Outputs, InputError> {
            Ok(Outputs::new().with("out_value", TypedValue::Number(1.0)))
        }
    }

    fn descriptor(kind: &'static str, category: NodeCategory) -> NodeDescriptor {
        NodeDescriptor {
            kind,
            name: "Constant",
            description: "Always one",
            category,
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut catalog = NodeCatalog::new();
        assert!(catalog.is_empty());
        catalog.register(descriptor("constant", NodeCategory::Input), Constant::boxed);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("constant"));
        let node = catalog.create("constant").unwrap();
        assert_eq!(node.ports().outputs().len(), 1);
        assert!(catalog.create("missing").is_none());
    }

    #[test]
    fn test_register_replaces_existing_kind() {
        let mut catalog = NodeCatalog::new();
        catalog.register(descriptor("a", NodeCategory::Input), Constant::boxed);
        catalog.register(descriptor("b", NodeCategory::Input), Constant::boxed);
        catalog.register(descriptor("a", NodeCategory::Converter), Constant::boxed);

        assert_eq!(catalog.len(), 2);
        let kinds: Vec<_> = catalog.descriptors().map(|d| d.kind).collect();
        assert_eq!(kinds, vec!["a", "b"]);
        assert_eq!(catalog.get("a").unwrap().category, NodeCategory::Converter);
    }

    #[test]
    fn test_in_category() {
        let mut catalog = NodeCatalog::new();
        catalog.register(descriptor("a", NodeCategory::Input), Constant::boxed);
        catalog.register(descriptor("b", NodeCategory::Texture), Constant::boxed);
        catalog.register(descriptor("c", NodeCategory::Input), Constant::boxed);

        let inputs: Vec<_> = catalog
            .in_category(NodeCategory::Input)
            .iter()
            .map(|d| d.kind)
            .collect();
        assert_eq!(inputs, vec!["a", "c"]);
        assert!(catalog.in_category(NodeCategory::Output).is_empty());
    }

    #[test]
    fn test_category_names() {
        for category in NodeCategory::ALL {
            assert!(!category.name().is_empty());
            assert!(!category.description().is_empty());
        }
        assert_eq!(NodeCategory::Texture.name(), "Texture");
    }
}
