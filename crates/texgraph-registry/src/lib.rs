//! Built-in node catalog for texgraph.
//!
//! This crate wires every node kind from `texgraph-nodes` into a
//! [`NodeCatalog`] with its descriptor and menu category, and hands out
//! evaluators preloaded with it.
//!
//! # Features
//!
//! - **Kind Discovery**: list all built-in kinds with metadata
//! - **Factory Pattern**: create nodes by kind id at runtime
//! - **Category System**: kinds grouped for "add node" menus
//! - **Port Lookup**: resolve a port by id or display name
//!
//! # Example
//!
//! ```rust
//! use texgraph_core::{Connection, NodeCategory, RasterSize};
//! use texgraph_registry::{builtin_catalog, builtin_evaluator};
//!
//! for descriptor in builtin_catalog().in_category(NodeCategory::Texture) {
//!     println!("{}: {}", descriptor.name, descriptor.description);
//! }
//!
//! let mut graph = builtin_evaluator();
//! let noise = graph.add_node("noise_texture");
//! let output = graph.add_node("texture_output");
//! graph
//!     .add_connection(Connection::new(noise, "out_color", output, "in_color"))
//!     .unwrap();
//! let texture = graph.evaluate_final_output(RasterSize::square(32)).unwrap();
//! assert_eq!(texture.size(), RasterSize::square(32));
//! ```

use texgraph_core::{Evaluator, NodeCatalog, NodeCategory, NodeDescriptor, PortId};
use texgraph_nodes::{
    CheckerPattern, CirclePattern, CombineXy, GradientTexture, HsvAdjust, InvertColor, Mapping,
    MathNode, MixColor, NoiseTexture, RectanglePattern, RgbNode, SeparateXy, TextureOutput,
    ValueNode, VoronoiTexture,
};

/// Registers every built-in node kind into `catalog`.
///
/// Kinds already present are replaced in place.
pub fn register_builtin_nodes(catalog: &mut NodeCatalog) {
    // Input
    catalog.register(
        NodeDescriptor {
            kind: ValueNode::KIND,
            name: "Value",
            description: "Constant number",
            category: NodeCategory::Input,
        },
        ValueNode::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: RgbNode::KIND,
            name: "RGB",
            description: "Constant color",
            category: NodeCategory::Input,
        },
        RgbNode::boxed,
    );

    // Texture
    catalog.register(
        NodeDescriptor {
            kind: NoiseTexture::KIND,
            name: "Noise Texture",
            description: "Fractal Perlin noise with domain distortion",
            category: NodeCategory::Texture,
        },
        NoiseTexture::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: VoronoiTexture::KIND,
            name: "Voronoi Texture",
            description: "Cellular distance field with per-cell colors",
            category: NodeCategory::Texture,
        },
        VoronoiTexture::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: GradientTexture::KIND,
            name: "Gradient Texture",
            description: "Linear, quadratic, easing, radial and diagonal ramps",
            category: NodeCategory::Texture,
        },
        GradientTexture::boxed,
    );

    // Pattern
    catalog.register(
        NodeDescriptor {
            kind: CheckerPattern::KIND,
            name: "Checker Pattern",
            description: "Two-color checkerboard",
            category: NodeCategory::Pattern,
        },
        CheckerPattern::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: CirclePattern::KIND,
            name: "Circle Pattern",
            description: "Circle outline or disc",
            category: NodeCategory::Pattern,
        },
        CirclePattern::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: RectanglePattern::KIND,
            name: "Rectangle Pattern",
            description: "Rectangle outline or fill",
            category: NodeCategory::Pattern,
        },
        RectanglePattern::boxed,
    );

    // Color
    catalog.register(
        NodeDescriptor {
            kind: MixColor::KIND,
            name: "Mix Color",
            description: "Blend two colors with 13 blend modes",
            category: NodeCategory::Color,
        },
        MixColor::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: HsvAdjust::KIND,
            name: "Hue/Saturation/Value",
            description: "Shift hue and scale saturation and value",
            category: NodeCategory::Color,
        },
        HsvAdjust::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: InvertColor::KIND,
            name: "Invert Color",
            description: "Invert RGB by a per-pixel factor",
            category: NodeCategory::Color,
        },
        InvertColor::boxed,
    );

    // Vector
    catalog.register(
        NodeDescriptor {
            kind: Mapping::KIND,
            name: "Mapping",
            description: "Translate, rotate and scale a vector field",
            category: NodeCategory::Vector,
        },
        Mapping::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: CombineXy::KIND,
            name: "Combine XY",
            description: "Pack two grayscale channels into a vector field",
            category: NodeCategory::Vector,
        },
        CombineXy::boxed,
    );
    catalog.register(
        NodeDescriptor {
            kind: SeparateXy::KIND,
            name: "Separate XY",
            description: "Split a vector field into two grayscale channels",
            category: NodeCategory::Vector,
        },
        SeparateXy::boxed,
    );

    // Converter
    catalog.register(
        NodeDescriptor {
            kind: MathNode::KIND,
            name: "Math",
            description: "Arithmetic, power, logarithm, minimum and maximum",
            category: NodeCategory::Converter,
        },
        MathNode::boxed,
    );

    // Output
    catalog.register(
        NodeDescriptor {
            kind: TextureOutput::KIND,
            name: "Texture Output",
            description: "Final texture of the graph",
            category: NodeCategory::Output,
        },
        TextureOutput::boxed,
    );
}

/// A catalog holding every built-in kind.
pub fn builtin_catalog() -> NodeCatalog {
    let mut catalog = NodeCatalog::new();
    register_builtin_nodes(&mut catalog);
    catalog
}

/// An empty graph over the built-in catalog.
pub fn builtin_evaluator() -> Evaluator {
    Evaluator::new(builtin_catalog())
}

/// Finds an input port of `kind` by id or display name, case-insensitively.
///
/// Creates a temporary node to scan its port declarations. Bare names match
/// with or without the `in_` prefix, so `scale`, `Scale` and `in_scale` all
/// resolve to the same port.
pub fn input_port_by_name(catalog: &NodeCatalog, kind: &str, name: &str) -> Option<PortId> {
    let node = catalog.create(kind)?;
    let lower = name.to_lowercase();
    node.ports()
        .inputs()
        .iter()
        .find(|p| {
            p.id == lower
                || p.id.strip_prefix("in_") == Some(lower.as_str())
                || p.name.to_lowercase() == lower
        })
        .map(|p| p.id)
}
