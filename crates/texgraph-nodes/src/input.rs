//! Constant sources.

use std::sync::Arc;

use texgraph_core::{
    ColorRaster, DataKind, InputError, InputPort, Inputs, OutputPort, Outputs, Ports, RasterSize,
    Rgba, TypedValue,
};

/// Emits its `in_value` literal as a number.
pub struct ValueNode {
    ports: Ports,
}

impl ValueNode {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "value";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_value", "Value", DataKind::Number).with_default(0.0))
            .register_output(OutputPort::new("out_value", "Value", DataKind::Number));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, _size: RasterSize) -> Result<Outputs, InputError> {
        let value = inputs.required::<f32>("in_value")?;
        Ok(Outputs::new().with("out_value", TypedValue::Number(value)))
    }
}

impl_node!(ValueNode);

/// Passes its color input through; unconnected, that is a flat literal color.
pub struct RgbNode {
    ports: Ports,
}

impl RgbNode {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "rgb";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_color", "Color", DataKind::Color).with_default(Rgba::WHITE))
            .register_output(OutputPort::new("out_color", "Color", DataKind::Color));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, _size: RasterSize) -> Result<Outputs, InputError> {
        let color = inputs.required::<Arc<ColorRaster>>("in_color")?;
        Ok(Outputs::new().with("out_color", TypedValue::Color(color)))
    }
}

impl_node!(RgbNode);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::literal_inputs;
    use texgraph_core::Node;

    #[test]
    fn test_value_emits_literal() {
        let mut node = ValueNode::new();
        node.ports_mut().set_input_value("in_value", 0.75);
        let size = RasterSize::square(2);
        let out = node.calculate(&literal_inputs(&node, size), size).unwrap();
        assert_eq!(out.get("out_value").and_then(|v| v.as_number()), Some(0.75));
    }

    #[test]
    fn test_rgb_fills_literal_color() {
        let mut node = RgbNode::new();
        let teal = Rgba::rgb(0, 128, 128);
        node.ports_mut().set_input_value("in_color", teal);
        let size = RasterSize::new(3, 2);
        let out = node.calculate(&literal_inputs(&node, size), size).unwrap();
        let color = out.get("out_color").and_then(|v| v.as_color()).unwrap();
        assert_eq!(color.size(), size);
        assert!(color.pixels().iter().all(|&p| p == teal));
    }

    #[test]
    fn test_rgb_passes_connected_buffer_through() {
        let node = RgbNode::new();
        let size = RasterSize::new(2, 2);
        let source = Arc::new(ColorRaster::filled(size, Rgba::BLACK));
        let inputs = Inputs::new(size).with("in_color", TypedValue::Color(Arc::clone(&source)));
        let out = node.calculate(&inputs, size).unwrap();
        assert!(Arc::ptr_eq(out.get("out_color").and_then(|v| v.as_color()).unwrap(), &source));
    }
}
