//! The graph sink.

use texgraph_core::{
    DataKind, InputError, InputPort, Inputs, Node, Outputs, Ports, RasterSize,
};

/// Final texture output.
///
/// A sink has no outputs and is never calculated; the evaluator pulls its
/// `in_color` upstream instead. Its input has no literal, so an unconnected
/// output renders as the evaluator's black fallback.
pub struct TextureOutput {
    ports: Ports,
}

impl TextureOutput {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "texture_output";

    /// Creates the node.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports.register_input(InputPort::new("in_color", "Color", DataKind::Color));
        Self { ports }
    }

    /// Boxed constructor, usable as a catalog factory.
    pub fn boxed() -> Box<dyn Node> {
        Box::new(Self::new())
    }
}

impl Default for TextureOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for TextureOutput {
    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn calculate(&self, _inputs: &Inputs, _size: RasterSize) -> Result<Outputs, InputError> {
        Ok(Outputs::new())
    }

    fn is_sink(&self) -> bool {
        true
    }
}
