//! The node trait and the input/output maps passed to it.
//!
//! A [`Node`] is a pure computation unit. It declares its ports once, then
//! turns an [`Inputs`] map into an [`Outputs`] map on every
//! [`calculate`](Node::calculate) call. Nodes never see the graph: the
//! evaluator resolves connections and literals before calling them.
//!
//! # Reading inputs
//!
//! Node authors read inputs only through [`Inputs::required`],
//! [`Inputs::optional`] and [`Inputs::required_or_else`]. These try the exact
//! kind first and fall back to [`TypedValue::convert`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use texgraph_core::{GrayscaleRaster, Inputs, RasterSize, TypedValue};
//!
//! let size = RasterSize::new(4, 4);
//! let mut inputs = Inputs::new(size);
//! inputs.insert("in_factor", TypedValue::Number(1.0));
//!
//! // A scalar is broadcast into a grayscale raster on demand.
//! let factor: Arc<GrayscaleRaster> = inputs.required("in_factor").unwrap();
//! assert_eq!(factor.get(0, 0), Some(255));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::buffer::{ColorRaster, GrayscaleRaster, RasterSize, VectorField};
use crate::error::InputError;
use crate::port::{PortId, Ports};
use crate::value::{DataKind, TypedValue};

/// A computation unit in the graph.
///
/// Implementations own their [`Ports`] table and must be deterministic:
/// the same inputs at the same size always produce the same outputs.
pub trait Node: Send {
    /// The node's port table.
    fn ports(&self) -> &Ports;

    /// Mutable access to the port table, used to edit literals.
    fn ports_mut(&mut self) -> &mut Ports;

    /// Computes every declared output from `inputs` at `size`.
    fn calculate(&self, inputs: &Inputs, size: RasterSize) -> Result<Outputs, InputError>;

    /// Returns true for the terminal output node, which is never calculated.
    fn is_sink(&self) -> bool {
        false
    }
}

/// Values resolved for a node's input ports for one evaluation.
#[derive(Debug, Clone)]
pub struct Inputs {
    values: HashMap<PortId, TypedValue>,
    size: RasterSize,
}

impl Inputs {
    /// Creates an empty input map for an evaluation at `size`.
    pub fn new(size: RasterSize) -> Self {
        Self {
            values: HashMap::new(),
            size,
        }
    }

    /// Supplies a value for `port`.
    pub fn insert(&mut self, port: PortId, value: TypedValue) {
        self.values.insert(port, value);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, port: PortId, value: TypedValue) -> Self {
        self.insert(port, value);
        self
    }

    /// The raw value supplied for `port`, if any.
    pub fn get(&self, port: &str) -> Option<&TypedValue> {
        self.values.get(port)
    }

    /// Target raster size of this evaluation.
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Number of supplied ports.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no port received a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads a port that must be supplied.
    pub fn required<T: InputValue>(&self, port: PortId) -> Result<T, InputError> {
        self.optional(port)?
            .ok_or(InputError::MissingRequiredInput { port })
    }

    /// Reads a port that may be left unconnected.
    ///
    /// Returns `Ok(None)` when nothing was supplied, and an error when a value
    /// was supplied but cannot be converted.
    pub fn optional<T: InputValue>(&self, port: PortId) -> Result<Option<T>, InputError> {
        let Some(value) = self.values.get(port) else {
            return Ok(None);
        };
        T::from_value(value, self.size)
            .map(Some)
            .ok_or(InputError::TypeMismatch {
                port,
                expected: T::KIND,
                found: value.kind(),
            })
    }

    /// Reads a port, falling back to `default` when nothing was supplied.
    ///
    /// A supplied value that cannot be converted is still a `TypeMismatch`.
    pub fn required_or_else<T: InputValue>(
        &self,
        port: PortId,
        default: impl FnOnce(RasterSize) -> T,
    ) -> Result<T, InputError> {
        Ok(self.optional(port)?.unwrap_or_else(|| default(self.size)))
    }
}

/// Values produced by one [`Node::calculate`] call, keyed by output port.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs {
    values: HashMap<PortId, TypedValue>,
}

impl Outputs {
    /// Creates an empty output map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the value for `port`.
    pub fn insert(&mut self, port: PortId, value: TypedValue) {
        self.values.insert(port, value);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, port: PortId, value: TypedValue) -> Self {
        self.insert(port, value);
        self
    }

    /// The value produced for `port`.
    pub fn get(&self, port: &str) -> Option<&TypedValue> {
        self.values.get(port)
    }

    /// Iterates over all produced values.
    pub fn iter(&self) -> impl Iterator<Item = (PortId, &TypedValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Number of produced values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was produced.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rust types a node can read from an input port.
pub trait InputValue: Sized {
    /// The kind requested from the port.
    const KIND: DataKind;

    /// Extracts `Self`, converting `value` if needed.
    fn from_value(value: &TypedValue, size: RasterSize) -> Option<Self>;
}

impl InputValue for f32 {
    const KIND: DataKind = DataKind::Number;

    fn from_value(value: &TypedValue, size: RasterSize) -> Option<Self> {
        value.convert(Self::KIND, size)?.as_number()
    }
}

impl InputValue for Arc<ColorRaster> {
    const KIND: DataKind = DataKind::Color;

    fn from_value(value: &TypedValue, size: RasterSize) -> Option<Self> {
        match value.convert(Self::KIND, size)? {
            TypedValue::Color(r) => Some(r),
            _ => None,
        }
    }
}

impl InputValue for Arc<GrayscaleRaster> {
    const KIND: DataKind = DataKind::Grayscale;

    fn from_value(value: &TypedValue, size: RasterSize) -> Option<Self> {
        match value.convert(Self::KIND, size)? {
            TypedValue::Grayscale(r) => Some(r),
            _ => None,
        }
    }
}

impl InputValue for Arc<VectorField> {
    const KIND: DataKind = DataKind::VectorField;

    fn from_value(value: &TypedValue, size: RasterSize) -> Option<Self> {
        match value.convert(Self::KIND, size)? {
            TypedValue::VectorField(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;

    const SIZE: RasterSize = RasterSize::new(2, 2);

    #[test]
    fn test_required_exact_kind() {
        let inputs = Inputs::new(SIZE).with("in_value", TypedValue::Number(0.25));
        assert_eq!(inputs.required::<f32>("in_value"), Ok(0.25));
    }

    #[test]
    fn test_required_missing() {
        let inputs = Inputs::new(SIZE);
        assert_eq!(
            inputs.required::<f32>("in_value"),
            Err(InputError::MissingRequiredInput { port: "in_value" })
        );
    }

    #[test]
    fn test_required_type_mismatch() {
        let color = TypedValue::color(ColorRaster::filled(SIZE, Rgba::WHITE));
        let inputs = Inputs::new(SIZE).with("in_value", color);
        assert_eq!(
            inputs.required::<f32>("in_value"),
            Err(InputError::TypeMismatch {
                port: "in_value",
                expected: DataKind::Number,
                found: DataKind::Color,
            })
        );
    }

    #[test]
    fn test_conversion_fallback() {
        let color = TypedValue::color(ColorRaster::filled(SIZE, Rgba::WHITE));
        let inputs = Inputs::new(SIZE).with("in_color", color);
        let gray: Arc<GrayscaleRaster> = inputs.required("in_color").unwrap();
        assert!(gray.pixels().iter().all(|&p| p == 255));
    }

    #[test]
    fn test_optional_absent_is_none() {
        let inputs = Inputs::new(SIZE);
        assert_eq!(inputs.optional::<Arc<VectorField>>("in_vector"), Ok(None));
    }

    #[test]
    fn test_required_or_else_uses_default() {
        let inputs = Inputs::new(SIZE);
        let field = inputs.required_or_else::<Arc<VectorField>>("in_vector", |size| {
            Arc::new(VectorField::new(size))
        });
        assert_eq!(field.map(|f| f.size()), Ok(SIZE));
    }

    #[test]
    fn test_required_or_else_keeps_type_mismatch() {
        let inputs = Inputs::new(SIZE).with("in_vector", TypedValue::Number(0.7));
        let field = inputs.required_or_else::<Arc<VectorField>>("in_vector", |size| {
            Arc::new(VectorField::new(size))
        });
        assert_eq!(
            field.map(|f| f.size()),
            Err(InputError::TypeMismatch {
                port: "in_vector",
                expected: DataKind::VectorField,
                found: DataKind::Number,
            })
        );
    }

    #[test]
    fn test_outputs_builder() {
        let outputs = Outputs::new().with("out_value", TypedValue::Number(2.0));
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs.get("out_value"), Some(&TypedValue::Number(2.0)));
        assert!(outputs.get("out_other").is_none());
    }
}
