//! Port declarations and authored literal values.
//!
//! Every node owns a [`Ports`] table built once in its constructor. Input ports
//! may carry a [`LiteralValue`], which is used whenever the port has no
//! incoming connection.
//!
//! ```rust
//! use texgraph_core::{DataKind, InputPort, Ports};
//!
//! let mut ports = Ports::new();
//! ports.register_input(
//!     InputPort::new("in_scale", "Scale", DataKind::Number)
//!         .with_default(5.0)
//!         .with_range(0.0, 100.0),
//! );
//! assert!(ports.set_input_value("in_scale", 250.0));
//! assert_eq!(ports.input_value::<f32>("in_scale"), Some(100.0));
//! ```

use crate::buffer::{ColorRaster, RasterSize, Rgba};
use crate::convert::can_convert;
use crate::value::{DataKind, TypedValue};

/// Port identifier, unique within one node.
pub type PortId = &'static str;

/// A labelled set of options with one selected entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceList {
    selected: usize,
    options: &'static [&'static str],
}

impl ChoiceList {
    /// Creates a choice list with the first option selected.
    pub const fn new(options: &'static [&'static str]) -> Self {
        Self {
            selected: 0,
            options,
        }
    }

    /// Returns a copy with `index` selected (clamped to the option count).
    pub fn with_selected(mut self, index: usize) -> Self {
        self.select(index);
        self
    }

    /// Selects `index`, clamped to the last option.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.options.len().saturating_sub(1));
    }

    /// Index of the selected option.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Label of the selected option.
    pub fn selected_label(&self) -> Option<&'static str> {
        self.options.get(self.selected).copied()
    }

    /// All option labels.
    pub fn options(&self) -> &'static [&'static str] {
        self.options
    }

    /// Finds an option by label, ignoring ASCII case.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(label))
    }
}

/// An authored value on an input port.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LiteralValue {
    /// Floating point scalar.
    Float(f32),
    /// Integer scalar.
    Int(i32),
    /// Toggle.
    Bool(bool),
    /// Flat color.
    Color(Rgba),
    /// Enumerated option.
    Choice(ChoiceList),
}

impl LiteralValue {
    /// The runtime kind this literal turns into when evaluated.
    pub fn kind(&self) -> DataKind {
        match self {
            LiteralValue::Color(_) => DataKind::Color,
            _ => DataKind::Number,
        }
    }

    /// Numeric view: floats pass through, ints and bools coerce, a choice
    /// yields its selected index. Colors have no scalar value.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            LiteralValue::Float(v) => Some(v),
            LiteralValue::Int(v) => Some(v as f32),
            LiteralValue::Bool(v) => Some(if v { 1.0 } else { 0.0 }),
            LiteralValue::Choice(c) => Some(c.selected() as f32),
            LiteralValue::Color(_) => None,
        }
    }

    /// Converts the literal into a runtime value for an evaluation at `size`.
    ///
    /// Colors become a filled raster; everything else becomes a `Number`.
    pub fn to_typed(&self, size: RasterSize) -> TypedValue {
        match *self {
            LiteralValue::Color(c) => TypedValue::color(ColorRaster::filled(size, c)),
            other => TypedValue::Number(other.as_f32().unwrap_or_default()),
        }
    }
}

impl From<f32> for LiteralValue {
    fn from(v: f32) -> Self {
        LiteralValue::Float(v)
    }
}

impl From<i32> for LiteralValue {
    fn from(v: i32) -> Self {
        LiteralValue::Int(v)
    }
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        LiteralValue::Bool(v)
    }
}

impl From<Rgba> for LiteralValue {
    fn from(v: Rgba) -> Self {
        LiteralValue::Color(v)
    }
}

impl From<ChoiceList> for LiteralValue {
    fn from(v: ChoiceList) -> Self {
        LiteralValue::Choice(v)
    }
}

/// Types that can be read back from a port literal.
pub trait LiteralType: Sized {
    /// Extracts `Self` from a literal, coercing where it makes sense.
    fn from_literal(value: &LiteralValue) -> Option<Self>;
}

impl LiteralType for f32 {
    fn from_literal(value: &LiteralValue) -> Option<Self> {
        value.as_f32()
    }
}

impl LiteralType for i32 {
    fn from_literal(value: &LiteralValue) -> Option<Self> {
        match *value {
            LiteralValue::Int(v) => Some(v),
            LiteralValue::Float(v) => Some(v.round() as i32),
            LiteralValue::Bool(v) => Some(i32::from(v)),
            LiteralValue::Choice(c) => Some(c.selected() as i32),
            LiteralValue::Color(_) => None,
        }
    }
}

impl LiteralType for bool {
    fn from_literal(value: &LiteralValue) -> Option<Self> {
        match *value {
            LiteralValue::Bool(v) => Some(v),
            LiteralValue::Int(v) => Some(v != 0),
            LiteralValue::Float(v) => Some(v != 0.0),
            _ => None,
        }
    }
}

impl LiteralType for Rgba {
    fn from_literal(value: &LiteralValue) -> Option<Self> {
        match *value {
            LiteralValue::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl LiteralType for ChoiceList {
    fn from_literal(value: &LiteralValue) -> Option<Self> {
        match *value {
            LiteralValue::Choice(c) => Some(c),
            _ => None,
        }
    }
}

/// Descriptive metadata for an input port.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PortMetadata {
    /// Tooltip text.
    pub description: &'static str,
    /// Lower bound for numeric literals.
    pub min: Option<f32>,
    /// Upper bound for numeric literals.
    pub max: Option<f32>,
}

/// Declaration of an input port.
#[derive(Clone, Debug, PartialEq)]
pub struct InputPort {
    /// Port id.
    pub id: PortId,
    /// Display name.
    pub name: &'static str,
    /// Declared kind.
    pub kind: DataKind,
    /// Literal used when nothing is connected.
    pub value: Option<LiteralValue>,
    /// Range and tooltip.
    pub metadata: PortMetadata,
}

impl InputPort {
    /// Declares an input port with no literal.
    pub fn new(id: PortId, name: &'static str, kind: DataKind) -> Self {
        Self {
            id,
            name,
            kind,
            value: None,
            metadata: PortMetadata::default(),
        }
    }

    /// Sets the default literal.
    pub fn with_default(mut self, value: impl Into<LiteralValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the numeric range.
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.metadata.min = Some(min);
        self.metadata.max = Some(max);
        self
    }

    /// Sets the tooltip text.
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.metadata.description = description;
        self
    }

    fn clamp_to_range(&self, v: f32) -> f32 {
        let lo = self.metadata.min.unwrap_or(f32::NEG_INFINITY);
        let hi = self.metadata.max.unwrap_or(f32::INFINITY);
        v.clamp(lo, hi)
    }

    /// Coerces `value` to this port's literal shape.
    ///
    /// Returns `None` when the value cannot be stored here.
    fn coerce(&self, value: LiteralValue) -> Option<LiteralValue> {
        let coerced = match (self.value, value) {
            (Some(LiteralValue::Choice(mut c)), LiteralValue::Choice(new)) => {
                if new.options() != c.options() {
                    return None;
                }
                c.select(new.selected());
                LiteralValue::Choice(c)
            }
            (Some(LiteralValue::Choice(mut c)), other) => {
                let index = i32::from_literal(&other)?;
                c.select(index.max(0) as usize);
                LiteralValue::Choice(c)
            }
            (Some(LiteralValue::Float(_)), other) => {
                LiteralValue::Float(self.clamp_to_range(other.as_f32()?))
            }
            (Some(LiteralValue::Int(_)), other) => {
                let v = self.clamp_to_range(i32::from_literal(&other)? as f32);
                LiteralValue::Int(v as i32)
            }
            (Some(LiteralValue::Bool(_)), other) => LiteralValue::Bool(bool::from_literal(&other)?),
            (Some(LiteralValue::Color(_)), other) => LiteralValue::Color(Rgba::from_literal(&other)?),
            (None, other) => {
                if !can_convert(other.kind(), self.kind) {
                    return None;
                }
                match other {
                    LiteralValue::Float(v) => LiteralValue::Float(self.clamp_to_range(v)),
                    other => other,
                }
            }
        };
        Some(coerced)
    }
}

/// Declaration of an output port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPort {
    /// Port id.
    pub id: PortId,
    /// Display name.
    pub name: &'static str,
    /// Declared kind.
    pub kind: DataKind,
}

impl OutputPort {
    /// Declares an output port.
    pub fn new(id: PortId, name: &'static str, kind: DataKind) -> Self {
        Self { id, name, kind }
    }
}

/// A node's input and output port table.
///
/// Ports keep their registration order for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ports {
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
}

impl Ports {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an input port, replacing any existing port with the same id.
    pub fn register_input(&mut self, port: InputPort) -> &mut Self {
        match self.inputs.iter_mut().find(|p| p.id == port.id) {
            Some(existing) => *existing = port,
            None => self.inputs.push(port),
        }
        self
    }

    /// Registers an output port, replacing any existing port with the same id.
    pub fn register_output(&mut self, port: OutputPort) -> &mut Self {
        match self.outputs.iter_mut().find(|p| p.id == port.id) {
            Some(existing) => *existing = port,
            None => self.outputs.push(port),
        }
        self
    }

    /// Looks up an input port.
    pub fn input(&self, id: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|p| p.id == id)
    }

    /// Looks up an output port.
    pub fn output(&self, id: &str) -> Option<&OutputPort> {
        self.outputs.iter().find(|p| p.id == id)
    }

    /// All input ports in registration order.
    pub fn inputs(&self) -> &[InputPort] {
        &self.inputs
    }

    /// All output ports in registration order.
    pub fn outputs(&self) -> &[OutputPort] {
        &self.outputs
    }

    /// Writes a literal on an input port.
    ///
    /// The value is coerced to the port's literal shape: numbers are clamped to
    /// the declared range and an integer on a choice port selects that option.
    /// Returns false if the port does not exist or the value does not fit.
    pub fn set_input_value(&mut self, id: &str, value: impl Into<LiteralValue>) -> bool {
        let value = value.into();
        let Some(port) = self.inputs.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        match port.coerce(value) {
            Some(coerced) => {
                port.value = Some(coerced);
                true
            }
            None => false,
        }
    }

    /// Reads an input port's literal as `T`.
    pub fn input_value<T: LiteralType>(&self, id: &str) -> Option<T> {
        self.input(id)?.value.as_ref().and_then(T::from_literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: &[&str] = &["Add", "Subtract", "Multiply"];

    fn sample_ports() -> Ports {
        let mut ports = Ports::new();
        ports
            .register_input(InputPort::new("in_mode", "Mode", DataKind::Number).with_default(ChoiceList::new(MODES)))
            .register_input(
                InputPort::new("in_fac", "Factor", DataKind::Grayscale)
                    .with_default(0.5)
                    .with_range(0.0, 1.0),
            )
            .register_input(InputPort::new("in_count", "Count", DataKind::Number).with_default(1))
            .register_input(InputPort::new("in_color", "Color", DataKind::Color))
            .register_output(OutputPort::new("out", "Result", DataKind::Color));
        ports
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut ports = sample_ports();
        ports.register_input(InputPort::new("in_fac", "Fac", DataKind::Grayscale).with_default(0.25));
        ports.register_output(OutputPort::new("out", "Out", DataKind::Grayscale));
        assert_eq!(ports.inputs().len(), 4);
        assert_eq!(ports.outputs().len(), 1);
        assert_eq!(ports.input("in_fac").unwrap().name, "Fac");
        assert_eq!(ports.output("out").unwrap().kind, DataKind::Grayscale);
        // Order is preserved on replacement.
        assert_eq!(ports.inputs()[1].id, "in_fac");
    }

    #[test]
    fn test_float_clamped_to_range() {
        let mut ports = sample_ports();
        assert!(ports.set_input_value("in_fac", 4.0));
        assert_eq!(ports.input_value::<f32>("in_fac"), Some(1.0));
        assert!(ports.set_input_value("in_fac", 1));
        assert_eq!(ports.input_value::<f32>("in_fac"), Some(1.0));
    }

    #[test]
    fn test_int_selects_choice() {
        let mut ports = sample_ports();
        assert!(ports.set_input_value("in_mode", 2));
        let choice = ports.input_value::<ChoiceList>("in_mode").unwrap();
        assert_eq!(choice.selected_label(), Some("Multiply"));
        assert!(ports.set_input_value("in_mode", 99));
        assert_eq!(ports.input_value::<i32>("in_mode"), Some(2));
    }

    #[test]
    fn test_rejects_mismatched_literal() {
        let mut ports = sample_ports();
        assert!(!ports.set_input_value("in_count", Rgba::WHITE));
        assert!(!ports.set_input_value("missing", 1.0));
        assert_eq!(ports.input_value::<i32>("in_count"), Some(1));
    }

    #[test]
    fn test_port_without_default_accepts_compatible_literal() {
        let mut ports = sample_ports();
        assert_eq!(ports.input_value::<Rgba>("in_color"), None);
        assert!(ports.set_input_value("in_color", Rgba::BLACK));
        assert_eq!(ports.input_value::<Rgba>("in_color"), Some(Rgba::BLACK));
    }

    #[test]
    fn test_literal_to_typed() {
        let size = RasterSize::new(2, 2);
        assert_eq!(LiteralValue::Int(3).to_typed(size), TypedValue::Number(3.0));
        assert_eq!(LiteralValue::Bool(true).to_typed(size), TypedValue::Number(1.0));
        let choice = ChoiceList::new(MODES).with_selected(1);
        assert_eq!(LiteralValue::Choice(choice).to_typed(size), TypedValue::Number(1.0));
        let color = LiteralValue::Color(Rgba::WHITE).to_typed(size);
        assert_eq!(color.size(), Some(size));
        assert_eq!(color.kind(), DataKind::Color);
    }

    #[test]
    fn test_choice_position() {
        let choice = ChoiceList::new(MODES);
        assert_eq!(choice.position("multiply"), Some(2));
        assert_eq!(choice.position("Divide"), None);
    }
}
