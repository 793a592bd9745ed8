//! Scalar math node.

use texgraph_core::{
    ChoiceList, DataKind, InputError, InputPort, Inputs, OutputPort, Outputs, Ports, RasterSize,
    TypedValue,
};

/// Binary scalar operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MathOp {
    /// `a + b`
    #[default]
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, 0 when `b` is 0.
    Divide,
    /// `a ^ b`, 0 when the result is not finite.
    Power,
    /// Logarithm of `a` in base `b`, 0 outside the domain.
    Logarithm,
    /// Smaller of the two.
    Minimum,
    /// Larger of the two.
    Maximum,
}

impl MathOp {
    /// Option labels, in index order.
    pub const LABELS: &'static [&'static str] = &[
        "Func: Add",
        "Func: Subtract",
        "Func: Multiply",
        "Func: Divide",
        "Func: Power",
        "Func: Logarithm",
        "Comparison: Minimum",
        "Comparison: Maximum",
    ];

    /// Get operation from index; unknown indices fall back to `Add`.
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => MathOp::Subtract,
            2 => MathOp::Multiply,
            3 => MathOp::Divide,
            4 => MathOp::Power,
            5 => MathOp::Logarithm,
            6 => MathOp::Minimum,
            7 => MathOp::Maximum,
            _ => MathOp::Add,
        }
    }

    /// Applies the operation. Never returns NaN or infinity for finite input.
    pub fn apply(self, a: f32, b: f32) -> f32 {
        let result = match self {
            MathOp::Add => a + b,
            MathOp::Subtract => a - b,
            MathOp::Multiply => a * b,
            MathOp::Divide => {
                if b == 0.0 {
                    0.0
                } else {
                    a / b
                }
            }
            MathOp::Power => a.powf(b),
            MathOp::Logarithm => {
                if a > 0.0 && b > 0.0 && b != 1.0 {
                    a.ln() / b.ln()
                } else {
                    0.0
                }
            }
            MathOp::Minimum => a.min(b),
            MathOp::Maximum => a.max(b),
        };
        if result.is_finite() { result } else { 0.0 }
    }
}

/// Applies a [`MathOp`] to two scalars.
pub struct MathNode {
    ports: Ports,
}

impl MathNode {
    /// Kind id in the catalog.
    pub const KIND: &'static str = "math";

    /// Creates the node with its default port values.
    pub fn new() -> Self {
        let mut ports = Ports::new();
        ports
            .register_input(
                InputPort::new("in_action", "Operation", DataKind::Number)
                    .with_default(ChoiceList::new(MathOp::LABELS)),
            )
            .register_input(InputPort::new("in_value1", "Value1", DataKind::Number).with_default(0.0))
            .register_input(InputPort::new("in_value2", "Value2", DataKind::Number).with_default(0.0))
            .register_output(OutputPort::new("out_result", "Result", DataKind::Number));
        Self { ports }
    }

    fn compute(&self, inputs: &Inputs, _size: RasterSize) -> Result<Outputs, InputError> {
        let op = MathOp::from_index(inputs.required::<f32>("in_action")? as usize);
        let a = inputs.required::<f32>("in_value1")?;
        let b = inputs.required::<f32>("in_value2")?;
        Ok(Outputs::new().with("out_result", TypedValue::Number(op.apply(a, b))))
    }
}

impl_node!(MathNode);
