//! Error types for graph mutation and evaluation.

use thiserror::Error;

use crate::graph::NodeId;
use crate::port::PortId;
use crate::value::DataKind;

/// A rejected graph mutation. The graph is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No factory is registered for this node kind.
    #[error("unknown node kind '{0}'")]
    UnknownNodeKind(String),

    /// The node does not exist in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node exists but has no port with this id.
    #[error("node {node} has no port '{port}'")]
    PortNotFound {
        /// Node that was searched.
        node: NodeId,
        /// Requested port id.
        port: String,
    },

    /// The source port's kind cannot be converted to the target port's kind.
    #[error("cannot connect {from} output to {to} input")]
    TypeIncompatible {
        /// Source port kind.
        from: DataKind,
        /// Target port kind.
        to: DataKind,
    },

    /// The connection would close a cycle.
    #[error("connecting {source_node} to {target_node} would create a cycle")]
    CycleDetected {
        /// Source node of the rejected connection.
        source_node: NodeId,
        /// Target node of the rejected connection.
        target_node: NodeId,
    },

    /// An identical connection already exists.
    #[error("connection already exists")]
    DuplicateConnection,
}

/// A node could not obtain an input it needs.
///
/// This is an unmet node contract, not a user error: connections are type
/// checked on insertion, so it surfaces only when a required port is left
/// unconnected without a literal or carries an unconvertible literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Nothing was supplied for a required port.
    #[error("missing required input '{port}'")]
    MissingRequiredInput {
        /// Port id.
        port: PortId,
    },

    /// A value was supplied but cannot be converted to the kind the node reads.
    #[error("input '{port}' expected {expected}, found {found}")]
    TypeMismatch {
        /// Port id.
        port: PortId,
        /// Kind the node asked for.
        expected: DataKind,
        /// Kind that was supplied.
        found: DataKind,
    },
}

/// An evaluation pass failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The node does not exist in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node cannot be evaluated in the requested role: sinks have no
    /// outputs of their own, and only sinks render a final texture.
    #[error("node {0} cannot be evaluated in this role")]
    NotEvaluable(NodeId),

    /// A node's `calculate` rejected its inputs.
    #[error("node {node}: {source}")]
    Input {
        /// Node whose calculation failed.
        node: NodeId,
        /// Underlying input failure.
        #[source]
        source: InputError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::UnknownNodeKind("blur".into());
        assert_eq!(err.to_string(), "unknown node kind 'blur'");

        let err = GraphError::TypeIncompatible {
            from: DataKind::Color,
            to: DataKind::Number,
        };
        assert_eq!(err.to_string(), "cannot connect Color output to Number input");

        let err = GraphError::CycleDetected {
            source_node: NodeId(2),
            target_node: NodeId(1),
        };
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_eval_error_source_chain() {
        use std::error::Error as _;
        let err = EvalError::Input {
            node: NodeId(3),
            source: InputError::MissingRequiredInput { port: "in_color" },
        };
        assert_eq!(
            err.to_string(),
            "node NodeId(3): missing required input 'in_color'"
        );
        assert!(err.source().is_some());
    }
}
