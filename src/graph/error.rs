//! Error types returned by graph queries.

use thiserror::Error;

/// Errors that can occur while querying a [`WeightedGraph`](super::WeightedGraph).
///
/// Node identifiers are carried as their `Debug` rendering so the error type
/// stays independent of the node type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A referenced node is not part of the graph
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Both nodes exist but no directed path joins them
    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },

    /// The operation needs a directed acyclic graph
    #[error("graph contains a cycle")]
    Unfeasible,

    /// The operation needs a strongly connected graph
    #[error("graph is not strongly connected")]
    Undefined,

    /// The operation needs at least one circuit
    #[error("graph has no circuits")]
    NoCircuits,

    /// A negative-weight cycle is reachable from the given node
    #[error("negative cycle reachable from {0}")]
    NegativeCycle(String),

    /// Undirected distances cannot be computed with negative edge weights
    #[error("graph has a negative edge weight")]
    NegativeWeight,
}

/// Result type for graph queries.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    pub(crate) fn not_found(node: &impl std::fmt::Debug) -> Self {
        Self::NodeNotFound(format!("{node:?}"))
    }

    pub(crate) fn no_path(from: &impl std::fmt::Debug, to: &impl std::fmt::Debug) -> Self {
        Self::NoPath {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(GraphError::not_found(&7).to_string(), "node not found: 7");
        assert_eq!(
            GraphError::no_path(&"a", &"b").to_string(),
            "no path from \"a\" to \"b\""
        );
        assert_eq!(GraphError::Unfeasible.to_string(), "graph contains a cycle");
        assert_eq!(
            GraphError::Undefined.to_string(),
            "graph is not strongly connected"
        );
        assert_eq!(GraphError::NoCircuits.to_string(), "graph has no circuits");
    }
}
