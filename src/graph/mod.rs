//! Graph module for weighted directed graph analysis.
//!
//! This module provides the [`WeightedGraph`] struct for storing nodes and
//! weighted edges, together with the queries run against it:
//!
//! - **Paths**: shortest path, all simple paths, longest path on a DAG
//! - **Cycles**: detection and enumeration of every simple circuit
//! - **Connectivity**: weak and strong connectivity, components, diameter
//! - **Circuits**: cheapest shortest path between adjacent circuit nodes
//!
//! Queries never modify the graph. Failures are reported as [`GraphError`].
//!
//! # Example
//!
//! ```rust
//! use graphscope::graph::{GraphError, WeightedGraph};
//!
//! let mut graph = WeightedGraph::new();
//! graph.add_edge(1, 2, 4.5);
//! graph.add_edge(2, 3, 1.0);
//!
//! assert_eq!(graph.shortest_path(&1, &3).unwrap().nodes, vec![1, 2, 3]);
//! assert!(!graph.has_cycle());
//!
//! graph.add_edge(3, 1, 2.0);
//! assert_eq!(graph.longest_path(), Err(GraphError::Unfeasible));
//! ```

mod circuits;
mod connectivity;
mod cycles;
mod error;
mod paths;
mod store;

pub use error::{GraphError, GraphResult};
pub use paths::WeightedPath;
pub use store::{DegreeStats, NodeId, WeightedGraph};
