//! Weak and strong connectivity, component partitioning and diameter.

use super::error::{GraphError, GraphResult};
use super::store::{NodeId, WeightedGraph};
use petgraph::algo::{connected_components as count_components, dijkstra, kosaraju_scc};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl<N: NodeId> WeightedGraph<N> {
    /// Checks if the graph is weakly connected.
    ///
    /// Edge direction is ignored. An empty graph is not connected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let mut graph = WeightedGraph::from_edges([(1, 2, 1.0), (3, 2, 1.0)]);
    /// assert!(graph.is_connected());
    ///
    /// graph.add_node(4);
    /// assert!(!graph.is_connected());
    /// ```
    pub fn is_connected(&self) -> bool {
        !self.is_empty() && count_components(self.inner()) == 1
    }

    /// Partitions the nodes into weakly connected components.
    ///
    /// Every node appears in exactly one set. A weakly connected graph
    /// yields a single set holding every node; an empty graph yields none.
    /// Components are ordered by their earliest-inserted node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    /// use std::collections::HashSet;
    ///
    /// let mut graph = WeightedGraph::from_edges([(1, 2, 1.0), (3, 4, 1.0)]);
    /// graph.add_node(5);
    ///
    /// let components = graph.connected_components();
    /// assert_eq!(components.len(), 3);
    /// assert_eq!(components[0], HashSet::from([1, 2]));
    /// assert_eq!(components[2], HashSet::from([5]));
    /// ```
    pub fn connected_components(&self) -> Vec<HashSet<N>> {
        let graph = self.inner();
        let mut sets = UnionFind::new(graph.node_count());
        for edge in graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut slots: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<HashSet<N>> = Vec::new();
        for (index, label) in sets.into_labeling().into_iter().enumerate() {
            let slot = *slots.entry(label).or_insert_with(|| {
                components.push(HashSet::new());
                components.len() - 1
            });
            components[slot].insert(self.node_at(NodeIndex::new(index)).clone());
        }

        debug!(count = components.len(), "partitioned weak components");
        components
    }

    /// Checks if every node can reach every other node along directed edges.
    ///
    /// An empty graph is not strongly connected.
    pub fn is_strongly_connected(&self) -> bool {
        !self.is_empty() && kosaraju_scc(self.inner()).len() == 1
    }

    /// Partitions the nodes into strongly connected components.
    pub fn strongly_connected_components(&self) -> Vec<Vec<N>> {
        kosaraju_scc(self.inner())
            .into_iter()
            .map(|component| self.nodes_at(component))
            .collect()
    }

    /// Computes the weighted diameter of a strongly connected graph.
    ///
    /// Distances are measured on the undirected projection of the graph:
    /// opposite edges between the same pair collapse to the lighter weight
    /// and self-loops are dropped. The diameter is the greatest shortest
    /// distance over all node pairs.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Undefined`] if the graph is not strongly connected
    /// - [`GraphError::NegativeWeight`] if any edge weight is negative
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([("a", "b", 1.0), ("b", "c", 2.0), ("c", "a", 4.0)]);
    /// assert_eq!(graph.graph_diameter().unwrap(), 3.0);
    /// ```
    pub fn graph_diameter(&self) -> GraphResult<f64> {
        if !self.is_strongly_connected() {
            return Err(GraphError::Undefined);
        }
        if self.has_negative_weight() {
            return Err(GraphError::NegativeWeight);
        }

        let projection = self.undirected_projection();
        let diameter = projection
            .node_indices()
            .flat_map(|start| {
                dijkstra(&projection, start, None, |edge| *edge.weight()).into_values()
            })
            .fold(0.0_f64, f64::max);

        debug!(diameter, "computed diameter");
        Ok(diameter)
    }

    /// Builds an undirected copy of the graph whose node indices match.
    fn undirected_projection(&self) -> UnGraph<(), f64> {
        let graph = self.inner();
        let mut projection = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
        for _ in graph.node_indices() {
            projection.add_node(());
        }

        for edge in graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            if a == b {
                continue;
            }
            match projection.find_edge(a, b) {
                Some(existing) if *edge.weight() < projection[existing] => {
                    projection[existing] = *edge.weight();
                }
                Some(_) => {}
                None => {
                    projection.add_edge(a, b, *edge.weight());
                }
            }
        }

        projection
    }
}
