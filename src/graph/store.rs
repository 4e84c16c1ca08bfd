//! Weighted directed graph storage using petgraph.
//!
//! Nodes are caller-supplied identifiers; edges carry an `f64` weight.
//! Every algorithm in this module tree reads from the same petgraph
//! `DiGraph`, looking identifiers up through a hash index.

use super::error::{GraphError, GraphResult};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

/// Bounds required of a node identifier.
///
/// Implemented for every type that is `Clone + Eq + Hash + Ord + Debug`,
/// so integers, strings and small tuples all work out of the box.
pub trait NodeId: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> NodeId for T {}

/// Degree statistics over all nodes of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DegreeStats {
    /// Smallest degree of any node
    pub min: usize,
    /// Largest degree of any node
    pub max: usize,
    /// Average degree
    pub mean: f64,
    /// Sum of all degrees (twice the edge count)
    pub total: usize,
}

/// A directed graph with weighted edges.
///
/// Edges point from source to target. At most one edge exists per ordered
/// pair; adding the same pair again overwrites its weight. Adding an edge
/// inserts any missing endpoint.
///
/// # Example
///
/// ```rust
/// use graphscope::graph::WeightedGraph;
///
/// let mut graph = WeightedGraph::new();
/// graph.add_edge("a", "b", 1.5);
/// graph.add_edge("b", "c", 2.0);
/// graph.add_node("d");
///
/// assert_eq!(graph.node_count(), 4);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.degree(&"b").unwrap(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedGraph<N> {
    /// The underlying directed graph
    graph: DiGraph<N, f64>,
    /// Maps node identifiers to their indices for O(1) lookup
    node_indices: HashMap<N, NodeIndex>,
}

impl<N: NodeId> Default for WeightedGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> WeightedGraph<N> {
    /// Creates a new empty graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph: WeightedGraph<u32> = WeightedGraph::new();
    /// assert!(graph.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of nodes
    /// * `edges` - Expected number of edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Builds a graph from `(source, target, weight)` triples.
    ///
    /// Later triples for the same ordered pair overwrite earlier weights.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 2, 4.5), (1, 3, 3.2), (1, 2, 1.0)]);
    /// assert_eq!(graph.edge_count(), 2);
    /// assert_eq!(graph.edge_weight(&1, &2), Some(1.0));
    /// ```
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let edges = edges.into_iter();
        let (lower, _) = edges.size_hint();
        let mut graph = Self::with_capacity(lower, lower);

        for (source, target, weight) in edges {
            graph.add_edge(source, target, weight);
        }

        graph
    }

    /// Adds a node to the graph.
    ///
    /// # Returns
    ///
    /// `true` if the node was inserted, `false` if it already existed.
    pub fn add_node(&mut self, id: N) -> bool {
        if self.node_indices.contains_key(&id) {
            return false;
        }
        self.insert_node(id);
        true
    }

    /// Adds a directed edge from `source` to `target`.
    ///
    /// Missing endpoints are inserted first. If the edge already exists its
    /// weight is replaced.
    ///
    /// # Returns
    ///
    /// The previous weight of the edge, if there was one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let mut graph = WeightedGraph::new();
    /// assert_eq!(graph.add_edge('a', 'b', 2.0), None);
    /// assert_eq!(graph.add_edge('a', 'b', 3.0), Some(2.0));
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn add_edge(&mut self, source: N, target: N, weight: f64) -> Option<f64> {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);

        match self.graph.find_edge(from, to) {
            Some(edge) => {
                let previous = std::mem::replace(&mut self.graph[edge], weight);
                trace!(
                    source = ?self.graph[from],
                    target = ?self.graph[to],
                    previous,
                    weight,
                    "overwrote edge weight"
                );
                Some(previous)
            }
            None => {
                self.graph.add_edge(from, to, weight);
                None
            }
        }
    }

    /// Returns the total degree (in-degree plus out-degree) of a node.
    ///
    /// A self-loop contributes two: once as an outgoing and once as an
    /// incoming edge.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn degree(&self, node: &N) -> GraphResult<usize> {
        let idx = self.index_of(node)?;
        Ok(self.directed_degree(idx, Direction::Outgoing)
            + self.directed_degree(idx, Direction::Incoming))
    }

    /// Returns the number of edges entering a node.
    pub fn in_degree(&self, node: &N) -> GraphResult<usize> {
        let idx = self.index_of(node)?;
        Ok(self.directed_degree(idx, Direction::Incoming))
    }

    /// Returns the number of edges leaving a node.
    pub fn out_degree(&self, node: &N) -> GraphResult<usize> {
        let idx = self.index_of(node)?;
        Ok(self.directed_degree(idx, Direction::Outgoing))
    }

    /// Returns the total degree of every node.
    pub fn degrees(&self) -> HashMap<N, usize> {
        self.graph
            .node_indices()
            .map(|idx| {
                let degree = self.directed_degree(idx, Direction::Outgoing)
                    + self.directed_degree(idx, Direction::Incoming);
                (self.graph[idx].clone(), degree)
            })
            .collect()
    }

    /// Computes degree statistics across all nodes.
    ///
    /// # Returns
    ///
    /// `None` for an empty graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 2, 1.0), (1, 3, 1.0)]);
    /// let stats = graph.degree_stats().unwrap();
    /// assert_eq!(stats.max, 2);
    /// assert_eq!(stats.min, 1);
    /// assert_eq!(stats.total, 4);
    /// ```
    pub fn degree_stats(&self) -> Option<DegreeStats> {
        let degrees = self.degrees();
        let min = degrees.values().copied().min()?;
        let max = degrees.values().copied().max()?;
        let total: usize = degrees.values().sum();

        Some(DegreeStats {
            min,
            max,
            mean: total as f64 / degrees.len() as f64,
            total,
        })
    }

    /// Returns a snapshot of every edge weight keyed by `(source, target)`.
    ///
    /// The map is an owned copy; changing it does not affect the graph.
    /// Rendering layers use it to label edges.
    pub fn edge_weights(&self) -> HashMap<(N, N), f64> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    (
                        self.graph[edge.source()].clone(),
                        self.graph[edge.target()].clone(),
                    ),
                    *edge.weight(),
                )
            })
            .collect()
    }

    /// Returns the weight of the edge from `source` to `target`, if present.
    pub fn edge_weight(&self, source: &N, target: &N) -> Option<f64> {
        let from = *self.node_indices.get(source)?;
        let to = *self.node_indices.get(target)?;
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge])
    }

    /// Returns true if an edge from `source` to `target` exists.
    pub fn contains_edge(&self, source: &N, target: &N) -> bool {
        self.edge_weight(source, target).is_some()
    }

    /// Returns the targets of a node's outgoing edges, sorted.
    pub fn successors(&self, node: &N) -> GraphResult<Vec<N>> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Returns the sources of a node's incoming edges, sorted.
    pub fn predecessors(&self, node: &N) -> GraphResult<Vec<N>> {
        self.neighbors(node, Direction::Incoming)
    }

    /// Returns all nodes in insertion order.
    pub fn nodes(&self) -> Vec<N> {
        self.graph.node_weights().cloned().collect()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, node: &N) -> bool {
        self.node_indices.contains_key(node)
    }

    pub(crate) fn inner(&self) -> &DiGraph<N, f64> {
        &self.graph
    }

    pub(crate) fn index_of(&self, node: &N) -> GraphResult<NodeIndex> {
        self.node_indices
            .get(node)
            .copied()
            .ok_or_else(|| GraphError::not_found(node))
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &N {
        &self.graph[idx]
    }

    pub(crate) fn nodes_at(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<N> {
        indices
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    pub(crate) fn has_negative_weight(&self) -> bool {
        self.graph.edge_weights().any(|&weight| weight < 0.0)
    }

    fn ensure_node(&mut self, id: N) -> NodeIndex {
        match self.node_indices.get(&id) {
            Some(&idx) => idx,
            None => self.insert_node(id),
        }
    }

    fn insert_node(&mut self, id: N) -> NodeIndex {
        let idx = self.graph.add_node(id.clone());
        self.node_indices.insert(id, idx);
        idx
    }

    fn directed_degree(&self, idx: NodeIndex, direction: Direction) -> usize {
        self.graph.edges_directed(idx, direction).count()
    }

    fn neighbors(&self, node: &N, direction: Direction) -> GraphResult<Vec<N>> {
        let idx = self.index_of(node)?;
        let mut neighbors = self.nodes_at(self.graph.neighbors_directed(idx, direction));
        neighbors.sort();
        Ok(neighbors)
    }
}
