//! Shortest paths, simple path enumeration and DAG longest paths.

use super::error::{GraphError, GraphResult};
use super::store::{NodeId, WeightedGraph};
use petgraph::algo::{all_simple_paths, astar, bellman_ford, toposort};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::fmt::Display;
use tracing::debug;

/// An ordered sequence of nodes together with its total edge weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPath<N> {
    /// Nodes from start to end, inclusive
    pub nodes: Vec<N>,
    /// Sum of the weights along the path
    pub cost: f64,
}

impl<N> WeightedPath<N> {
    /// Creates a path from its nodes and cost.
    pub fn new(nodes: Vec<N>, cost: f64) -> Self {
        Self { nodes, cost }
    }

    /// The path containing no nodes.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0)
    }

    /// Returns the number of nodes on the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the path has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Converts every node with `f`, keeping order and cost.
    pub fn map_nodes<M>(self, f: impl FnMut(N) -> M) -> WeightedPath<M> {
        WeightedPath {
            nodes: self.nodes.into_iter().map(f).collect(),
            cost: self.cost,
        }
    }
}

impl<N: Display> WeightedPath<N> {
    /// Formats the path as `a -> b -> c`.
    pub fn path_string(&self) -> String {
        self.nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl<N: NodeId> WeightedGraph<N> {
    /// Finds the cheapest directed path from `start` to `end`.
    ///
    /// Uses Dijkstra's algorithm when every weight is non-negative and
    /// Bellman-Ford as soon as one negative weight is present.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if either endpoint is missing
    /// - [`GraphError::NoPath`] if `end` is unreachable from `start`
    /// - [`GraphError::NegativeCycle`] if a negative cycle is reachable
    ///   from `start`
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 2, 4.5), (1, 3, 3.2), (3, 5, 2.7)]);
    /// let path = graph.shortest_path(&1, &5).unwrap();
    /// assert_eq!(path.nodes, vec![1, 3, 5]);
    /// assert!((path.cost - 5.9).abs() < 1e-9);
    /// ```
    pub fn shortest_path(&self, start: &N, end: &N) -> GraphResult<WeightedPath<N>> {
        self.shortest_path_with(start, end, self.has_negative_weight())
    }

    /// [`shortest_path`](WeightedGraph::shortest_path) with the negative
    /// weight scan done by the caller, for repeated queries.
    pub(crate) fn shortest_path_with(
        &self,
        start: &N,
        end: &N,
        negative: bool,
    ) -> GraphResult<WeightedPath<N>> {
        let from = self.index_of(start)?;
        let to = self.index_of(end)?;

        if from == to {
            return Ok(WeightedPath::new(vec![start.clone()], 0.0));
        }

        let found = if negative {
            debug!(?start, ?end, "negative weights present, using Bellman-Ford");
            self.bellman_ford_path(from, to)?
        } else {
            astar(self.inner(), from, |node| node == to, |edge| *edge.weight(), |_| 0.0)
        };

        found
            .map(|(cost, indices)| WeightedPath::new(self.nodes_at(indices), cost))
            .ok_or_else(|| GraphError::no_path(start, end))
    }

    /// Enumerates every simple path from `start` to `end`.
    ///
    /// Returns an empty list when either node is missing, when no path
    /// exists, or when `start == end`. The cost grows exponentially on
    /// dense graphs and nothing is truncated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 2, 1.0), (2, 4, 1.0), (1, 4, 1.0)]);
    /// let mut paths = graph.all_paths(&1, &4);
    /// paths.sort();
    /// assert_eq!(paths, vec![vec![1, 2, 4], vec![1, 4]]);
    /// ```
    pub fn all_paths(&self, start: &N, end: &N) -> Vec<Vec<N>> {
        let (Ok(from), Ok(to)) = (self.index_of(start), self.index_of(end)) else {
            return Vec::new();
        };
        if from == to {
            return Vec::new();
        }

        let paths: Vec<Vec<N>> = all_simple_paths::<Vec<NodeIndex>, _>(self.inner(), from, to, 0, None)
            .map(|indices| self.nodes_at(indices))
            .collect();
        debug!(?start, ?end, count = paths.len(), "enumerated simple paths");
        paths
    }

    /// Finds the heaviest path anywhere in a directed acyclic graph.
    ///
    /// Nodes are visited in topological order. Each node keeps the best
    /// total reachable through its predecessors; a negative best restarts
    /// the path at the node itself. The path ends at the node with the
    /// largest total, the earliest in topological order on ties.
    ///
    /// # Errors
    ///
    /// [`GraphError::Unfeasible`] if the graph contains a cycle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 2, 4.5), (2, 4, 2.7), (1, 4, 6.7)]);
    /// let path = graph.longest_path().unwrap();
    /// assert_eq!(path.nodes, vec![1, 2, 4]);
    /// ```
    pub fn longest_path(&self) -> GraphResult<WeightedPath<N>> {
        let graph = self.inner();
        let order = toposort(graph, None).map_err(|_| GraphError::Unfeasible)?;

        // best[v] = (heaviest total ending at v, predecessor on that path)
        let mut best: Vec<(f64, Option<NodeIndex>)> = vec![(0.0, None); graph.node_count()];

        for &node in &order {
            let incoming = graph
                .edges_directed(node, Direction::Incoming)
                .map(|edge| (best[edge.source().index()].0 + edge.weight(), edge.source()))
                .max_by(|a, b| a.0.total_cmp(&b.0));

            best[node.index()] = match incoming {
                Some((total, source)) if total >= 0.0 => (total, Some(source)),
                _ => (0.0, None),
            };
        }

        let Some(end) = order.iter().copied().reduce(|current, candidate| {
            if best[candidate.index()].0 > best[current.index()].0 {
                candidate
            } else {
                current
            }
        }) else {
            return Ok(WeightedPath::empty());
        };

        let mut indices = vec![end];
        let mut current = end;
        while let Some(previous) = best[current.index()].1 {
            indices.push(previous);
            current = previous;
        }
        indices.reverse();

        debug!(length = indices.len(), cost = best[end.index()].0, "computed longest path");
        Ok(WeightedPath::new(self.nodes_at(indices), best[end.index()].0))
    }

    /// Sums the edge weights along `path`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if a node on the path is missing
    /// - [`GraphError::NoPath`] if two consecutive nodes are not joined by
    ///   an edge
    pub fn path_weight(&self, path: &[N]) -> GraphResult<f64> {
        let mut total = 0.0;
        for pair in path.windows(2) {
            let from = self.index_of(&pair[0])?;
            let to = self.index_of(&pair[1])?;
            let edge = self
                .inner()
                .find_edge(from, to)
                .ok_or_else(|| GraphError::no_path(&pair[0], &pair[1]))?;
            total += self.inner()[edge];
        }
        Ok(total)
    }

    /// Returns the consecutive pairs of `path` that are edges of the graph.
    ///
    /// This is the edge set a renderer colors when drawing a query result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 3, 3.2), (3, 5, 2.7)]);
    /// assert_eq!(graph.highlighted_edges(&[1, 3, 5]), vec![(1, 3), (3, 5)]);
    /// assert!(graph.highlighted_edges(&[5, 3]).is_empty());
    /// ```
    pub fn highlighted_edges(&self, path: &[N]) -> Vec<(N, N)> {
        path.windows(2)
            .filter(|pair| self.contains_edge(&pair[0], &pair[1]))
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }

    fn bellman_ford_path(
        &self,
        from: NodeIndex,
        to: NodeIndex,
    ) -> GraphResult<Option<(f64, Vec<NodeIndex>)>> {
        let paths = bellman_ford(self.inner(), from)
            .map_err(|_| GraphError::NegativeCycle(format!("{:?}", self.node_at(from))))?;

        let cost = paths.distances[to.index()];
        if cost.is_infinite() {
            return Ok(None);
        }

        let mut indices = vec![to];
        let mut current = to;
        while let Some(previous) = paths.predecessors[current.index()] {
            indices.push(previous);
            current = previous;
        }
        indices.reverse();

        Ok(Some((cost, indices)))
    }
}
