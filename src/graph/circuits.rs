//! Queries that combine circuit enumeration with shortest paths.

use super::error::{GraphError, GraphResult};
use super::paths::WeightedPath;
use super::store::{NodeId, WeightedGraph};
use tracing::debug;

impl<N: NodeId> WeightedGraph<N> {
    /// Finds the cheapest shortest path between two adjacent circuit nodes.
    ///
    /// For every circuit and every pair of consecutive nodes on it
    /// (including the closing pair), the shortest path between the pair is
    /// computed. The cheapest one wins; on ties the first found in circuit
    /// order is kept. A self-loop contributes the single-node path of cost 0.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NoCircuits`] if the graph is acyclic
    /// - [`GraphError::NegativeCycle`] if shortest paths are undefined
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 3, 3.2), (3, 5, 2.7), (5, 1, 1.0)]);
    /// let path = graph.shortest_path_through_circuits().unwrap();
    /// assert_eq!(path.nodes, vec![5, 1]);
    /// assert_eq!(path.cost, 1.0);
    /// ```
    pub fn shortest_path_through_circuits(&self) -> GraphResult<WeightedPath<N>> {
        self.cheapest_circuit_path(&self.find_circuits())
    }

    /// Cheapest adjacent-pair shortest path over already enumerated circuits.
    pub(crate) fn cheapest_circuit_path(&self, circuits: &[Vec<N>]) -> GraphResult<WeightedPath<N>> {
        let negative = self.has_negative_weight();
        let mut cheapest: Option<WeightedPath<N>> = None;

        for circuit in circuits {
            for (i, from) in circuit.iter().enumerate() {
                let to = &circuit[(i + 1) % circuit.len()];
                let candidate = self.shortest_path_with(from, to, negative)?;
                if cheapest
                    .as_ref()
                    .map_or(true, |best| candidate.cost < best.cost)
                {
                    cheapest = Some(candidate);
                }
            }
        }

        let cheapest = cheapest.ok_or(GraphError::NoCircuits)?;
        debug!(cost = cheapest.cost, length = cheapest.len(), "cheapest circuit path");
        Ok(cheapest)
    }
}
