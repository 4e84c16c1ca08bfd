//! Circuit detection and enumeration.
//!
//! Detection is a topological sort attempt. Enumeration uses Johnson's
//! algorithm: strongly connected components are taken in order of their
//! earliest-inserted node, every circuit through that node is collected,
//! then the node is removed and the rest of the component is split again.
//! Nodes that cannot currently lead back to the start stay blocked so that
//! no dead end is explored twice. Both searches keep their own stacks, so
//! long cycles do not grow the call stack.

use super::store::{NodeId, WeightedGraph};
use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

impl<N: NodeId> WeightedGraph<N> {
    /// Checks if the graph contains a directed cycle.
    ///
    /// Self-loops count as cycles.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let mut graph = WeightedGraph::from_edges([("a", "b", 1.0)]);
    /// assert!(!graph.has_cycle());
    ///
    /// graph.add_edge("b", "a", 1.0);
    /// assert!(graph.has_cycle());
    /// ```
    pub fn has_cycle(&self) -> bool {
        toposort(self.inner(), None).is_err()
    }

    /// Enumerates every simple cycle of the graph.
    ///
    /// Each cycle lists its nodes in traversal order starting from its
    /// earliest-inserted node, without repeating the first node at the end.
    /// A self-loop is a one-node cycle; a pair of opposite edges is a
    /// two-node cycle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_edges([
    ///     ("a", "b", 1.0),
    ///     ("b", "c", 1.0),
    ///     ("c", "a", 1.0),
    ///     ("c", "c", 1.0),
    /// ]);
    ///
    /// let circuits = graph.find_circuits();
    /// assert_eq!(circuits, vec![vec!["a", "b", "c"], vec!["c"]]);
    /// ```
    pub fn find_circuits(&self) -> Vec<Vec<N>> {
        let circuits = CircuitSearch::new(self.inner()).run();
        debug!(count = circuits.len(), "enumerated circuits");

        circuits
            .into_iter()
            .map(|circuit| self.nodes_at(circuit))
            .collect()
    }

    /// Returns the length of every circuit, in [`find_circuits`] order.
    ///
    /// [`find_circuits`]: WeightedGraph::find_circuits
    pub fn length_of_circuits(&self) -> Vec<usize> {
        self.find_circuits().iter().map(Vec::len).collect()
    }
}

/// One level of the circuit search.
struct Frame {
    node: usize,
    successors: Vec<usize>,
    next: usize,
    found: bool,
}

/// State of one run of Johnson's circuit search.
struct CircuitSearch<'a, N> {
    graph: &'a DiGraph<N, f64>,
    /// Members of the component being searched
    allowed: Vec<bool>,
    blocked: Vec<bool>,
    /// blocked_by[w] holds the nodes to unblock once w is unblocked
    blocked_by: Vec<HashSet<usize>>,
    stack: Vec<NodeIndex>,
    circuits: Vec<Vec<NodeIndex>>,
}

impl<'a, N> CircuitSearch<'a, N> {
    fn new(graph: &'a DiGraph<N, f64>) -> Self {
        let count = graph.node_count();
        Self {
            graph,
            allowed: vec![false; count],
            blocked: vec![false; count],
            blocked_by: vec![HashSet::new(); count],
            stack: Vec::new(),
            circuits: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<NodeIndex>> {
        let all: Vec<usize> = (0..self.graph.node_count()).collect();

        // Min-heap on the earliest member keeps circuits ordered by start node
        let mut pending: BinaryHeap<Reverse<Vec<usize>>> =
            self.cyclic_components(&all).into_iter().map(Reverse).collect();

        while let Some(Reverse(component)) = pending.pop() {
            let start = component[0];
            for &member in &component {
                self.allowed[member] = true;
            }

            self.search(start);

            for &member in &component {
                self.allowed[member] = false;
                self.blocked[member] = false;
                self.blocked_by[member].clear();
            }
            pending.extend(self.cyclic_components(&component[1..]).into_iter().map(Reverse));
        }

        self.circuits
    }

    /// Splits `members` into strongly connected components that can hold a
    /// circuit, each sorted ascending.
    fn cyclic_components(&self, members: &[usize]) -> Vec<Vec<usize>> {
        let local: HashMap<usize, usize> = members
            .iter()
            .enumerate()
            .map(|(i, &member)| (member, i))
            .collect();

        let mut sub: DiGraph<usize, ()> = DiGraph::with_capacity(members.len(), members.len());
        for &member in members {
            sub.add_node(member);
        }
        for (i, &member) in members.iter().enumerate() {
            for next in self
                .graph
                .neighbors_directed(NodeIndex::new(member), Direction::Outgoing)
            {
                if let Some(&j) = local.get(&next.index()) {
                    sub.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                }
            }
        }

        kosaraju_scc(&sub)
            .into_iter()
            .filter(|component| component.len() > 1 || sub.contains_edge(component[0], component[0]))
            .map(|component| {
                let mut nodes: Vec<usize> = component.into_iter().map(|idx| sub[idx]).collect();
                nodes.sort_unstable();
                nodes
            })
            .collect()
    }

    fn successors(&self, node: usize) -> Vec<usize> {
        let mut successors: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(node), Direction::Outgoing)
            .map(|n| n.index())
            .filter(|&n| self.allowed[n])
            .collect();
        successors.sort_unstable();
        successors
    }

    fn enter(&mut self, node: usize) -> Frame {
        self.stack.push(NodeIndex::new(node));
        self.blocked[node] = true;
        Frame {
            node,
            successors: self.successors(node),
            next: 0,
            found: false,
        }
    }

    /// Collects every circuit through `start` within the allowed component.
    fn search(&mut self, start: usize) {
        let mut frames = vec![self.enter(start)];

        while let Some(frame) = frames.last_mut() {
            if let Some(&next) = frame.successors.get(frame.next) {
                frame.next += 1;
                if next == start {
                    frame.found = true;
                    self.circuits.push(self.stack.clone());
                } else if !self.blocked[next] {
                    let child = self.enter(next);
                    frames.push(child);
                }
                continue;
            }

            let Some(Frame {
                node,
                successors,
                found,
                ..
            }) = frames.pop()
            else {
                break;
            };

            if found {
                self.unblock(node);
                if let Some(parent) = frames.last_mut() {
                    parent.found = true;
                }
            } else {
                for next in successors {
                    self.blocked_by[next].insert(node);
                }
            }
            self.stack.pop();
        }
    }

    fn unblock(&mut self, node: usize) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if !self.blocked[current] {
                continue;
            }
            self.blocked[current] = false;
            pending.extend(std::mem::take(&mut self.blocked_by[current]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> WeightedGraph<u32> {
        WeightedGraph::from_edges([
            (1, 2, 4.5),
            (1, 3, 3.2),
            (2, 4, 2.7),
            (3, 4, 1.8),
            (1, 4, 6.7),
            (3, 5, 2.7),
        ])
    }

    fn sorted(mut circuits: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
        circuits.sort();
        circuits
    }

    #[test]
    fn test_acyclic_graph() {
        let graph = sample_graph();

        assert!(!graph.has_cycle());
        assert!(graph.find_circuits().is_empty());
        assert!(graph.length_of_circuits().is_empty());
    }

    #[test]
    fn test_closing_edge_creates_circuit() {
        let mut graph = sample_graph();
        graph.add_edge(5, 1, 1.0);

        assert!(graph.has_cycle());
        assert_eq!(graph.find_circuits(), vec![vec![1, 3, 5]]);
        assert_eq!(graph.length_of_circuits(), vec![3]);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = WeightedGraph::new();
        graph.add_edge(7, 7, 0.5);

        assert!(graph.has_cycle());
        assert_eq!(graph.find_circuits(), vec![vec![7]]);
        assert_eq!(graph.length_of_circuits(), vec![1]);
    }

    #[test]
    fn test_mutual_edges() {
        let graph = WeightedGraph::from_edges([(1, 2, 1.0), (2, 1, 1.0)]);

        assert_eq!(graph.find_circuits(), vec![vec![1, 2]]);
        assert_eq!(graph.length_of_circuits(), vec![2]);
    }

    #[test]
    fn test_complete_digraph() {
        let mut graph = WeightedGraph::new();
        for a in 1..=3 {
            for b in 1..=3 {
                if a != b {
                    graph.add_edge(a, b, 1.0);
                }
            }
        }

        assert_eq!(
            sorted(graph.find_circuits()),
            vec![
                vec![1, 2],
                vec![1, 2, 3],
                vec![1, 3],
                vec![1, 3, 2],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_circuits_sharing_a_node() {
        // Figure-eight: 1 -> 2 -> 1 and 1 -> 3 -> 4 -> 1
        let graph = WeightedGraph::from_edges([
            (1, 2, 1.0),
            (2, 1, 1.0),
            (1, 3, 1.0),
            (3, 4, 1.0),
            (4, 1, 1.0),
        ]);

        assert_eq!(
            sorted(graph.find_circuits()),
            vec![vec![1, 2], vec![1, 3, 4]]
        );
    }

    #[test]
    fn test_circuit_order_follows_insertion() {
        let graph = WeightedGraph::from_edges([("z", "y", 1.0), ("y", "z", 1.0)]);
        assert_eq!(graph.find_circuits(), vec![vec!["z", "y"]]);
    }

    #[test]
    fn test_circuits_are_closed_walks() {
        let graph = WeightedGraph::from_edges([
            (1, 2, 1.0),
            (2, 3, 1.0),
            (3, 1, 1.0),
            (3, 4, 1.0),
            (4, 2, 1.0),
            (4, 4, 1.0),
        ]);

        let circuits = graph.find_circuits();
        assert_eq!(circuits.len(), 3);
        for circuit in &circuits {
            let unique: HashSet<_> = circuit.iter().collect();
            assert_eq!(unique.len(), circuit.len());
            for (i, node) in circuit.iter().enumerate() {
                let next = &circuit[(i + 1) % circuit.len()];
                assert!(graph.contains_edge(node, next));
            }
        }
    }

    fn ring(nodes: u32) -> WeightedGraph<u32> {
        let mut graph = WeightedGraph::with_capacity(nodes as usize, nodes as usize);
        for i in 0..nodes {
            graph.add_edge(i, (i + 1) % nodes, 1.0);
        }
        graph
    }

    #[test]
    fn test_long_ring() {
        let graph = ring(20_000);

        assert!(graph.has_cycle());
        let circuits = graph.find_circuits();
        assert_eq!(circuits.len(), 1);
        assert_eq!(circuits[0].len(), 20_000);
        assert_eq!(circuits[0][0], 0);
        assert_eq!(circuits[0][19_999], 19_999);
    }

    #[test]
    fn test_long_chain_is_acyclic() {
        let nodes: Vec<u32> = (0..20_000).collect();
        let chain = WeightedGraph::from_edges(nodes.windows(2).map(|pair| (pair[0], pair[1], 1.0)));

        assert!(!chain.has_cycle());
        assert!(chain.find_circuits().is_empty());
    }

    #[test]
    fn test_long_ring_with_nested_circuit() {
        // A chord 10 -> 5 adds a short circuit inside the long one
        let mut graph = ring(5_000);
        graph.add_edge(10, 5, 1.0);

        assert_eq!(
            graph.find_circuits(),
            vec![(0..5_000).collect::<Vec<u32>>(), (5..=10).collect()]
        );
    }
}
