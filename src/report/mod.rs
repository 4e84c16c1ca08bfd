//! Report generation for graph analysis results.
//!
//! This module runs every graph query once, collects the outcomes into a
//! [`ReportData`] value, and renders it as JSON or Markdown.

pub mod json;
pub mod markdown;

use crate::graph::{DegreeStats, GraphResult, NodeId, WeightedGraph, WeightedPath};
use std::collections::HashSet;
use std::fmt::Display;
use std::io::{self, Write};

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    #[default]
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!(
                "Unknown report format: '{}'. Valid formats: json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// One edge of the analyzed graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    pub weight: f64,
    /// Whether the edge lies on the route's shortest path
    pub highlighted: bool,
}

/// Path queries between one requested pair of nodes.
#[derive(Debug, Clone)]
pub struct RouteSummary {
    pub from: String,
    pub to: String,
    pub shortest: GraphResult<WeightedPath<String>>,
    pub all_paths: Vec<Vec<String>>,
}

/// Outcomes of every query, with node identifiers rendered as strings.
#[derive(Debug, Clone)]
pub struct ReportData {
    /// Report heading
    pub title: String,
    /// Nodes sorted by identifier
    pub nodes: Vec<String>,
    /// Edges sorted by (source, target)
    pub edges: Vec<EdgeRow>,
    /// Degree of each node, in node order
    pub degrees: Vec<(String, usize)>,
    pub degree_stats: Option<DegreeStats>,
    pub route: Option<RouteSummary>,
    pub longest_path: GraphResult<WeightedPath<String>>,
    pub weakly_connected: bool,
    /// Weak components, each sorted, ordered by first member
    pub components: Vec<Vec<String>>,
    pub strongly_connected: bool,
    pub diameter: GraphResult<f64>,
    pub circuits: Vec<Vec<String>>,
    pub cheapest_circuit_path: GraphResult<WeightedPath<String>>,
}

impl ReportData {
    /// Runs every query against `graph` and collects the results.
    ///
    /// When `route` is given, the shortest path and all simple paths
    /// between the pair are included and the shortest path's edges are
    /// marked as highlighted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graphscope::graph::WeightedGraph;
    /// use graphscope::report::ReportData;
    ///
    /// let graph = WeightedGraph::from_edges([(1, 2, 1.0), (2, 3, 2.0)]);
    /// let data = ReportData::collect("chain", &graph, Some((&1, &3)));
    ///
    /// assert_eq!(data.nodes, vec!["1", "2", "3"]);
    /// assert!(data.edges.iter().all(|e| e.highlighted));
    /// ```
    pub fn collect<N>(title: impl Into<String>, graph: &WeightedGraph<N>, route: Option<(&N, &N)>) -> Self
    where
        N: NodeId + Display,
    {
        let route_result = route.map(|(from, to)| (from, to, graph.shortest_path(from, to)));

        let highlighted: HashSet<(N, N)> = match &route_result {
            Some((_, _, Ok(path))) => graph.highlighted_edges(&path.nodes).into_iter().collect(),
            _ => HashSet::new(),
        };

        let mut nodes = graph.nodes();
        nodes.sort();

        let mut weights: Vec<((N, N), f64)> = graph.edge_weights().into_iter().collect();
        weights.sort_by(|a, b| a.0.cmp(&b.0));
        let edges = weights
            .into_iter()
            .map(|(pair, weight)| EdgeRow {
                source: pair.0.to_string(),
                target: pair.1.to_string(),
                weight,
                highlighted: highlighted.contains(&pair),
            })
            .collect();

        let circuits = graph.find_circuits();
        let cheapest_circuit_path = graph.cheapest_circuit_path(&circuits).map(label_path);

        let mut degrees: Vec<(N, usize)> = graph.degrees().into_iter().collect();
        degrees.sort();

        let mut components: Vec<Vec<N>> = graph
            .connected_components()
            .into_iter()
            .map(|component| {
                let mut members: Vec<N> = component.into_iter().collect();
                members.sort();
                members
            })
            .collect();
        components.sort();

        let route = route_result.map(|(from, to, shortest)| RouteSummary {
            from: from.to_string(),
            to: to.to_string(),
            shortest: shortest.map(label_path),
            all_paths: graph.all_paths(from, to).into_iter().map(label_nodes).collect(),
        });

        Self {
            title: title.into(),
            nodes: label_nodes(nodes),
            edges,
            degrees: degrees
                .into_iter()
                .map(|(node, degree)| (node.to_string(), degree))
                .collect(),
            degree_stats: graph.degree_stats(),
            route,
            longest_path: graph.longest_path().map(label_path),
            weakly_connected: graph.is_connected(),
            components: components.into_iter().map(label_nodes).collect(),
            strongly_connected: graph.is_strongly_connected(),
            diameter: graph.graph_diameter(),
            circuits: circuits.into_iter().map(label_nodes).collect(),
            cheapest_circuit_path,
        }
    }

    /// Returns the number of highlighted edges.
    pub fn highlighted_count(&self) -> usize {
        self.edges.iter().filter(|e| e.highlighted).count()
    }
}

fn label_nodes<N: Display>(nodes: Vec<N>) -> Vec<String> {
    nodes.into_iter().map(|n| n.to_string()).collect()
}

fn label_path<N: Display>(path: WeightedPath<N>) -> WeightedPath<String> {
    path.map_nodes(|n| n.to_string())
}

/// Formats a circuit as `a -> b -> c -> a`.
pub fn circuit_path(nodes: &[String]) -> String {
    match nodes.first() {
        Some(first) => format!("{} -> {}", nodes.join(" -> "), first),
        None => String::new(),
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(format: ReportFormat, data: &ReportData, writer: &mut W) -> io::Result<()> {
    match format {
        ReportFormat::Json => json::JsonExporter.export(data, writer),
        ReportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ReportFormat, data: &ReportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::graph::GraphError;

    pub(crate) fn sample_graph(with_cycle: bool) -> WeightedGraph<u32> {
        let mut graph = WeightedGraph::from_edges([
            (1, 2, 4.5),
            (1, 3, 3.2),
            (2, 4, 2.7),
            (3, 4, 1.8),
            (1, 4, 6.7),
            (3, 5, 2.7),
        ]);
        if with_cycle {
            graph.add_edge(5, 1, 1.0);
        }
        graph
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(
            "markdown".parse::<ReportFormat>().unwrap(),
            ReportFormat::Markdown
        );
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_report_format_display() {
        assert_eq!(format!("{}", ReportFormat::Json), "json");
        assert_eq!(format!("{}", ReportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_collect_acyclic() {
        let graph = sample_graph(false);
        let data = ReportData::collect("sample", &graph, Some((&1, &5)));

        assert_eq!(data.nodes, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(data.edges.len(), 6);
        assert_eq!(data.edges[0].source, "1");
        assert_eq!(data.edges[0].target, "2");
        assert_eq!(data.highlighted_count(), 2);
        assert_eq!(data.degrees[0], ("1".to_string(), 3));

        let route = data.route.as_ref().unwrap();
        assert_eq!(route.shortest.as_ref().unwrap().nodes, vec!["1", "3", "5"]);
        assert_eq!(route.all_paths, vec![vec!["1", "3", "5"]]);

        assert_eq!(
            data.longest_path.as_ref().unwrap().nodes,
            vec!["1", "2", "4"]
        );
        assert!(data.weakly_connected);
        assert_eq!(data.components.len(), 1);
        assert_eq!(data.diameter, Err(GraphError::Undefined));
        assert!(data.circuits.is_empty());
        assert_eq!(data.cheapest_circuit_path, Err(GraphError::NoCircuits));
    }

    #[test]
    fn test_collect_with_cycle() {
        let graph = sample_graph(true);
        let data = ReportData::collect("cyclic", &graph, None);

        assert!(data.route.is_none());
        assert_eq!(data.highlighted_count(), 0);
        assert_eq!(data.longest_path, Err(GraphError::Unfeasible));
        assert_eq!(data.circuits, vec![vec!["1", "3", "5"]]);
        assert_eq!(
            data.cheapest_circuit_path.as_ref().unwrap().nodes,
            vec!["5", "1"]
        );
    }

    #[test]
    fn test_collect_circuit_fields_agree() {
        let mut graph = sample_graph(true);
        graph.add_edge(4, 3, 0.4);
        let data = ReportData::collect("cyclic", &graph, None);

        let expected: Vec<Vec<String>> = graph
            .find_circuits()
            .into_iter()
            .map(label_nodes)
            .collect();
        assert_eq!(data.circuits, expected);
        assert_eq!(
            data.cheapest_circuit_path,
            graph.shortest_path_through_circuits().map(label_path)
        );
        assert_eq!(data.cheapest_circuit_path.as_ref().unwrap().nodes, vec!["4", "3"]);
    }

    #[test]
    fn test_collect_unreachable_route() {
        let graph = sample_graph(false);
        let data = ReportData::collect("sample", &graph, Some((&5, &1)));

        let route = data.route.as_ref().unwrap();
        assert!(matches!(route.shortest, Err(GraphError::NoPath { .. })));
        assert!(route.all_paths.is_empty());
        assert_eq!(data.highlighted_count(), 0);
    }

    #[test]
    fn test_circuit_path() {
        let nodes = vec!["a".to_string(), "b".to_string()];
        assert_eq!(circuit_path(&nodes), "a -> b -> a");
        assert_eq!(circuit_path(&[]), "");
    }

    #[test]
    fn test_export_to_string() {
        let graph = sample_graph(false);
        let data = ReportData::collect("sample", &graph, Some((&1, &5)));

        let json = export_to_string(ReportFormat::Json, &data).unwrap();
        assert!(json.trim_start().starts_with('{'));

        let markdown = export_to_string(ReportFormat::Markdown, &data).unwrap();
        assert!(markdown.starts_with("# sample"));
    }
}
