use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graphscope::graph::WeightedGraph;
use graphscope::report::{export, ReportData, ReportFormat};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphscope")]
#[command(version)]
#[command(about = "Directed weighted graph analysis: paths, circuits, connectivity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the built-in five node sample graph
    Demo {
        /// Add the edge 5 -> 1 so the graph contains a circuit
        #[arg(long)]
        with_cycle: bool,

        /// Start node of the reported route
        #[arg(long, default_value = "1")]
        from: String,

        /// End node of the reported route
        #[arg(long, default_value = "5")]
        to: String,

        /// Output format (json, markdown)
        #[arg(long, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
    },
    /// Analyze a graph given as edges on the command line
    Analyze {
        /// Edge as SOURCE:TARGET:WEIGHT (repeatable)
        #[arg(short, long = "edge", value_name = "SOURCE:TARGET:WEIGHT", required = true)]
        edges: Vec<EdgeArg>,

        /// Extra node with no edges (repeatable)
        #[arg(short, long = "node", value_name = "ID")]
        nodes: Vec<String>,

        /// Start node of the reported route
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End node of the reported route
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Output format (json, markdown)
        #[arg(long, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
    },
    /// Show version information
    Version,
}

/// A `SOURCE:TARGET:WEIGHT` command-line edge.
#[derive(Debug, Clone)]
struct EdgeArg {
    source: String,
    target: String,
    weight: f64,
}

impl FromStr for EdgeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [source, target, weight] = parts.as_slice() else {
            return Err(format!("expected SOURCE:TARGET:WEIGHT, got '{}'", s));
        };
        if source.is_empty() || target.is_empty() {
            return Err(format!("empty node name in '{}'", s));
        }
        let weight = weight
            .parse::<f64>()
            .map_err(|e| format!("invalid weight '{}': {}", weight, e))?;

        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        })
    }
}

/// The five node sample graph, optionally closed into a circuit by 5 -> 1.
fn demo_graph(with_cycle: bool) -> WeightedGraph<String> {
    let mut graph = WeightedGraph::new();
    for node in 1..=5 {
        graph.add_node(node.to_string());
    }

    let edges = [
        (1, 2, 4.5),
        (1, 3, 3.2),
        (2, 4, 2.7),
        (3, 4, 1.8),
        (1, 4, 6.7),
        (3, 5, 2.7),
    ];
    for (source, target, weight) in edges {
        graph.add_edge(source.to_string(), target.to_string(), weight);
    }
    if with_cycle {
        graph.add_edge("5".to_string(), "1".to_string(), 1.0);
    }

    graph
}

/// Builds the graph for `analyze`, logging edges that overwrite an earlier weight.
fn analyze_graph(edges: Vec<EdgeArg>, nodes: Vec<String>) -> WeightedGraph<String> {
    let mut graph = WeightedGraph::with_capacity(edges.len() * 2, edges.len());
    for node in nodes {
        graph.add_node(node);
    }
    for edge in edges {
        if let Some(previous) = graph.add_edge(edge.source.clone(), edge.target.clone(), edge.weight) {
            tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                previous,
                weight = edge.weight,
                "duplicate edge, keeping the last weight"
            );
        }
    }
    graph
}

fn check_route(graph: &WeightedGraph<String>, route: Option<&(String, String)>) -> Result<()> {
    if let Some((from, to)) = route {
        for node in [from, to] {
            graph
                .degree(node)
                .with_context(|| format!("route node '{}' is not in the graph", node))?;
        }
    }
    Ok(())
}

fn print_report(
    title: &str,
    graph: &WeightedGraph<String>,
    route: Option<(String, String)>,
    format: ReportFormat,
) -> Result<()> {
    check_route(graph, route.as_ref())?;

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        %format,
        "collecting report"
    );
    let data = ReportData::collect(
        title,
        graph,
        route.as_ref().map(|(from, to)| (from, to)),
    );

    let stdout = std::io::stdout();
    export(format, &data, &mut stdout.lock()).context("failed to write report")?;
    Ok(())
}

fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=graphscope=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("graphscope=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo {
            with_cycle,
            from,
            to,
            format,
        }) => {
            let graph = demo_graph(with_cycle);
            let title = if with_cycle {
                "Sample Graph (with circuit)"
            } else {
                "Sample Graph"
            };
            print_report(title, &graph, Some((from, to)), format)
        }
        Some(Commands::Analyze {
            edges,
            nodes,
            from,
            to,
            format,
        }) => {
            let count = edges.len();
            let graph = analyze_graph(edges, nodes);
            print_report("Graph Analysis", &graph, from.zip(to), format)
                .with_context(|| format!("failed to analyze graph of {} edge arguments", count))
        }
        Some(Commands::Version) => {
            println!("graphscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("GraphScope - Directed Weighted Graph Analyzer");
            println!("Run 'graphscope demo' to analyze the sample graph");
            println!("Run 'graphscope --help' for more information");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphscope::graph::GraphError;

    #[test]
    fn test_parse_edge_arg() {
        let edge: EdgeArg = "a:b:2.5".parse().unwrap();
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert_eq!(edge.weight, 2.5);

        let negative: EdgeArg = "x:y:-1".parse().unwrap();
        assert_eq!(negative.weight, -1.0);
    }

    #[test]
    fn test_parse_edge_arg_errors() {
        assert!("a:b".parse::<EdgeArg>().is_err());
        assert!("a:b:c:d".parse::<EdgeArg>().is_err());
        assert!(":b:1".parse::<EdgeArg>().is_err());
        assert!("a:b:heavy".parse::<EdgeArg>().is_err());
    }

    #[test]
    fn test_demo_graph() {
        let graph = demo_graph(false);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
        assert!(!graph.has_cycle());

        let cyclic = demo_graph(true);
        assert_eq!(cyclic.edge_count(), 7);
        assert!(cyclic.has_cycle());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "graphscope",
            "analyze",
            "-e",
            "a:b:1",
            "--edge",
            "b:c:2",
            "--from",
            "a",
            "--to",
            "c",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Analyze {
                edges, from, format, ..
            }) => {
                assert_eq!(edges.len(), 2);
                assert_eq!(from.as_deref(), Some("a"));
                assert_eq!(format, ReportFormat::Json);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_analyze_graph_keeps_last_weight() {
        let edges = ["a:b:1", "b:c:2", "a:b:3"]
            .iter()
            .map(|s| s.parse::<EdgeArg>().unwrap())
            .collect();
        let graph = analyze_graph(edges, vec!["lonely".to_string()]);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_weight(&"a".to_string(), &"b".to_string()), Some(3.0));
    }

    #[test]
    fn test_check_route_adds_context() {
        let graph = demo_graph(false);
        assert!(check_route(&graph, None).is_ok());
        assert!(check_route(&graph, Some(&("1".to_string(), "5".to_string()))).is_ok());

        let err = check_route(&graph, Some(&("1".to_string(), "9".to_string()))).unwrap_err();
        assert_eq!(err.to_string(), "route node '9' is not in the graph");
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_cli_route_requires_both_ends() {
        let result = Cli::try_parse_from(["graphscope", "analyze", "-e", "a:b:1", "--from", "a"]);
        assert!(result.is_err());
    }
}
