//! JSON export implementation.
//!
//! Renders analysis results as pretty-printed JSON for machine-readable output.

use super::{Exporter, ReportData};
use crate::graph::{DegreeStats, GraphResult, WeightedPath};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Outcome of a query that produces a path.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JsonPath {
    Found { nodes: Vec<String>, cost: f64 },
    Unavailable { reason: String },
}

impl From<&GraphResult<WeightedPath<String>>> for JsonPath {
    fn from(result: &GraphResult<WeightedPath<String>>) -> Self {
        match result {
            Ok(path) => JsonPath::Found {
                nodes: path.nodes.clone(),
                cost: path.cost,
            },
            Err(e) => JsonPath::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Outcome of the diameter query.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JsonDiameter {
    Found { value: f64 },
    Unavailable { reason: String },
}

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge {
    source: String,
    target: String,
    weight: f64,
    highlighted: bool,
}

/// Serializable route for JSON output.
#[derive(Serialize)]
struct JsonRoute {
    from: String,
    to: String,
    shortest_path: JsonPath,
    all_paths: Vec<Vec<String>>,
}

/// Serializable circuit for JSON output.
#[derive(Serialize)]
struct JsonCircuit {
    nodes: Vec<String>,
    length: usize,
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    nodes: usize,
    edges: usize,
    weakly_connected: bool,
    strongly_connected: bool,
    components: usize,
    circuits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    degree: Option<DegreeStats>,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    title: String,
    summary: JsonSummary,
    nodes: Vec<String>,
    edges: Vec<JsonEdge>,
    degrees: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<JsonRoute>,
    longest_path: JsonPath,
    components: Vec<Vec<String>>,
    diameter: JsonDiameter,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    circuits: Vec<JsonCircuit>,
    cheapest_circuit_path: JsonPath,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        let edges = data
            .edges
            .iter()
            .map(|e| JsonEdge {
                source: e.source.clone(),
                target: e.target.clone(),
                weight: e.weight,
                highlighted: e.highlighted,
            })
            .collect();

        let route = data.route.as_ref().map(|r| JsonRoute {
            from: r.from.clone(),
            to: r.to.clone(),
            shortest_path: JsonPath::from(&r.shortest),
            all_paths: r.all_paths.clone(),
        });

        let circuits = data
            .circuits
            .iter()
            .map(|c| JsonCircuit {
                nodes: c.clone(),
                length: c.len(),
                path: super::circuit_path(c),
            })
            .collect();

        let diameter = match &data.diameter {
            Ok(value) => JsonDiameter::Found { value: *value },
            Err(e) => JsonDiameter::Unavailable {
                reason: e.to_string(),
            },
        };

        let export = JsonExport {
            title: data.title.clone(),
            summary: JsonSummary {
                nodes: data.nodes.len(),
                edges: data.edges.len(),
                weakly_connected: data.weakly_connected,
                strongly_connected: data.strongly_connected,
                components: data.components.len(),
                circuits: data.circuits.len(),
                degree: data.degree_stats,
            },
            nodes: data.nodes.clone(),
            edges,
            degrees: data.degrees.clone(),
            route,
            longest_path: JsonPath::from(&data.longest_path),
            components: data.components.clone(),
            diameter,
            circuits,
            cheapest_circuit_path: JsonPath::from(&data.cheapest_circuit_path),
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
