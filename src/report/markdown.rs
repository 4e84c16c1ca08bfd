//! Markdown export implementation.
//!
//! Renders analysis results in Markdown for documentation and reporting.

use super::{circuit_path, Exporter, ReportData};
use crate::graph::{GraphResult, WeightedPath};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

fn path_line(result: &GraphResult<WeightedPath<String>>) -> String {
    match result {
        Ok(path) if path.is_empty() => "(empty graph)".to_string(),
        Ok(path) => format!("`{}` (weight {})", path.path_string(), format_weight(path.cost)),
        Err(e) => format!("_unavailable: {}_", e),
    }
}

/// Formats a weight without trailing float noise.
pub fn format_weight(weight: f64) -> String {
    let rounded = format!("{:.4}", weight);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        // Zero, or a small negative that rounds to zero
        "" | "-" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# {}", data.title)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Value |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Nodes | {} |", data.nodes.len())?;
        writeln!(writer, "| Edges | {} |", data.edges.len())?;
        writeln!(writer, "| Weakly Connected | {} |", yes_no(data.weakly_connected))?;
        writeln!(
            writer,
            "| Strongly Connected | {} |",
            yes_no(data.strongly_connected)
        )?;
        writeln!(writer, "| Components | {} |", data.components.len())?;
        writeln!(writer, "| Circuits | {} |", data.circuits.len())?;
        match &data.diameter {
            Ok(value) => writeln!(writer, "| Diameter | {} |", format_weight(*value))?,
            Err(e) => writeln!(writer, "| Diameter | unavailable ({}) |", e)?,
        }
        if let Some(stats) = &data.degree_stats {
            writeln!(
                writer,
                "| Degree (min / mean / max) | {} / {} / {} |",
                stats.min,
                format_weight(stats.mean),
                stats.max
            )?;
        }
        writeln!(writer)?;

        // Edges
        if !data.edges.is_empty() {
            writeln!(writer, "## Edges")?;
            writeln!(writer)?;
            writeln!(writer, "| Source | Target | Weight | On Route |")?;
            writeln!(writer, "|--------|--------|--------|----------|")?;
            for edge in &data.edges {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    edge.source,
                    edge.target,
                    format_weight(edge.weight),
                    if edge.highlighted { "**yes**" } else { "" }
                )?;
            }
            writeln!(writer)?;
        }

        // Route
        if let Some(route) = &data.route {
            writeln!(writer, "## Route {} -> {}", route.from, route.to)?;
            writeln!(writer)?;
            writeln!(writer, "- **Shortest path:** {}", path_line(&route.shortest))?;
            writeln!(writer, "- **Simple paths:** {}", route.all_paths.len())?;
            for path in &route.all_paths {
                writeln!(writer, "  - `{}`", path.join(" -> "))?;
            }
            writeln!(writer)?;
        }

        // Paths
        writeln!(writer, "## Paths")?;
        writeln!(writer)?;
        writeln!(writer, "- **Longest path:** {}", path_line(&data.longest_path))?;
        writeln!(
            writer,
            "- **Cheapest circuit path:** {}",
            path_line(&data.cheapest_circuit_path)
        )?;
        writeln!(writer)?;

        // Circuits
        if !data.circuits.is_empty() {
            writeln!(writer, "## Circuits ({})", data.circuits.len())?;
            writeln!(writer)?;
            for (i, circuit) in data.circuits.iter().enumerate() {
                writeln!(
                    writer,
                    "{}. `{}` (length {})",
                    i + 1,
                    circuit_path(circuit),
                    circuit.len()
                )?;
            }
            writeln!(writer)?;
        }

        // Components
        writeln!(writer, "## Components")?;
        writeln!(writer)?;
        for component in &data.components {
            writeln!(writer, "- {{{}}}", component.join(", "))?;
        }
        writeln!(writer)?;

        // Degrees
        if !data.degrees.is_empty() {
            writeln!(writer, "## Degrees")?;
            writeln!(writer)?;
            writeln!(writer, "| Node | Degree |")?;
            writeln!(writer, "|------|--------|")?;
            for (node, degree) in &data.degrees {
                writeln!(writer, "| {} | {} |", node, degree)?;
            }
        }

        Ok(())
    }
}
