//! GraphScope - directed weighted graph analysis
//!
//! This crate stores nodes and weighted edges and answers structural
//! queries about them: shortest and longest paths, circuits, connectivity,
//! diameter and degree statistics. Query results can be rendered as JSON
//! or Markdown reports.

pub mod graph;
pub mod report;
