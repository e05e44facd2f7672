#![forbid(unsafe_code)]

//! Best-effort parser for the Mermaid `graph TD` flowchart subset.
//!
//! The input is whatever an LLM produced when asked for a flowchart: the
//! parser never raises. Lines it cannot read contribute nothing beyond a
//! warning, an empty input yields an empty graph, and every edge endpoint is
//! guaranteed to resolve to a node in the result (bare endpoints are inserted
//! with their own id as label).

mod flowchart;
mod graph_builder;

use bx_core::FlowGraph;
use serde::Serialize;

/// Outcome of a flowchart parse: the graph plus non-fatal warnings about
/// lines that fell outside the supported grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub graph: FlowGraph,
    pub warnings: Vec<String>,
}

/// Parse Mermaid flowchart source into a node/edge graph.
#[must_use]
pub fn parse_flowchart(input: &str) -> ParseResult {
    flowchart::parse(input)
}
