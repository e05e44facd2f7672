#![forbid(unsafe_code)]

//! Deterministic grid layout for parsed flowcharts.
//!
//! The layout carries no geometric meaning beyond non-overlap: nodes are
//! placed in first-seen order on a square-ish grid so a renderer has distinct
//! starting positions to work with. Same graph in, same positions out.

use bx_core::{FlowEdge, FlowGraph, NodeShape};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Spacing between grid cells, in pixels. The exact values only matter for
/// visual non-overlap; anything at least a node's width/height works.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    pub column_gap: f32,
    pub row_gap: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_gap: 250.0,
            row_gap: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A node with its assigned grid position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlacedNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    pub position: Point,
}

/// A laid-out graph, ready for rendering or JSON export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GridLayout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<FlowEdge>,
}

/// Lay out a graph on the default grid.
#[must_use]
pub fn layout_grid(graph: &FlowGraph) -> GridLayout {
    layout_grid_with_config(graph, GridConfig::default())
}

/// Lay out a graph on a grid with `columns = ceil(sqrt(node_count))`; node
/// `i` lands at column `i % columns`, row `i / columns`.
#[must_use]
pub fn layout_grid_with_config(graph: &FlowGraph, config: GridConfig) -> GridLayout {
    let columns = grid_columns(graph.nodes.len());

    let nodes = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let col = index % columns.max(1);
            let row = index / columns.max(1);
            PlacedNode {
                id: node.id.clone(),
                label: node.label.clone(),
                shape: node.shape,
                position: Point {
                    x: col as f32 * config.column_gap,
                    y: row as f32 * config.row_gap,
                },
            }
        })
        .collect();

    debug!(
        node_count = graph.nodes.len(),
        edge_count = graph.edges.len(),
        columns,
        "grid layout assigned"
    );

    GridLayout {
        nodes,
        edges: graph.edges.clone(),
    }
}

/// Smallest `c` with `c * c >= count`.
fn grid_columns(count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let mut columns = (count as f64).sqrt().ceil() as usize;
    // Guard against floating-point undershoot for large counts.
    while columns * columns < count {
        columns += 1;
    }
    columns
}
