#![forbid(unsafe_code)]

//! Shared value types for the blueprint-extract workspace.
//!
//! Everything here is a transient value object: constructed fresh per parse
//! call, serde-serializable, and free of interior mutability. The extractors
//! in `bx-markdown` and `bx-mermaid` produce these; `bx-layout` and the CLI
//! consume them.

use serde::{Deserialize, Serialize};

/// A heading-delimited span of a markdown document.
///
/// `body` is the raw text of the span with the heading line removed and
/// surrounding whitespace trimmed. `title` is the normalized heading text as
/// it appeared in the source (bold markers and ordinal prefix stripped).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// One parsed line of the recommended-tech-stack section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TechStackItem {
    /// Category label, e.g. "Frontend".
    pub name: String,
    /// Free-text technology name, e.g. "Next.js".
    pub tech: String,
    /// Free-text justification.
    pub reason: String,
}

/// Node shape, keyed by the Mermaid delimiter pair that declared it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    /// `id((label))`
    Circle,
    /// `id[(label)]`
    Cylinder,
    /// `id[label]`
    #[default]
    Box,
    /// `id{{label}}`
    Hexagon,
    /// `id(label)`
    Rounded,
}

impl NodeShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Cylinder => "cylinder",
            Self::Box => "box",
            Self::Hexagon => "hexagon",
            Self::Rounded => "rounded",
        }
    }

    /// The delimiter pair that declares this shape, longest-first ordering is
    /// the caller's responsibility.
    #[must_use]
    pub const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Circle => ("((", "))"),
            Self::Cylinder => ("[(", ")]"),
            Self::Box => ("[", "]"),
            Self::Hexagon => ("{{", "}}"),
            Self::Rounded => ("(", ")"),
        }
    }
}

/// A flowchart node.
///
/// `label` is never empty: nodes that were only ever referenced as an edge
/// endpoint carry their own `id` as label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

/// A directed flowchart edge.
///
/// `id` is synthesized as `e-<source>-<target>-<ordinal>` where the ordinal is
/// the number of edges created before this one, so parallel edges between the
/// same pair stay distinct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A parsed flowchart: nodes in first-seen order plus directed edges.
///
/// Invariant: every edge's `source` and `target` name a node in `nodes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// True when every edge endpoint resolves to a declared node.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|edge| {
            self.contains_node(&edge.source) && self.contains_node(&edge.target)
        })
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_is_empty_and_closed() {
        let graph = FlowGraph::empty();
        assert!(graph.is_empty());
        assert!(graph.is_closed());
    }

    #[test]
    fn dangling_edge_is_detected() {
        let graph = FlowGraph {
            nodes: vec![FlowNode {
                id: "A".into(),
                label: "A".into(),
                shape: NodeShape::Box,
            }],
            edges: vec![FlowEdge {
                id: "e-A-B-0".into(),
                source: "A".into(),
                target: "B".into(),
                label: None,
            }],
        };
        assert!(!graph.is_closed());
    }

    #[test]
    fn flow_graph_serde_round_trips() {
        let graph = FlowGraph {
            nodes: vec![FlowNode {
                id: "A".into(),
                label: "Start".into(),
                shape: NodeShape::Circle,
            }],
            edges: vec![],
        };
        let encoded = serde_json::to_string(&graph).expect("serialize graph");
        let decoded: FlowGraph = serde_json::from_str(&encoded).expect("deserialize graph");
        assert_eq!(decoded, graph);
    }

    #[test]
    fn edge_label_is_omitted_when_absent() {
        let edge = FlowEdge {
            id: "e-A-B-0".into(),
            source: "A".into(),
            target: "B".into(),
            label: None,
        };
        let encoded = serde_json::to_string(&edge).expect("serialize edge");
        assert!(!encoded.contains("label"));
    }
}
