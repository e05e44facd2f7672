use std::collections::BTreeMap;

use bx_core::{FlowEdge, FlowGraph, FlowNode, NodeShape};

use crate::ParseResult;

/// Accumulates nodes and edges while a diagram is being scanned.
///
/// Nodes are interned by id in first-seen order. A node first seen as a bare
/// edge endpoint has no label yet; a later shaped declaration fills it in.
/// `finish` falls back to the id for anything still unlabeled, which is what
/// keeps every edge endpoint resolvable in the returned graph.
pub(crate) struct GraphBuilder {
    nodes: Vec<PendingNode>,
    edges: Vec<FlowEdge>,
    index_by_id: BTreeMap<String, usize>,
    warnings: Vec<String>,
}

struct PendingNode {
    id: String,
    label: Option<String>,
    shape: Option<NodeShape>,
}

impl GraphBuilder {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_id: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn intern_node(
        &mut self,
        id: &str,
        label: Option<&str>,
        shape: Option<NodeShape>,
    ) -> Option<usize> {
        let normalized_id = id.trim();
        if normalized_id.is_empty() {
            self.add_warning("Encountered empty node identifier; skipped node");
            return None;
        }

        if let Some(existing) = self.index_by_id.get(normalized_id).copied() {
            let node = &mut self.nodes[existing];
            // First-seen label wins; only fill in what is still missing.
            if node.label.is_none() {
                node.label = clean_label(label);
            }
            if node.shape.is_none() {
                node.shape = shape;
            }
            return Some(existing);
        }

        let index = self.nodes.len();
        self.nodes.push(PendingNode {
            id: normalized_id.to_string(),
            label: clean_label(label),
            shape,
        });
        self.index_by_id.insert(normalized_id.to_string(), index);
        Some(index)
    }

    pub(crate) fn push_edge(&mut self, source: usize, target: usize, label: Option<&str>) {
        let source_id = self.nodes[source].id.clone();
        let target_id = self.nodes[target].id.clone();
        let ordinal = self.edges.len();
        self.edges.push(FlowEdge {
            id: format!("e-{source_id}-{target_id}-{ordinal}"),
            source: source_id,
            target: target_id,
            label: clean_label(label),
        });
    }

    pub(crate) fn finish(self) -> ParseResult {
        let nodes = self
            .nodes
            .into_iter()
            .map(|pending| {
                let label = pending.label.unwrap_or_else(|| pending.id.clone());
                FlowNode {
                    id: pending.id,
                    label,
                    shape: pending.shape.unwrap_or_default(),
                }
            })
            .collect();

        ParseResult {
            graph: FlowGraph {
                nodes,
                edges: self.edges,
            },
            warnings: self.warnings,
        }
    }
}

fn clean_label(input: Option<&str>) -> Option<String> {
    let raw = input?;
    let cleaned = raw
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim_matches('`')
        .trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_first_seen_order() {
        let mut builder = GraphBuilder::new();
        builder.intern_node("B", Some("Second"), None);
        builder.intern_node("A", Some("First"), None);
        builder.intern_node("B", Some("Ignored"), None);

        let result = builder.finish();
        let ids: Vec<&str> = result.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
        assert_eq!(result.graph.nodes[0].label, "Second");
    }

    #[test]
    fn unlabeled_node_falls_back_to_its_id() {
        let mut builder = GraphBuilder::new();
        builder.intern_node("X", None, None);
        let result = builder.finish();
        assert_eq!(result.graph.nodes[0].label, "X");
    }

    #[test]
    fn later_declaration_fills_missing_label() {
        let mut builder = GraphBuilder::new();
        builder.intern_node("B", None, None);
        builder.intern_node("B", Some("Process"), Some(NodeShape::Box));
        let result = builder.finish();
        assert_eq!(result.graph.nodes[0].label, "Process");
        assert_eq!(result.graph.nodes[0].shape, NodeShape::Box);
    }

    #[test]
    fn edge_ids_stay_unique_for_parallel_edges() {
        let mut builder = GraphBuilder::new();
        let a = builder.intern_node("A", None, None).expect("node A");
        let b = builder.intern_node("B", None, None).expect("node B");
        builder.push_edge(a, b, None);
        builder.push_edge(a, b, Some("again"));

        let result = builder.finish();
        assert_eq!(result.graph.edges[0].id, "e-A-B-0");
        assert_eq!(result.graph.edges[1].id, "e-A-B-1");
    }

    #[test]
    fn empty_identifier_is_skipped_with_warning() {
        let mut builder = GraphBuilder::new();
        assert_eq!(builder.intern_node("  ", None, None), None);
        let result = builder.finish();
        assert!(result.graph.nodes.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }
}
