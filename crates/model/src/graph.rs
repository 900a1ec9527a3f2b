use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::edge::{Edge, EdgeId, EdgeSpec};
use crate::error::ModelError;
use crate::node::{CatalogNode, NodeId, NodeSpec};

/// The graph owned by one open viewer panel. Nodes keep their ingestion
/// order (insertion-ordered map) so every downstream pass is reproducible.
#[derive(Debug, Clone)]
pub struct GraphModel {
    nodes: IndexMap<NodeId, CatalogNode>,
    edges: Vec<Edge>,
}

impl GraphModel {
    /// Validates and ingests a host-supplied node/edge set.
    ///
    /// All offending edges are collected before failing, and a failed
    /// ingestion never yields a partially-built model: the constructor
    /// either returns a complete `GraphModel` or nothing.
    pub fn ingest(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Result<Self, ModelError> {
        let mut node_map: IndexMap<NodeId, CatalogNode> = IndexMap::with_capacity(nodes.len());
        for spec in nodes {
            let node = CatalogNode::from_spec(spec);
            if node_map.contains_key(&node.id) {
                return Err(ModelError::DuplicateNode {
                    id: node.id.to_string(),
                });
            }
            node_map.insert(node.id.clone(), node);
        }

        let mut offending: Vec<String> = Vec::new();
        let mut parallel_count: HashMap<(NodeId, NodeId), usize> = HashMap::new();
        let mut edge_list: Vec<Edge> = Vec::with_capacity(edges.len());

        for spec in edges {
            let source = NodeId::new(spec.source);
            let target = NodeId::new(spec.target);
            let known = node_map.contains_key(&source) && node_map.contains_key(&target);
            if !known || source == target {
                offending.push(format!("{source}->{target}"));
                continue;
            }
            let ordinal = parallel_count
                .entry((source.clone(), target.clone()))
                .or_insert(0);
            let id = EdgeId::derive(&source, &target, *ordinal);
            *ordinal += 1;
            edge_list.push(Edge {
                id,
                source,
                target,
                relationship: spec.relationship,
                views: spec.views,
            });
        }

        if !offending.is_empty() {
            return Err(ModelError::InvalidGraph { edges: offending });
        }

        tracing::debug!(
            nodes = node_map.len(),
            edges = edge_list.len(),
            "graph ingested"
        );

        Ok(Self {
            nodes: node_map,
            edges: edge_list,
        })
    }

    pub fn node(&self, id: &NodeId) -> Option<&CatalogNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CatalogNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Flips the expanded state of a node with hidden rows. Returns whether
    /// the node's height changed, i.e. whether a re-layout is needed. A node
    /// without extra rows (or an unknown id) is a no-op, not an error.
    pub fn toggle_expand(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if !node.is_expandable() {
            return false;
        }
        node.expanded = !node.expanded;
        true
    }

    /// Immutable copy for the layout engine and renderer. The engine never
    /// observes a model mutated mid-computation.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.clone(),
        }
    }
}

/// Frozen view of a [`GraphModel`], in ingestion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    nodes: Vec<CatalogNode>,
    edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn nodes(&self) -> &[CatalogNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&CatalogNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ContentRow, NodeKind};

    fn table(id: &str, rows: usize) -> NodeSpec {
        NodeSpec {
            id: id.to_string(),
            display_name: id.to_string(),
            kind: NodeKind::Table,
            tags: vec![],
            content_rows: (0..rows)
                .map(|i| ContentRow::new(format!("c{i}"), "int"))
                .collect(),
        }
    }

    fn edge(source: &str, target: &str) -> EdgeSpec {
        EdgeSpec {
            source: source.to_string(),
            target: target.to_string(),
            relationship: None,
            views: vec![],
        }
    }

    #[test]
    fn ingest_accepts_valid_graph() {
        let model = GraphModel::ingest(
            vec![table("a", 0), table("b", 0)],
            vec![edge("a", "b")],
        )
        .unwrap();
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edges().len(), 1);
        assert_eq!(model.edges()[0].id.as_str(), "a->b");
    }

    #[test]
    fn ingest_rejects_unknown_endpoint() {
        let err = GraphModel::ingest(
            vec![table("a", 0)],
            vec![edge("a", "ghost"), edge("phantom", "a")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidGraph {
                edges: vec!["a->ghost".to_string(), "phantom->a".to_string()],
            }
        );
    }

    #[test]
    fn ingest_rejects_self_loop() {
        let err = GraphModel::ingest(vec![table("a", 0)], vec![edge("a", "a")]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidGraph { .. }));
    }

    #[test]
    fn ingest_rejects_duplicate_node_id() {
        let err = GraphModel::ingest(vec![table("a", 0), table("a", 2)], vec![]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateNode {
                id: "a".to_string()
            }
        );
    }

    #[test]
    fn parallel_edges_get_distinct_ids() {
        let model = GraphModel::ingest(
            vec![table("a", 0), table("b", 0)],
            vec![edge("a", "b"), edge("a", "b")],
        )
        .unwrap();
        assert_eq!(model.edges()[0].id.as_str(), "a->b");
        assert_eq!(model.edges()[1].id.as_str(), "a->b#1");
    }

    #[test]
    fn nodes_start_collapsed() {
        let model = GraphModel::ingest(vec![table("a", 10)], vec![]).unwrap();
        assert!(!model.node(&NodeId::from("a")).unwrap().expanded);
    }

    #[test]
    fn toggle_expand_round_trips() {
        let mut model = GraphModel::ingest(vec![table("a", 10)], vec![]).unwrap();
        let id = NodeId::from("a");
        let before = model.node(&id).unwrap().size();

        assert!(model.toggle_expand(&id));
        assert!(model.node(&id).unwrap().expanded);
        assert!(model.node(&id).unwrap().size().height > before.height);

        assert!(model.toggle_expand(&id));
        assert!(!model.node(&id).unwrap().expanded);
        assert_eq!(model.node(&id).unwrap().size(), before);
    }

    #[test]
    fn toggle_expand_is_noop_without_hidden_rows() {
        let mut model = GraphModel::ingest(vec![table("a", 3)], vec![]).unwrap();
        assert!(!model.toggle_expand(&NodeId::from("a")));
        assert!(!model.node(&NodeId::from("a")).unwrap().expanded);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut model = GraphModel::ingest(vec![table("a", 10)], vec![]).unwrap();
        let snap = model.snapshot();
        model.toggle_expand(&NodeId::from("a"));
        assert!(!snap.node(&NodeId::from("a")).unwrap().expanded);
        assert!(model.node(&NodeId::from("a")).unwrap().expanded);
    }
}
