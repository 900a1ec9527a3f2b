//! Popup content and the callback boundary to the host application.
//!
//! The tooltip is rendered by the core, but everything in it (relationship
//! kind, endpoint names, associated views) is supplied by the host at
//! edge-construction time; the core never fetches data.

use catviz_layout::Point;
use catviz_model::{Edge, EdgeId, GraphSnapshot, NodeId};
use serde::{Deserialize, Serialize};

/// Content of the edge-relationship tooltip, positioned near the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTooltip {
    pub edge: EdgeId,
    /// Screen-space position the tooltip is pinned to.
    pub position: Point,
    pub source_name: String,
    pub target_name: String,
    /// Cardinality label, e.g. "1:N"; absent on untyped lineage edges.
    pub relationship: Option<String>,
    pub views: Vec<String>,
}

impl EdgeTooltip {
    pub(crate) fn for_edge(edge: &Edge, snapshot: &GraphSnapshot, pointer: Point) -> Self {
        let name_of = |id: &NodeId| {
            snapshot
                .node(id)
                .map(|n| n.display_name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        Self {
            edge: edge.id.clone(),
            position: Point::new(pointer.x + 12.0, pointer.y + 12.0),
            source_name: name_of(&edge.source),
            target_name: name_of(&edge.target),
            relationship: edge.relationship.map(|r| r.label().to_string()),
            views: edge.views.iter().map(|v| v.name.clone()).collect(),
        }
    }
}

/// Host-side reactions to viewer events. Everything behind these calls is
/// the host application's own UI; the graph core knows nothing about it.
pub trait HostCallbacks {
    /// The user clicked a node's info affordance; the host opens its own
    /// asset-detail view.
    fn on_node_selected(&mut self, id: &NodeId);

    /// The host tears down the panel.
    fn on_close(&mut self) {}
}

/// Default no-op host, for tests and headless rendering.
#[derive(Debug, Default)]
pub struct NoopHost {
    pub selected: Vec<NodeId>,
    pub closed: bool,
}

impl HostCallbacks for NoopHost {
    fn on_node_selected(&mut self, id: &NodeId) {
        self.selected.push(id.clone());
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}
