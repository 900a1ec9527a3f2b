use std::collections::HashMap;

use catviz_model::{GraphSnapshot, NodeId};

use crate::rank;
use crate::types::{LayoutError, LayoutResult, Rect};
use crate::{order, position, route};

/// Layered left-to-right layout engine.
///
/// Stateless between calls and deterministic: identical snapshots produce
/// identical geometry, so re-layouts after expand/collapse are predictable.
/// All tunables live here, with defaults suitable for the catalog viewers.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    /// Horizontal gap between rank columns.
    pub ranksep: f64,
    /// Vertical gap between nodes sharing a rank.
    pub nodesep: f64,
    /// Outer margin around the whole layout.
    pub margin: f64,
    /// Crossing-reduction sweeps; see [`crate::order`] for the heuristic.
    pub ordering_passes: usize,
    /// Vertical divergence applied to parallel edges between the same pair.
    pub parallel_offset: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            ranksep: 80.0,
            nodesep: 24.0,
            margin: 20.0,
            ordering_passes: 4,
            parallel_offset: 6.0,
        }
    }
}

impl LayoutEngine {
    /// Computes the strict layered layout. Fails with
    /// [`LayoutError::CyclicGraph`] when the edge set is not a DAG; the
    /// host may then reject the graph or call [`Self::compute_unordered`].
    pub fn compute(&self, snapshot: &GraphSnapshot) -> Result<LayoutResult, LayoutError> {
        if snapshot.is_empty() {
            return Ok(LayoutResult::empty());
        }
        let (ids, edges) = index_graph(snapshot);
        let ranks = rank::longest_path_ranks(&ids, &edges)?;
        Ok(self.place(snapshot, &ids, &edges, ranks))
    }

    /// Fallback layout for cyclic input: BFS-order ranks instead of the
    /// strict longest-path ordering. Never fails and never loops.
    pub fn compute_unordered(&self, snapshot: &GraphSnapshot) -> LayoutResult {
        if snapshot.is_empty() {
            return LayoutResult::empty();
        }
        let (ids, edges) = index_graph(snapshot);
        let ranks = rank::bfs_ranks(ids.len(), &edges);
        self.place(snapshot, &ids, &edges, ranks)
    }

    fn place(
        &self,
        snapshot: &GraphSnapshot,
        ids: &[NodeId],
        edges: &[(usize, usize)],
        ranks: Vec<usize>,
    ) -> LayoutResult {
        let sizes: Vec<_> = snapshot.nodes().iter().map(|n| n.size()).collect();

        let layers = order::order_ranks(&ranks, edges, self.ordering_passes);
        let (frames, columns) =
            position::assign_coordinates(&layers, &sizes, self.ranksep, self.nodesep, self.margin);
        let routes = route::route_edges(edges, &ranks, &frames, &columns, self.parallel_offset);

        let mut bounds: Option<Rect> = None;
        for frame in &frames {
            bounds = Some(match bounds {
                Some(b) => b.union(frame),
                None => *frame,
            });
        }
        for waypoints in &routes {
            for &p in waypoints {
                bounds = Some(match bounds {
                    Some(b) => b.expand_to(p),
                    None => Rect::new(p.x, p.y, 0.0, 0.0),
                });
            }
        }

        let node_frames = ids
            .iter()
            .cloned()
            .zip(frames)
            .collect();
        let edge_routes = snapshot
            .edges()
            .iter()
            .map(|e| e.id.clone())
            .zip(routes)
            .collect();

        tracing::debug!(
            nodes = ids.len(),
            edges = edges.len(),
            "layout pass complete"
        );

        LayoutResult {
            node_frames,
            edge_routes,
            content_bounds: bounds.unwrap_or(Rect::ZERO),
        }
    }
}

/// Indexes the snapshot into the dense form the layout phases work on.
fn index_graph(snapshot: &GraphSnapshot) -> (Vec<NodeId>, Vec<(usize, usize)>) {
    let ids: Vec<NodeId> = snapshot.nodes().iter().map(|n| n.id.clone()).collect();
    let index: HashMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let edges = snapshot
        .edges()
        .iter()
        .map(|e| (index[&e.source], index[&e.target]))
        .collect();
    (ids, edges)
}
