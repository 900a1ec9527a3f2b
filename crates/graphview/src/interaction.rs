//! Pointer interaction as an explicit state machine.
//!
//! Events are plain values, so every transition is testable with synthetic
//! input instead of a real pointer device. The layer owns hover/selection
//! view-state and the tooltip; model mutations and host callbacks are
//! requested through [`InteractionAction`] and executed by the panel.

use catviz_layout::{LayoutResult, Point};
use catviz_model::{EdgeId, GraphSnapshot, NodeId, HEADER_HEIGHT, ROW_HEIGHT};

use crate::overlay::EdgeTooltip;
use crate::viewport::{ViewportController, ViewportTransform};

/// Width of the info affordance square at the right end of the header band.
const INFO_AFFORDANCE_WIDTH: f64 = 22.0;

/// Synthetic pointer input, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    /// Wheel/pinch gesture; positive `delta` zooms in.
    Wheel { position: Point, delta: f64 },
    Leave,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Panning { last: Point },
    HoverExpand { node: NodeId },
    HoverEdge { edge: EdgeId },
}

/// What the pointer is over, resolved front-to-back against the current
/// layout.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Canvas,
    NodeBody(NodeId),
    NodeInfo(NodeId),
    NodeExpand(NodeId),
    Edge(EdgeId),
}

/// Follow-up work the panel must perform after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionAction {
    None,
    Redraw,
    /// Flip the node's expanded state and re-layout if its height changed.
    ToggleExpand(NodeId),
    /// Forward to the host's `on_node_selected`; no model mutation.
    SelectNode(NodeId),
}

#[derive(Debug, Clone)]
pub struct InteractionLayer {
    state: InteractionState,
    hovered_node: Option<NodeId>,
    selected_node: Option<NodeId>,
    tooltip: Option<EdgeTooltip>,
    /// Screen-space width of the invisible hit-stroke around edges; wider
    /// than the visible stroke so thin curves are easy to hover.
    pub edge_hit_width: f64,
}

impl Default for InteractionLayer {
    fn default() -> Self {
        Self {
            state: InteractionState::Idle,
            hovered_node: None,
            selected_node: None,
            tooltip: None,
            edge_hit_width: 10.0,
        }
    }
}

impl InteractionLayer {
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tooltip(&self) -> Option<&EdgeTooltip> {
        self.tooltip.as_ref()
    }

    pub fn hovered_node(&self) -> Option<&NodeId> {
        self.hovered_node.as_ref()
    }

    pub fn selected_node(&self) -> Option<&NodeId> {
        self.selected_node.as_ref()
    }

    /// Resolves what sits under a screen point. Nodes are checked
    /// front-to-back (reverse paint order), then edges against their
    /// widened hit-stroke.
    pub fn hit_test(
        &self,
        snapshot: &GraphSnapshot,
        layout: &LayoutResult,
        transform: ViewportTransform,
        screen: Point,
    ) -> HitTarget {
        let p = transform.to_graph(screen);

        for node in snapshot.nodes().iter().rev() {
            let Some(frame) = layout.node_frames.get(&node.id) else {
                continue;
            };
            if !frame.contains(p) {
                continue;
            }
            let in_header = p.y <= frame.y + HEADER_HEIGHT;
            if in_header && p.x >= frame.right() - INFO_AFFORDANCE_WIDTH {
                return HitTarget::NodeInfo(node.id.clone());
            }
            if node.is_expandable() && p.y >= frame.bottom() - ROW_HEIGHT {
                return HitTarget::NodeExpand(node.id.clone());
            }
            return HitTarget::NodeBody(node.id.clone());
        }

        // The hit tolerance is defined in screen pixels; divide by scale to
        // compare in graph space.
        let tolerance = self.edge_hit_width / 2.0 / transform.scale;
        for (id, route) in &layout.edge_routes {
            for segment in route.windows(2) {
                if distance_to_segment(p, segment[0], segment[1]) <= tolerance {
                    return HitTarget::Edge(id.clone());
                }
            }
        }

        HitTarget::Canvas
    }

    /// Runs one event through the state machine. Wheel gestures always
    /// route to the viewport zoom, independent of the current state.
    pub fn on_event(
        &mut self,
        event: PointerEvent,
        snapshot: &GraphSnapshot,
        layout: &LayoutResult,
        viewport: &mut ViewportController,
    ) -> InteractionAction {
        match event {
            PointerEvent::Wheel { position, delta } => {
                if delta == 0.0 {
                    return InteractionAction::None;
                }
                let factor = if delta > 0.0 { 1.1 } else { 0.9 };
                viewport.apply_zoom(factor, position);
                InteractionAction::Redraw
            }
            PointerEvent::Down(position) => {
                match self.hit_test(snapshot, layout, viewport.transform(), position) {
                    HitTarget::Canvas => {
                        self.state = InteractionState::Panning { last: position };
                        self.selected_node = None;
                        self.tooltip = None;
                        InteractionAction::Redraw
                    }
                    HitTarget::NodeExpand(id) => {
                        self.state = InteractionState::Idle;
                        self.tooltip = None;
                        InteractionAction::ToggleExpand(id)
                    }
                    HitTarget::NodeInfo(id) => {
                        self.selected_node = Some(id.clone());
                        InteractionAction::SelectNode(id)
                    }
                    HitTarget::NodeBody(id) => {
                        self.selected_node = Some(id);
                        InteractionAction::Redraw
                    }
                    HitTarget::Edge(_) => InteractionAction::Redraw,
                }
            }
            PointerEvent::Move(position) => {
                if let InteractionState::Panning { last } = self.state {
                    viewport.apply_pan(position.x - last.x, position.y - last.y);
                    self.state = InteractionState::Panning { last: position };
                    return InteractionAction::Redraw;
                }
                self.update_hover(snapshot, layout, viewport.transform(), position)
            }
            PointerEvent::Up => {
                if matches!(self.state, InteractionState::Panning { .. }) {
                    self.state = InteractionState::Idle;
                    InteractionAction::Redraw
                } else {
                    InteractionAction::None
                }
            }
            PointerEvent::Leave => {
                let had_overlay = self.tooltip.is_some() || self.hovered_node.is_some();
                self.state = InteractionState::Idle;
                self.tooltip = None;
                self.hovered_node = None;
                if had_overlay {
                    InteractionAction::Redraw
                } else {
                    InteractionAction::None
                }
            }
        }
    }

    fn update_hover(
        &mut self,
        snapshot: &GraphSnapshot,
        layout: &LayoutResult,
        transform: ViewportTransform,
        position: Point,
    ) -> InteractionAction {
        let previous_state = self.state.clone();
        let previous_hover = self.hovered_node.clone();

        match self.hit_test(snapshot, layout, transform, position) {
            HitTarget::Edge(id) => {
                self.state = InteractionState::HoverEdge { edge: id.clone() };
                self.hovered_node = None;
                self.tooltip = snapshot
                    .edge(&id)
                    .map(|e| EdgeTooltip::for_edge(e, snapshot, position));
            }
            HitTarget::NodeExpand(id) => {
                self.state = InteractionState::HoverExpand { node: id };
                self.hovered_node = None;
                self.tooltip = None;
            }
            HitTarget::NodeBody(id) | HitTarget::NodeInfo(id) => {
                self.state = InteractionState::Idle;
                self.hovered_node = Some(id);
                self.tooltip = None;
            }
            HitTarget::Canvas => {
                self.state = InteractionState::Idle;
                self.hovered_node = None;
                self.tooltip = None;
            }
        }

        // Tooltips track the pointer, so a hover over an edge always
        // repaints; otherwise only state changes do.
        if self.state != previous_state
            || self.hovered_node != previous_hover
            || self.tooltip.is_some()
        {
            InteractionAction::Redraw
        } else {
            InteractionAction::None
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return ((p.x - a.x).powi(2) + (p.y - a.y).powi(2)).sqrt();
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
