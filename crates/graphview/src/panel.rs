//! One open viewer instance: exclusive owner of the model, the current
//! layout, the viewport transform, and the interaction state. Dropping the
//! panel discards all of it; there is no background work to cancel.

use catviz_layout::{LayoutEngine, LayoutError, LayoutResult};
use catviz_model::{EdgeSpec, GraphModel, GraphSnapshot, ModelError, NodeSpec};

use crate::interaction::{InteractionAction, InteractionLayer, PointerEvent};
use crate::overlay::HostCallbacks;
use crate::scene::{Renderer, Scene};
use crate::viewport::{ViewportController, ViewportSize};

#[derive(Debug)]
pub struct GraphPanel {
    model: GraphModel,
    snapshot: GraphSnapshot,
    layout: LayoutResult,
    engine: LayoutEngine,
    renderer: Renderer,
    viewport: ViewportController,
    interaction: InteractionLayer,
    viewport_size: ViewportSize,
    /// Set when layout rejected the graph; the panel then shows an error
    /// scene instead of geometry until the host opts into the fallback.
    layout_error: Option<LayoutError>,
    /// Once the host falls back, re-layouts stay in fallback mode.
    unordered: bool,
}

impl GraphPanel {
    /// Ingests a host-supplied graph and computes the initial layout and
    /// fit-to-content framing. Referential-integrity violations are fatal;
    /// a cyclic graph opens in a non-crashing error state the host can
    /// either surface or replace via [`Self::fallback_to_unordered`].
    pub fn open(
        nodes: Vec<NodeSpec>,
        edges: Vec<EdgeSpec>,
        viewport_size: ViewportSize,
    ) -> Result<Self, ModelError> {
        let model = GraphModel::ingest(nodes, edges)?;
        let snapshot = model.snapshot();
        let engine = LayoutEngine::default();

        let (layout, layout_error) = match engine.compute(&snapshot) {
            Ok(layout) => (layout, None),
            Err(err) => {
                tracing::warn!(%err, "layout rejected the graph");
                (LayoutResult::empty(), Some(err))
            }
        };

        let mut viewport = ViewportController::default();
        viewport.fit_to_content(layout.content_bounds, viewport_size);

        Ok(Self {
            model,
            snapshot,
            layout,
            engine,
            renderer: Renderer::default(),
            viewport,
            interaction: InteractionLayer::default(),
            viewport_size,
            layout_error,
            unordered: false,
        })
    }

    pub fn layout_error(&self) -> Option<&LayoutError> {
        self.layout_error.as_ref()
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Switches a cyclic graph to the BFS-ranked fallback layout.
    pub fn fallback_to_unordered(&mut self) {
        self.unordered = true;
        self.layout_error = None;
        self.layout = self.engine.compute_unordered(&self.snapshot);
        self.viewport
            .fit_to_content(self.layout.content_bounds, self.viewport_size);
    }

    /// Runs a pointer event through the interaction layer and performs the
    /// requested follow-up: model mutation plus re-layout, or a host
    /// callback. The viewport transform is left alone on re-layout so an
    /// expand does not yank the view around.
    pub fn handle_pointer(&mut self, event: PointerEvent, host: &mut dyn HostCallbacks) {
        if self.layout_error.is_some() {
            return;
        }
        let action =
            self.interaction
                .on_event(event, &self.snapshot, &self.layout, &mut self.viewport);
        match action {
            InteractionAction::ToggleExpand(id) => {
                if self.model.toggle_expand(&id) {
                    tracing::trace!(node = %id, "expand toggled, re-layout");
                    self.relayout();
                }
            }
            InteractionAction::SelectNode(id) => host.on_node_selected(&id),
            InteractionAction::Redraw | InteractionAction::None => {}
        }
    }

    /// Host-driven viewport resize; re-frames the content.
    pub fn resize(&mut self, viewport_size: ViewportSize) {
        self.viewport_size = viewport_size;
        self.viewport
            .fit_to_content(self.layout.content_bounds, viewport_size);
    }

    /// Current frame. Rebuilt from scratch on every call; an error state
    /// yields a message scene instead of geometry.
    pub fn scene(&self) -> Scene {
        if let Some(err) = &self.layout_error {
            return self
                .renderer
                .message_scene(self.viewport_size, err.to_string());
        }
        if self.snapshot.is_empty() {
            return self
                .renderer
                .message_scene(self.viewport_size, "nothing to display");
        }
        self.renderer.render(
            &self.snapshot,
            &self.layout,
            self.viewport.transform(),
            &self.interaction,
            self.viewport_size,
        )
    }

    /// Notifies the host that the panel is going away. State is discarded
    /// by dropping the panel itself.
    pub fn close(self, host: &mut dyn HostCallbacks) {
        host.on_close();
    }

    fn relayout(&mut self) {
        self.snapshot = self.model.snapshot();
        let result = if self.unordered {
            Ok(self.engine.compute_unordered(&self.snapshot))
        } else {
            self.engine.compute(&self.snapshot)
        };
        match result {
            Ok(layout) => self.layout = layout,
            Err(err) => {
                // Expansion never adds edges, so a cycle here means the
                // graph was cyclic all along.
                self.layout_error = Some(err);
                self.layout = LayoutResult::empty();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::NoopHost;
    use catviz_layout::Point;
    use catviz_model::{ContentRow, NodeId, NodeKind, ROW_HEIGHT};

    fn node(id: &str, rows: usize) -> NodeSpec {
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

    fn viewport() -> ViewportSize {
        ViewportSize::new(800.0, 600.0)
    }

    #[test]
    fn open_fits_content_into_viewport() {
        let panel = GraphPanel::open(
            vec![node("a", 2), node("b", 0)],
            vec![edge("a", "b")],
            viewport(),
        )
        .unwrap();
        let scale = panel.viewport().transform().scale;
        assert!(scale >= 0.1 && scale <= 2.0);
        assert!(panel.layout_error().is_none());
    }

    #[test]
    fn open_rejects_unknown_endpoints() {
        let err = GraphPanel::open(vec![node("a", 0)], vec![edge("a", "missing")], viewport())
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidGraph { .. }));
    }

    #[test]
    fn cyclic_graph_opens_in_error_state() {
        let panel = GraphPanel::open(
            vec![node("a", 0), node("b", 0)],
            vec![edge("a", "b"), edge("b", "a")],
            viewport(),
        )
        .unwrap();
        assert!(panel.layout_error().is_some());
        let scene = panel.scene();
        assert!(scene.nodes.is_empty());
        assert!(scene.message.is_some());
    }

    #[test]
    fn fallback_recovers_cyclic_graph() {
        let mut panel = GraphPanel::open(
            vec![node("a", 0), node("b", 0)],
            vec![edge("a", "b"), edge("b", "a")],
            viewport(),
        )
        .unwrap();
        panel.fallback_to_unordered();
        assert!(panel.layout_error().is_none());
        assert_eq!(panel.scene().nodes.len(), 2);
    }

    #[test]
    fn expand_click_relayouts_without_moving_the_view() {
        let mut panel = GraphPanel::open(
            vec![node("wide", 10), node("sink", 0)],
            vec![edge("wide", "sink")],
            viewport(),
        )
        .unwrap();
        let mut host = NoopHost::default();
        let id = NodeId::from("wide");

        let before_frame = panel.layout().node_frames[&id];
        let before_transform = panel.viewport().transform();

        // Click the affordance row at the bottom of the node, in screen
        // coordinates.
        let affordance_graph = Point::new(before_frame.center_x(), before_frame.bottom() - 2.0);
        let affordance_screen = before_transform.to_screen(affordance_graph);
        panel.handle_pointer(PointerEvent::Down(affordance_screen), &mut host);

        let after_frame = panel.layout().node_frames[&id];
        assert!(
            (after_frame.height - before_frame.height - 4.0 * ROW_HEIGHT).abs() < 1e-9,
            "10 rows: expanding reveals 4"
        );
        assert_eq!(panel.viewport().transform(), before_transform);
    }

    #[test]
    fn info_click_reaches_the_host() {
        let mut panel = GraphPanel::open(
            vec![node("a", 2), node("b", 0)],
            vec![edge("a", "b")],
            viewport(),
        )
        .unwrap();
        let mut host = NoopHost::default();

        let frame = panel.layout().node_frames[&NodeId::from("a")];
        let info_graph = Point::new(frame.right() - 4.0, frame.y + 4.0);
        let info_screen = panel.viewport().transform().to_screen(info_graph);
        panel.handle_pointer(PointerEvent::Down(info_screen), &mut host);

        assert_eq!(host.selected, vec![NodeId::from("a")]);
    }

    #[test]
    fn close_notifies_the_host() {
        let panel =
            GraphPanel::open(vec![node("a", 0)], vec![], viewport()).unwrap();
        let mut host = NoopHost::default();
        panel.close(&mut host);
        assert!(host.closed);
    }
}
