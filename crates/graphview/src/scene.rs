//! Stateless scene building: `(snapshot, layout, transform, interaction)`
//! in, display list out. The whole scene is rebuilt whenever any input
//! changes; painting backends (the SVG viewer, a future GPU surface) only
//! walk the list.

use catviz_layout::{LayoutResult, Point, Rect};
use catviz_model::{
    GraphSnapshot, EdgeId, NodeId, NodeKind, RowKey, HEADER_HEIGHT, ROW_HEIGHT,
};
use serde::{Deserialize, Serialize};

use crate::interaction::InteractionLayer;
use crate::viewport::{ViewportSize, ViewportTransform};

/// Packed 0xRRGGBB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(value: u32) -> Self {
        Self(value)
    }

    pub fn css(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

const GRID_COLOR: Color = Color(0x2c2c34);
const NODE_FILL: Color = Color(0x26262e);
const NODE_BORDER: Color = Color(0x3c3c46);
const SELECTED_BORDER: Color = Color(0x6a9fef);

/// Badge background and accent per node kind; the accent also feeds edge
/// gradients.
fn kind_colors(kind: NodeKind) -> (Color, Color) {
    match kind {
        NodeKind::DataSource => (Color(0x4a3a6a), Color(0xcc88ff)),
        NodeKind::Table => (Color(0x2a4a6a), Color(0x88aacc)),
        NodeKind::View => (Color(0x2a5a5a), Color(0x88cccc)),
        NodeKind::Formula => (Color(0x3a5a3a), Color(0x88cc88)),
        NodeKind::Report => (Color(0x6a5a3a), Color(0xffcc88)),
        NodeKind::Dashboard => (Color(0x6a3a3a), Color(0xff9988)),
        NodeKind::ModelArtifact => (Color(0x4a4a4a), Color(0xaaaaaa)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowGlyph {
    /// Primary-key-like row.
    Key,
    /// Foreign-key/reference-like row.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowVisual {
    pub frame: Rect,
    pub name: String,
    pub data_type: String,
    pub glyph: Option<RowGlyph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeVisual {
    pub id: NodeId,
    pub frame: Rect,
    pub title: String,
    pub badge: String,
    pub badge_bg: Color,
    pub badge_fg: Color,
    pub fill: Color,
    pub border: Color,
    pub selected: bool,
    pub hovered: bool,
    pub rows: Vec<RowVisual>,
    /// "show N more" / "show fewer" control, when the node has extra rows.
    pub affordance: Option<String>,
    pub title_size: f64,
    pub row_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeVisual {
    pub id: EdgeId,
    /// Screen-space waypoints; backends smooth these into a curve. The
    /// invisible hit-stroke shares exactly these points.
    pub points: Vec<Point>,
    pub start_color: Color,
    pub end_color: Color,
    pub width: f64,
    pub hit_width: f64,
    pub emphasized: bool,
    /// Arrowhead triangle at the target anchor.
    pub arrowhead: [Point; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipVisual {
    pub frame: Rect,
    pub lines: Vec<String>,
}

/// One drawn frame. Paint order: grid, then edges, then nodes, then the
/// tooltip overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub viewport: ViewportSize,
    pub grid: Vec<GridLine>,
    pub edges: Vec<EdgeVisual>,
    pub nodes: Vec<NodeVisual>,
    pub tooltip: Option<TooltipVisual>,
    /// Error/empty-state text centered by the backend, replacing geometry.
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub grid_step: f64,
    pub edge_width: f64,
    pub title_size: f64,
    pub row_size: f64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            grid_step: 40.0,
            edge_width: 2.0,
            title_size: 12.0,
            row_size: 11.0,
        }
    }
}

impl Renderer {
    /// Builds the display list for the current inputs.
    pub fn render(
        &self,
        snapshot: &GraphSnapshot,
        layout: &LayoutResult,
        transform: ViewportTransform,
        interaction: &InteractionLayer,
        viewport: ViewportSize,
    ) -> Scene {
        let scale = transform.scale;
        let to_screen_rect = |r: &Rect| {
            let origin = transform.to_screen(Point::new(r.x, r.y));
            Rect::new(origin.x, origin.y, r.width * scale, r.height * scale)
        };

        let grid = self.grid_lines(transform, viewport);

        let emphasized_node = interaction
            .hovered_node()
            .or(interaction.selected_node());

        let mut edges = Vec::with_capacity(snapshot.edges().len());
        for edge in snapshot.edges() {
            let Some(route) = layout.edge_routes.get(&edge.id) else {
                continue;
            };
            let points: Vec<Point> = route.iter().map(|&p| transform.to_screen(p)).collect();
            let (_, start_color) = snapshot
                .node(&edge.source)
                .map(|n| kind_colors(n.kind))
                .unwrap_or((NODE_FILL, NODE_BORDER));
            let (_, end_color) = snapshot
                .node(&edge.target)
                .map(|n| kind_colors(n.kind))
                .unwrap_or((NODE_FILL, NODE_BORDER));
            let emphasized = emphasized_node
                .map(|id| *id == edge.source || *id == edge.target)
                .unwrap_or(false);

            let arrowhead = arrowhead(&points, 8.0 * scale.max(0.5));
            edges.push(EdgeVisual {
                id: edge.id.clone(),
                points,
                start_color,
                end_color,
                width: (self.edge_width * scale).max(1.0),
                hit_width: interaction.edge_hit_width,
                emphasized,
                arrowhead,
            });
        }

        let mut nodes = Vec::with_capacity(snapshot.nodes().len());
        for node in snapshot.nodes() {
            let Some(frame) = layout.node_frames.get(&node.id) else {
                continue;
            };
            let screen_frame = to_screen_rect(frame);
            let (badge_bg, badge_fg) = kind_colors(node.kind);
            let selected = interaction.selected_node() == Some(&node.id);
            let hovered = interaction.hovered_node() == Some(&node.id);

            let mut rows = Vec::with_capacity(node.visible_row_count());
            for (i, row) in node
                .content_rows
                .iter()
                .take(node.visible_row_count())
                .enumerate()
            {
                let y = frame.y + HEADER_HEIGHT + i as f64 * ROW_HEIGHT;
                rows.push(RowVisual {
                    frame: to_screen_rect(&Rect::new(frame.x, y, frame.width, ROW_HEIGHT)),
                    name: row.name.clone(),
                    data_type: row.data_type.clone(),
                    glyph: match row.key {
                        RowKey::None => None,
                        RowKey::Primary => Some(RowGlyph::Key),
                        RowKey::Reference => Some(RowGlyph::Reference),
                    },
                });
            }

            let affordance = if node.is_expandable() {
                Some(if node.expanded {
                    "show fewer".to_string()
                } else {
                    format!("show {} more", node.hidden_row_count())
                })
            } else {
                None
            };

            nodes.push(NodeVisual {
                id: node.id.clone(),
                frame: screen_frame,
                title: node.display_name.clone(),
                badge: node.kind.label().to_string(),
                badge_bg,
                badge_fg,
                fill: NODE_FILL,
                border: if selected { SELECTED_BORDER } else { NODE_BORDER },
                selected,
                hovered,
                rows,
                affordance,
                title_size: self.title_size * scale,
                row_size: self.row_size * scale,
            });
        }

        let tooltip = interaction.tooltip().map(|t| {
            let mut lines = vec![format!("{} \u{2192} {}", t.source_name, t.target_name)];
            if let Some(rel) = &t.relationship {
                lines.push(format!("relationship: {rel}"));
            }
            if !t.views.is_empty() {
                lines.push(format!("views: {}", t.views.join(", ")));
            }
            let width = lines
                .iter()
                .map(|l| l.len() as f64 * 6.5 + 16.0)
                .fold(80.0, f64::max);
            let height = lines.len() as f64 * 16.0 + 12.0;
            TooltipVisual {
                frame: Rect::new(t.position.x, t.position.y, width, height),
                lines,
            }
        });

        Scene {
            viewport,
            grid,
            edges,
            nodes,
            tooltip,
            message: None,
        }
    }

    /// Error/empty-state frame: no geometry, just a centered message.
    pub fn message_scene(&self, viewport: ViewportSize, message: impl Into<String>) -> Scene {
        Scene {
            viewport,
            grid: Vec::new(),
            edges: Vec::new(),
            nodes: Vec::new(),
            tooltip: None,
            message: Some(message.into()),
        }
    }

    /// Background grid aligned to graph space, so it pans and zooms with
    /// the content.
    fn grid_lines(&self, transform: ViewportTransform, viewport: ViewportSize) -> Vec<GridLine> {
        let step = self.grid_step * transform.scale;
        if step < 4.0 {
            return Vec::new();
        }

        let mut lines = Vec::new();
        let mut x = transform.translate_x % step;
        if x < 0.0 {
            x += step;
        }
        while x <= viewport.width {
            lines.push(GridLine {
                from: Point::new(x, 0.0),
                to: Point::new(x, viewport.height),
                color: GRID_COLOR,
            });
            x += step;
        }

        let mut y = transform.translate_y % step;
        if y < 0.0 {
            y += step;
        }
        while y <= viewport.height {
            lines.push(GridLine {
                from: Point::new(0.0, y),
                to: Point::new(viewport.width, y),
                color: GRID_COLOR,
            });
            y += step;
        }

        lines
    }
}

/// Triangle at the last waypoint, oriented along the final segment.
fn arrowhead(points: &[Point], size: f64) -> [Point; 3] {
    let tip = *points.last().unwrap_or(&Point::new(0.0, 0.0));
    let prev = if points.len() >= 2 {
        points[points.len() - 2]
    } else {
        Point::new(tip.x - 1.0, tip.y)
    };

    let (dx, dy) = (tip.x - prev.x, tip.y - prev.y);
    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);

    [
        tip,
        Point::new(tip.x - ux * size + px * size * 0.5, tip.y - uy * size + py * size * 0.5),
        Point::new(tip.x - ux * size - px * size * 0.5, tip.y - uy * size - py * size * 0.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use catviz_layout::LayoutEngine;
    use catviz_model::{ContentRow, EdgeSpec, GraphModel, NodeSpec};

    fn ten_row_model() -> GraphModel {
        GraphModel::ingest(
            vec![
                NodeSpec {
                    id: "orders".into(),
                    display_name: "orders".into(),
                    kind: NodeKind::Table,
                    tags: vec![],
                    content_rows: (0..10)
                        .map(|i| {
                            let row = ContentRow::new(format!("col_{i}"), "text");
                            if i == 0 {
                                row.with_key(RowKey::Primary)
                            } else {
                                row
                            }
                        })
                        .collect(),
                },
                NodeSpec {
                    id: "report".into(),
                    display_name: "report".into(),
                    kind: NodeKind::Report,
                    tags: vec![],
                    content_rows: vec![],
                },
            ],
            vec![EdgeSpec {
                source: "orders".into(),
                target: "report".into(),
                relationship: None,
                views: vec![],
            }],
        )
        .unwrap()
    }

    fn render(model: &GraphModel) -> Scene {
        let snapshot = model.snapshot();
        let layout = LayoutEngine::default().compute(&snapshot).unwrap();
        Renderer::default().render(
            &snapshot,
            &layout,
            ViewportTransform::default(),
            &InteractionLayer::default(),
            ViewportSize::new(800.0, 600.0),
        )
    }

    #[test]
    fn collapsed_node_renders_six_rows_and_affordance() {
        let model = ten_row_model();
        let scene = render(&model);
        let orders = scene
            .nodes
            .iter()
            .find(|n| n.id == NodeId::from("orders"))
            .unwrap();
        assert_eq!(orders.rows.len(), 6);
        assert_eq!(orders.affordance.as_deref(), Some("show 4 more"));
        assert_eq!(orders.rows[0].glyph, Some(RowGlyph::Key));
    }

    #[test]
    fn expanded_node_renders_all_rows() {
        let mut model = ten_row_model();
        model.toggle_expand(&NodeId::from("orders"));
        let scene = render(&model);
        let orders = scene
            .nodes
            .iter()
            .find(|n| n.id == NodeId::from("orders"))
            .unwrap();
        assert_eq!(orders.rows.len(), 10);
        assert_eq!(orders.affordance.as_deref(), Some("show fewer"));
    }

    #[test]
    fn edges_carry_arrowheads_and_hit_strokes() {
        let scene = render(&ten_row_model());
        assert_eq!(scene.edges.len(), 1);
        let edge = &scene.edges[0];
        assert!(edge.points.len() >= 2);
        assert!(edge.hit_width > edge.width);
        assert_eq!(edge.arrowhead[0], *edge.points.last().unwrap());
    }

    #[test]
    fn grid_covers_the_viewport() {
        let scene = render(&ten_row_model());
        let vertical = scene.grid.iter().filter(|l| l.from.x == l.to.x).count();
        let horizontal = scene.grid.iter().filter(|l| l.from.y == l.to.y).count();
        // 800x600 viewport at step 40 -> about 21 vertical, 16 horizontal.
        assert!(vertical >= 20 && horizontal >= 15);
    }

    #[test]
    fn message_scene_has_no_geometry() {
        let scene =
            Renderer::default().message_scene(ViewportSize::new(800.0, 600.0), "invalid graph");
        assert!(scene.nodes.is_empty() && scene.edges.is_empty());
        assert_eq!(scene.message.as_deref(), Some("invalid graph"));
    }
}
