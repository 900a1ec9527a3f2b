//! Scene-to-SVG backend: walks the display list the renderer produced and
//! builds the markup with plain string formatting.

use catviz_graphview::{RowGlyph, Scene};
use catviz_layout::Point;

const BACKGROUND: &str = "#1b1b21";
const TEXT_COLOR: &str = "#d6d6dd";
const MUTED_TEXT: &str = "#8a8a96";
const TOOLTIP_FILL: &str = "#31313c";

pub fn scene_to_svg(scene: &Scene) -> String {
    let mut svg = format!(
        r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">
<rect width="100%" height="100%" fill="{}"/>
"#,
        scene.viewport.width, scene.viewport.height, BACKGROUND
    );

    for line in &scene.grid {
        svg.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="0.5"/>
"#,
            line.from.x,
            line.from.y,
            line.to.x,
            line.to.y,
            line.color.css()
        ));
    }

    // Gradient definitions, one per edge.
    if !scene.edges.is_empty() {
        svg.push_str("<defs>\n");
        for (i, edge) in scene.edges.iter().enumerate() {
            let from = edge.points.first().copied().unwrap_or(Point::new(0.0, 0.0));
            let to = edge.points.last().copied().unwrap_or(from);
            svg.push_str(&format!(
                r#"<linearGradient id="edge{i}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">
<stop offset="0" stop-color="{}"/>
<stop offset="1" stop-color="{}"/>
</linearGradient>
"#,
                from.x,
                from.y,
                to.x,
                to.y,
                edge.start_color.css(),
                edge.end_color.css()
            ));
        }
        svg.push_str("</defs>\n");
    }

    for (i, edge) in scene.edges.iter().enumerate() {
        let d = curve_path(&edge.points);
        let width = if edge.emphasized {
            edge.width * 2.0
        } else {
            edge.width
        };
        svg.push_str(&format!(
            r#"<path d="{d}" stroke="url(#edge{i})" stroke-width="{width}" fill="none"/>
"#,
        ));
        // Invisible wide stroke mirroring the hover hit-region.
        svg.push_str(&format!(
            r#"<path d="{d}" stroke="transparent" stroke-width="{}" fill="none"/>
"#,
            edge.hit_width
        ));
        let [a, b, c] = edge.arrowhead;
        svg.push_str(&format!(
            r#"<polygon points="{},{} {},{} {},{}" fill="{}"/>
"#,
            a.x,
            a.y,
            b.x,
            b.y,
            c.x,
            c.y,
            edge.end_color.css()
        ));
    }

    for node in &scene.nodes {
        let frame = node.frame;
        let stroke_width = if node.selected { 2.0 } else { 1.0 };
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="{}" stroke="{}" stroke-width="{stroke_width}"/>
"#,
            frame.x,
            frame.y,
            frame.width,
            frame.height,
            node.fill.css(),
            node.border.css()
        ));

        // Header band: kind badge, title, info affordance.
        let badge_width = node.badge.len() as f64 * node.row_size * 0.6 + 8.0;
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{badge_width}" height="{}" rx="2" fill="{}"/>
<text x="{}" y="{}" font-size="{}" fill="{}">{}</text>
<text x="{}" y="{}" font-size="{}" fill="{}">{}</text>
<text x="{}" y="{}" font-size="{}" fill="{}">&#9432;</text>
"#,
            frame.x + 6.0,
            frame.y + 6.0,
            node.row_size + 4.0,
            node.badge_bg.css(),
            frame.x + 10.0,
            frame.y + 6.0 + node.row_size,
            node.row_size,
            node.badge_fg.css(),
            node.badge,
            frame.x + badge_width + 14.0,
            frame.y + 6.0 + node.title_size,
            node.title_size,
            TEXT_COLOR,
            node.title,
            frame.right() - node.title_size - 4.0,
            frame.y + 6.0 + node.title_size,
            node.title_size,
            MUTED_TEXT,
        ));

        for row in &node.rows {
            let glyph = match row.glyph {
                Some(RowGlyph::Key) => "pk ",
                Some(RowGlyph::Reference) => "fk ",
                None => "",
            };
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" fill="{}">{glyph}{}</text>
<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="end">{}</text>
"#,
                row.frame.x + 8.0,
                row.frame.bottom() - 4.0,
                node.row_size,
                TEXT_COLOR,
                row.name,
                row.frame.right() - 8.0,
                row.frame.bottom() - 4.0,
                node.row_size,
                MUTED_TEXT,
                row.data_type,
            ));
        }

        if let Some(label) = &node.affordance {
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="middle">{label}</text>
"#,
                frame.center_x(),
                frame.bottom() - 6.0,
                node.row_size,
                MUTED_TEXT,
            ));
        }
    }

    if let Some(tooltip) = &scene.tooltip {
        let frame = tooltip.frame;
        svg.push_str(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="{}" stroke="#4a4a56"/>
"##,
            frame.x, frame.y, frame.width, frame.height, TOOLTIP_FILL
        ));
        for (i, line) in tooltip.lines.iter().enumerate() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="11" fill="{}">{line}</text>
"#,
                frame.x + 8.0,
                frame.y + 18.0 + i as f64 * 16.0,
                TEXT_COLOR,
            ));
        }
    }

    if let Some(message) = &scene.message {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="14" fill="{}" text-anchor="middle">{message}</text>
"#,
            scene.viewport.width / 2.0,
            scene.viewport.height / 2.0,
            MUTED_TEXT,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Smooths a waypoint polyline into quadratic segments: each interior
/// waypoint becomes a control point toward the midpoint of the following
/// span, so the curve bends through the routed columns without overshoot.
fn curve_path(points: &[Point]) -> String {
    match points {
        [] => String::new(),
        [only] => format!("M {} {}", only.x, only.y),
        [a, b] => format!("M {} {} L {} {}", a.x, a.y, b.x, b.y),
        _ => {
            let mut d = format!("M {} {}", points[0].x, points[0].y);
            for i in 1..points.len() - 1 {
                let control = points[i];
                let next = points[i + 1];
                let (mx, my) = if i + 1 == points.len() - 1 {
                    (next.x, next.y)
                } else {
                    ((control.x + next.x) / 2.0, (control.y + next.y) / 2.0)
                };
                d.push_str(&format!(" Q {} {} {} {}", control.x, control.y, mx, my));
            }
            d
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catviz_graphview::{GraphPanel, ViewportSize};
    use catviz_model::{ContentRow, EdgeSpec, NodeKind, NodeSpec};

    fn sample_scene() -> Scene {
        let panel = GraphPanel::open(
            vec![
                NodeSpec {
                    id: "orders".into(),
                    display_name: "orders".into(),
                    kind: NodeKind::Table,
                    tags: vec![],
                    content_rows: (0..8)
                        .map(|i| ContentRow::new(format!("c{i}"), "int"))
                        .collect(),
                },
                NodeSpec {
                    id: "sales".into(),
                    display_name: "sales".into(),
                    kind: NodeKind::Report,
                    tags: vec![],
                    content_rows: vec![],
                },
            ],
            vec![EdgeSpec {
                source: "orders".into(),
                target: "sales".into(),
                relationship: None,
                views: vec![],
            }],
            ViewportSize::new(640.0, 480.0),
        )
        .unwrap();
        panel.scene()
    }

    #[test]
    fn svg_contains_nodes_edges_and_grid() {
        let svg = scene_to_svg(&sample_scene());
        assert!(svg.contains("orders"));
        assert!(svg.contains("sales"));
        assert!(svg.contains("linearGradient"));
        assert!(svg.contains("show 2 more"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("stroke=\"transparent\""));
    }

    #[test]
    fn curve_path_smooths_interior_waypoints() {
        let d = curve_path(&[
            Point::new(0.0, 0.0),
            Point::new(50.0, 20.0),
            Point::new(100.0, 0.0),
        ]);
        assert!(d.starts_with("M 0 0"));
        assert!(d.contains("Q 50 20 100 0"));
    }

    #[test]
    fn two_point_route_is_a_line() {
        let d = curve_path(&[Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert_eq!(d, "M 0 0 L 10 10");
    }
}
