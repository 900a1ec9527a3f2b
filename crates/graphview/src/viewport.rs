//! Pan/zoom transform ownership. The controller is the only component that
//! mutates the transform; the renderer reads it every frame.

use catviz_layout::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Mapping from graph-space coordinates to screen-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewportTransform {
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(
            self.translate_x + p.x * self.scale,
            self.translate_y + p.y * self.scale,
        )
    }

    pub fn to_graph(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }
}

/// Size of the hosting surface, supplied by the host on open and resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    transform: ViewportTransform,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Fraction of the viewport the fitted content occupies.
    pub fit_margin: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            transform: ViewportTransform::default(),
            min_scale: 0.1,
            max_scale: 2.0,
            fit_margin: 0.9,
        }
    }
}

impl ViewportController {
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Centers `content_bounds` in the viewport, scaled so the content
    /// occupies about `fit_margin` of it, clamped to the zoom bounds.
    pub fn fit_to_content(&mut self, content_bounds: Rect, viewport: ViewportSize) {
        if content_bounds.width <= 0.0 || content_bounds.height <= 0.0 {
            self.transform = ViewportTransform::default();
            return;
        }

        let scale_x = viewport.width / content_bounds.width;
        let scale_y = viewport.height / content_bounds.height;
        let scale = (scale_x.min(scale_y) * self.fit_margin).clamp(self.min_scale, self.max_scale);

        self.transform = ViewportTransform {
            translate_x: viewport.width / 2.0 - content_bounds.center_x() * scale,
            translate_y: viewport.height / 2.0 - content_bounds.center_y() * scale,
            scale,
        };
    }

    pub fn apply_pan(&mut self, dx: f64, dy: f64) {
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
    }

    /// Zoom anchored at `anchor` (screen space): the graph point under the
    /// anchor stays fixed. Out-of-range factors clamp; they never error.
    pub fn apply_zoom(&mut self, factor: f64, anchor: Point) {
        let old_scale = self.transform.scale;
        let new_scale = (old_scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - old_scale).abs() < f64::EPSILON {
            return;
        }

        let world_x = (anchor.x - self.transform.translate_x) / old_scale;
        let world_y = (anchor.y - self.transform.translate_y) / old_scale;
        self.transform = ViewportTransform {
            translate_x: anchor.x - world_x * new_scale,
            translate_y: anchor.y - world_y * new_scale,
            scale: new_scale,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_inverts_within_tolerance() {
        let mut controller = ViewportController::default();
        let anchor = Point::new(320.0, 240.0);
        let before = controller.transform();

        controller.apply_zoom(1.25, anchor);
        controller.apply_zoom(1.0 / 1.25, anchor);

        let after = controller.transform();
        assert!((after.scale - before.scale).abs() < 1e-9);
        assert!((after.translate_x - before.translate_x).abs() < 1e-9);
        assert!((after.translate_y - before.translate_y).abs() < 1e-9);
    }

    #[test]
    fn zoom_keeps_anchor_point_fixed() {
        let mut controller = ViewportController::default();
        controller.apply_pan(50.0, -20.0);
        let anchor = Point::new(200.0, 150.0);
        let graph_before = controller.transform().to_graph(anchor);

        controller.apply_zoom(1.5, anchor);

        let graph_after = controller.transform().to_graph(anchor);
        assert!((graph_before.x - graph_after.x).abs() < 1e-9);
        assert!((graph_before.y - graph_after.y).abs() < 1e-9);
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut controller = ViewportController::default();
        let anchor = Point::new(0.0, 0.0);
        for _ in 0..50 {
            controller.apply_zoom(2.0, anchor);
        }
        assert!((controller.transform().scale - controller.max_scale).abs() < 1e-9);

        for _ in 0..50 {
            controller.apply_zoom(0.1, anchor);
        }
        assert!((controller.transform().scale - controller.min_scale).abs() < 1e-9);
    }

    #[test]
    fn fit_scale_stays_within_bounds() {
        let mut controller = ViewportController::default();
        let viewport = ViewportSize::new(800.0, 600.0);

        // Tiny content would overshoot max_scale without the clamp.
        controller.fit_to_content(Rect::new(0.0, 0.0, 10.0, 10.0), viewport);
        assert!(controller.transform().scale <= controller.max_scale);

        // Huge content would undershoot min_scale.
        controller.fit_to_content(Rect::new(0.0, 0.0, 1e6, 1e6), viewport);
        assert!(controller.transform().scale >= controller.min_scale);
    }

    #[test]
    fn fit_centers_content() {
        let mut controller = ViewportController::default();
        let viewport = ViewportSize::new(800.0, 600.0);
        let bounds = Rect::new(100.0, 100.0, 400.0, 200.0);
        controller.fit_to_content(bounds, viewport);

        let center = controller
            .transform()
            .to_screen(Point::new(bounds.center_x(), bounds.center_y()));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn pan_translates_without_scaling() {
        let mut controller = ViewportController::default();
        controller.apply_pan(15.0, -7.5);
        let t = controller.transform();
        assert_eq!((t.translate_x, t.translate_y, t.scale), (15.0, -7.5, 1.0));
    }
}
