use std::collections::BTreeMap;

use catviz_model::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rect covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn expand_to(&self, p: Point) -> Rect {
        let x = self.x.min(p.x);
        let y = self.y.min(p.y);
        Rect {
            x,
            y,
            width: self.right().max(p.x) - x,
            height: self.bottom().max(p.y) - y,
        }
    }
}

/// Geometry produced by one layout pass. Built fresh every time and never
/// mutated in place, so the renderer always draws a consistent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub node_frames: BTreeMap<NodeId, Rect>,
    pub edge_routes: BTreeMap<EdgeId, Vec<Point>>,
    pub content_bounds: Rect,
}

impl LayoutResult {
    pub fn empty() -> Self {
        Self {
            node_frames: BTreeMap::new(),
            edge_routes: BTreeMap::new(),
            content_bounds: Rect::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The edge set contains at least one cycle, so a strict layered
    /// ordering does not exist. The host decides whether to reject the
    /// graph or fall back to the unordered (BFS-ranked) layout.
    #[error("graph contains a cycle through: {}", nodes.join(", "))]
    CyclicGraph { nodes: Vec<String> },
}
