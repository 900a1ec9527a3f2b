//! Coordinate assignment: ranks map to x columns, within-rank order to y.

use catviz_model::Size;

use crate::types::Rect;

/// One vertical column of the layout, spanning a whole rank.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub left: f64,
    pub width: f64,
}

impl Column {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Places every node. Each rank becomes a column as wide as its widest
/// node, columns are separated by `ranksep`, and nodes within a rank stack
/// top-down separated by `nodesep`, with shorter ranks centered against the
/// tallest one. Nodes are centered horizontally inside their column.
pub(crate) fn assign_coordinates(
    layers: &[Vec<usize>],
    sizes: &[Size],
    ranksep: f64,
    nodesep: f64,
    margin: f64,
) -> (Vec<Rect>, Vec<Column>) {
    let mut frames = vec![Rect::ZERO; sizes.len()];
    let mut columns = Vec::with_capacity(layers.len());

    let rank_height = |layer: &[usize]| -> f64 {
        let heights: f64 = layer.iter().map(|&n| sizes[n].height).sum();
        let gaps = layer.len().saturating_sub(1) as f64 * nodesep;
        heights + gaps
    };
    let tallest = layers.iter().map(|l| rank_height(l)).fold(0.0, f64::max);

    let mut cursor_x = margin;
    for layer in layers {
        let col_width = layer
            .iter()
            .map(|&n| sizes[n].width)
            .fold(0.0f64, f64::max);
        columns.push(Column {
            left: cursor_x,
            width: col_width,
        });

        let mut cursor_y = margin + (tallest - rank_height(layer)) / 2.0;
        for &node in layer {
            let size = sizes[node];
            frames[node] = Rect::new(
                cursor_x + (col_width - size.width) / 2.0,
                cursor_y,
                size.width,
                size.height,
            );
            cursor_y += size.height + nodesep;
        }

        cursor_x += col_width + ranksep;
    }

    (frames, columns)
}
