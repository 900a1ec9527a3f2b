//! Edge routing: polyline waypoints from the source's right-center anchor
//! to the target's left-center anchor, passing through every intermediate
//! rank column the edge spans. The renderer smooths the polyline into
//! curves; hit-testing uses the same waypoints.

use std::collections::HashMap;

use crate::position::Column;
use crate::types::{Point, Rect};

pub(crate) fn route_edges(
    edges: &[(usize, usize)],
    ranks: &[usize],
    frames: &[Rect],
    columns: &[Column],
    parallel_offset: f64,
) -> Vec<Vec<Point>> {
    let mut seen_pairs: HashMap<(usize, usize), usize> = HashMap::new();
    let mut routes = Vec::with_capacity(edges.len());

    for &(u, v) in edges {
        let ordinal = seen_pairs.entry((u, v)).or_insert(0);
        let offset = *ordinal as f64 * parallel_offset;
        *ordinal += 1;

        let start = Point::new(frames[u].right(), frames[u].center_y());
        let end = Point::new(frames[v].left(), frames[v].center_y());

        let mut waypoints = vec![start];
        let (ru, rv) = (ranks[u], ranks[v]);
        if rv > ru + 1 {
            // One interior waypoint per spanned column, vertically
            // interpolated between the two anchors.
            let span = (rv - ru) as f64;
            for r in (ru + 1)..rv {
                let t = (r - ru) as f64 / span;
                waypoints.push(Point::new(
                    columns[r].center(),
                    start.y + (end.y - start.y) * t + offset,
                ));
            }
        } else {
            // Adjacent (or, under the fallback ranking, flat/backward)
            // edges get a midpoint so the curve has a bend to work with.
            waypoints.push(Point::new(
                (start.x + end.x) / 2.0,
                (start.y + end.y) / 2.0 + offset,
            ));
        }
        waypoints.push(end);

        routes.push(waypoints);
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f64, y: f64) -> Rect {
        Rect::new(x, y, 100.0, 50.0)
    }

    fn columns_for(frames: &[Rect]) -> Vec<Column> {
        frames
            .iter()
            .map(|f| Column {
                left: f.x,
                width: f.width,
            })
            .collect()
    }

    #[test]
    fn route_anchors_at_node_edges() {
        let frames = [frame(0.0, 0.0), frame(180.0, 100.0)];
        let routes = route_edges(&[(0, 1)], &[0, 1], &frames, &columns_for(&frames), 6.0);
        let route = &routes[0];
        assert!(route.len() >= 2);
        assert_eq!(route[0], Point::new(100.0, 25.0));
        assert_eq!(*route.last().unwrap(), Point::new(180.0, 125.0));
    }

    #[test]
    fn long_edge_visits_intermediate_columns() {
        let frames = [frame(0.0, 0.0), frame(180.0, 0.0), frame(360.0, 0.0)];
        let routes = route_edges(
            &[(0, 2)],
            &[0, 1, 2],
            &frames,
            &columns_for(&frames),
            6.0,
        );
        let route = &routes[0];
        assert_eq!(route.len(), 3);
        assert!((route[1].x - 230.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_edges_diverge() {
        let frames = [frame(0.0, 0.0), frame(180.0, 0.0)];
        let routes = route_edges(
            &[(0, 1), (0, 1)],
            &[0, 1],
            &frames,
            &columns_for(&frames),
            6.0,
        );
        assert_ne!(routes[0][1], routes[1][1]);
        assert_eq!(routes[0][0], routes[1][0]);
    }
}
