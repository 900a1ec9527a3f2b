//! Within-rank ordering: barycenter crossing reduction.
//!
//! This is a heuristic, not a globally optimal ordering. A fixed number of
//! alternating sweeps (downward using in-neighbors, upward using
//! out-neighbors) is run, with ties broken by a node's previous position
//! (the initial order is input order), so the result is fully reproducible.

pub(crate) fn order_ranks(
    ranks: &[usize],
    edges: &[(usize, usize)],
    passes: usize,
) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (node, &rank) in ranks.iter().enumerate() {
        layers[rank].push(node);
    }

    let mut pos = vec![0usize; ranks.len()];
    for layer in &layers {
        for (i, &node) in layer.iter().enumerate() {
            pos[node] = i;
        }
    }

    let mut in_neighbors: Vec<Vec<usize>> = vec![Vec::new(); ranks.len()];
    let mut out_neighbors: Vec<Vec<usize>> = vec![Vec::new(); ranks.len()];
    for &(u, v) in edges {
        in_neighbors[v].push(u);
        out_neighbors[u].push(v);
    }

    let before = count_crossings(&layers, &pos, edges);

    for pass in 0..passes {
        let downward = pass % 2 == 0;
        let mut changed = false;

        let rank_sequence: Vec<usize> = if downward {
            (1..=max_rank).collect()
        } else {
            (0..max_rank).rev().collect()
        };

        for r in rank_sequence {
            let layer = &mut layers[r];
            let mut entries: Vec<(f64, usize, usize)> = layer
                .iter()
                .map(|&node| {
                    let neighbors = if downward {
                        &in_neighbors[node]
                    } else {
                        &out_neighbors[node]
                    };
                    // A node with no neighbors on the fixed side keeps its
                    // place: its barycenter is its own current position.
                    let barycenter = if neighbors.is_empty() {
                        pos[node] as f64
                    } else {
                        neighbors.iter().map(|&n| pos[n] as f64).sum::<f64>()
                            / neighbors.len() as f64
                    };
                    (barycenter, pos[node], node)
                })
                .collect();

            entries.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.1.cmp(&b.1))
            });

            for (i, &(_, _, node)) in entries.iter().enumerate() {
                if layer[i] != node {
                    changed = true;
                }
                layer[i] = node;
                pos[node] = i;
            }
        }

        if !changed {
            break;
        }
    }

    let after = count_crossings(&layers, &pos, edges);
    tracing::debug!(before, after, "crossing reduction");

    layers
}

/// Number of crossings between adjacent-rank edge pairs. Quadratic in the
/// edge count, which is fine at the graph sizes the viewers handle; used
/// for diagnostics and tests only.
pub(crate) fn count_crossings(
    layers: &[Vec<usize>],
    pos: &[usize],
    edges: &[(usize, usize)],
) -> usize {
    let mut rank_of = vec![0usize; pos.len()];
    for (r, layer) in layers.iter().enumerate() {
        for &node in layer {
            rank_of[node] = r;
        }
    }

    let mut crossings = 0;
    for (i, &(u1, v1)) in edges.iter().enumerate() {
        for &(u2, v2) in &edges[i + 1..] {
            if rank_of[u1] != rank_of[u2] || rank_of[v1] != rank_of[v2] {
                continue;
            }
            let left = pos[u1] as i64 - pos[u2] as i64;
            let right = pos[v1] as i64 - pos[v2] as i64;
            if left * right < 0 {
                crossings += 1;
            }
        }
    }
    crossings
}
