//! Rank assignment: places every node into a layer along the primary axis.

use std::collections::VecDeque;

use catviz_model::NodeId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::types::LayoutError;

/// Longest-path ranking over a DAG: sources (in-degree 0) get rank 0 and
/// every other node the length of the longest path reaching it, so every
/// edge strictly increases rank.
///
/// The edge set is checked for cycles first (strongly connected components
/// with more than one member); a cyclic input fails with
/// [`LayoutError::CyclicGraph`] instead of looping.
pub(crate) fn longest_path_ranks(
    ids: &[NodeId],
    edges: &[(usize, usize)],
) -> Result<Vec<usize>, LayoutError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(ids.len(), edges.len());
    let indices: Vec<_> = (0..ids.len()).map(|i| graph.add_node(i)).collect();
    for &(u, v) in edges {
        graph.add_edge(indices[u], indices[v], ());
    }

    let mut cyclic: Vec<usize> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .flatten()
        .map(|ix| graph[ix])
        .collect();
    if !cyclic.is_empty() {
        cyclic.sort_unstable();
        return Err(LayoutError::CyclicGraph {
            nodes: cyclic.iter().map(|&i| ids[i].to_string()).collect(),
        });
    }

    // Kahn relaxation in topological order.
    let mut in_degree = vec![0usize; ids.len()];
    for &(_, v) in edges {
        in_degree[v] += 1;
    }
    let mut ranks = vec![0usize; ids.len()];
    let mut queue: VecDeque<usize> = (0..ids.len()).filter(|&i| in_degree[i] == 0).collect();
    while let Some(u) = queue.pop_front() {
        for &(s, t) in edges {
            if s != u {
                continue;
            }
            ranks[t] = ranks[t].max(ranks[u] + 1);
            in_degree[t] -= 1;
            if in_degree[t] == 0 {
                queue.push_back(t);
            }
        }
    }

    Ok(ranks)
}

/// Fallback ranking that ignores longest-path strictness: BFS depth from
/// the in-degree-0 sources, restarting from the first unvisited node in
/// input order. Always terminates, even on cyclic input; edges may end up
/// flat or backwards.
pub(crate) fn bfs_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut in_degree = vec![0usize; node_count];
    for &(_, v) in edges {
        in_degree[v] += 1;
    }

    let mut ranks = vec![0usize; node_count];
    let mut visited = vec![false; node_count];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..node_count {
        if in_degree[start] == 0 && !visited[start] {
            visited[start] = true;
            queue.push_back(start);
        }
    }

    loop {
        while let Some(u) = queue.pop_front() {
            for &(s, t) in edges {
                if s == u && !visited[t] {
                    visited[t] = true;
                    ranks[t] = ranks[u] + 1;
                    queue.push_back(t);
                }
            }
        }
        // Pure cycles have no sources; seed from the next unvisited node.
        match (0..node_count).find(|&i| !visited[i]) {
            Some(next) => {
                visited[next] = true;
                queue.push_back(next);
            }
            None => break,
        }
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(|i| NodeId::new(format!("n{i}"))).collect()
    }

    #[test]
    fn chain_ranks_strictly_increase() {
        let ranks = longest_path_ranks(&ids(3), &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn diamond_takes_longest_path() {
        // 0 -> 1 -> 3 and 0 -> 3: node 3 sits after the longer arm.
        let ranks = longest_path_ranks(&ids(4), &[(0, 1), (1, 3), (0, 3), (0, 2)]).unwrap();
        assert_eq!(ranks, vec![0, 1, 1, 2]);
    }

    #[test]
    fn isolated_nodes_rank_zero() {
        let ranks = longest_path_ranks(&ids(3), &[]).unwrap();
        assert_eq!(ranks, vec![0, 0, 0]);
    }

    #[test]
    fn two_cycle_is_rejected() {
        let err = longest_path_ranks(&ids(2), &[(0, 1), (1, 0)]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicGraph {
                nodes: vec!["n0".to_string(), "n1".to_string()],
            }
        );
    }

    #[test]
    fn cycle_error_names_only_cycle_members() {
        let err = longest_path_ranks(&ids(4), &[(0, 1), (1, 2), (2, 1), (2, 3)]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicGraph {
                nodes: vec!["n1".to_string(), "n2".to_string()],
            }
        );
    }

    #[test]
    fn bfs_ranks_terminate_on_cycles() {
        let ranks = bfs_ranks(2, &[(0, 1), (1, 0)]);
        assert_eq!(ranks, vec![0, 1]);
    }

    #[test]
    fn bfs_ranks_follow_breadth() {
        let ranks = bfs_ranks(4, &[(0, 1), (0, 2), (1, 3)]);
        assert_eq!(ranks, vec![0, 1, 1, 2]);
    }
}
