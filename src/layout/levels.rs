use std::collections::VecDeque;

use super::flow_index::FlowIndex;

/// Longest-path level per node, relaxed in FIFO order from the pure sources.
///
/// Nodes held back by a cycle are never dequeued; they keep the largest level
/// proposed to them so far, or 0.
pub(super) fn assign_levels(index: &FlowIndex) -> Vec<usize> {
    let node_count = index.node_count();

    // Distinct successors in first-seen order, and distinct predecessor counts,
    // so each adjacency entry decrements exactly one in-degree unit.
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut indegree = vec![0usize; node_count];
    for &(from_idx, to_idx) in &index.edge_ends {
        if !successors[from_idx].contains(&to_idx) {
            successors[from_idx].push(to_idx);
            indegree[to_idx] += 1;
        }
    }

    let mut levels = vec![0usize; node_count];
    let mut enqueued = vec![false; node_count];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for (idx, &deg) in indegree.iter().enumerate() {
        if deg == 0 {
            queue.push_back(idx);
            enqueued[idx] = true;
        }
    }

    let mut visited = 0usize;
    while let Some(node_idx) = queue.pop_front() {
        visited += 1;
        let proposed = levels[node_idx] + 1;
        for &target in &successors[node_idx] {
            levels[target] = levels[target].max(proposed);
            indegree[target] -= 1;
            if indegree[target] == 0 && !enqueued[target] {
                enqueued[target] = true;
                queue.push_back(target);
            }
        }
    }

    if visited < node_count {
        log::debug!(
            unresolved = node_count - visited;
            "Cycle detected, some nodes keep best-effort levels"
        );
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FlowEdge;

    fn levels_of(edges: &[FlowEdge]) -> Vec<(String, usize)> {
        let index = FlowIndex::build(edges);
        let levels = assign_levels(&index);
        index.node_ids.iter().cloned().zip(levels).collect()
    }

    fn level(levels: &[(String, usize)], id: &str) -> usize {
        levels
            .iter()
            .find(|(node, _)| node == id)
            .map(|(_, level)| *level)
            .unwrap()
    }

    #[test]
    fn longest_path_wins() {
        let levels = levels_of(&[
            FlowEdge::new("a", "b", 10.0),
            FlowEdge::new("b", "c", 10.0),
            FlowEdge::new("a", "c", 5.0),
        ]);
        assert_eq!(level(&levels, "a"), 0);
        assert_eq!(level(&levels, "b"), 1);
        assert_eq!(level(&levels, "c"), 2);
    }

    #[test]
    fn parallel_edges_do_not_block_propagation() {
        let levels = levels_of(&[
            FlowEdge::new("a", "b", 1.0),
            FlowEdge::new("a", "b", 2.0),
            FlowEdge::new("b", "c", 3.0),
        ]);
        assert_eq!(level(&levels, "b"), 1);
        assert_eq!(level(&levels, "c"), 2);
    }

    #[test]
    fn multiple_sources_share_level_zero() {
        let levels = levels_of(&[FlowEdge::new("a", "c", 1.0), FlowEdge::new("b", "c", 1.0)]);
        assert_eq!(level(&levels, "a"), 0);
        assert_eq!(level(&levels, "b"), 0);
        assert_eq!(level(&levels, "c"), 1);
    }

    #[test]
    fn pure_cycle_defaults_to_zero() {
        let levels = levels_of(&[FlowEdge::new("a", "b", 1.0), FlowEdge::new("b", "a", 1.0)]);
        assert_eq!(level(&levels, "a"), 0);
        assert_eq!(level(&levels, "b"), 0);
    }

    #[test]
    fn cycle_fed_by_source_keeps_proposal() {
        // s -> x <-> y: x is proposed level 1 but never dequeued
        let levels = levels_of(&[
            FlowEdge::new("s", "x", 1.0),
            FlowEdge::new("x", "y", 1.0),
            FlowEdge::new("y", "x", 1.0),
        ]);
        assert_eq!(level(&levels, "s"), 0);
        assert_eq!(level(&levels, "x"), 1);
        assert_eq!(level(&levels, "y"), 0);
    }

    #[test]
    fn self_loop_terminates() {
        let levels = levels_of(&[FlowEdge::new("a", "a", 1.0), FlowEdge::new("a", "b", 1.0)]);
        assert_eq!(level(&levels, "a"), 0);
        assert_eq!(level(&levels, "b"), 0);
    }
}
