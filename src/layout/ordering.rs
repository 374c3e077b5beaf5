use crate::ir::FlowEdge;

/// Incident flows of one node, largest value first. Stable on ties.
pub(super) fn sorted_flows(edge_ids: &[usize], edges: &[FlowEdge]) -> Vec<FlowEdge> {
    let mut flows: Vec<FlowEdge> = edge_ids.iter().map(|&e| edges[e].clone()).collect();
    flows.sort_by(|a, b| b.value.total_cmp(&a.value));
    flows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let edges = vec![
            FlowEdge::new("a", "c", 3.0),
            FlowEdge::new("b", "c", 7.0),
            FlowEdge::new("d", "c", 3.0),
        ];
        let sorted = sorted_flows(&[0, 1, 2], &edges);
        assert_eq!(sorted[0], edges[1]);
        assert_eq!(sorted[1], edges[0]);
        assert_eq!(sorted[2], edges[2]);
    }
}
