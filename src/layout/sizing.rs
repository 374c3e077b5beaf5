use crate::config::{LayoutConfig, SankeySettings};
use crate::ir::FlowEdge;

use super::flow_index::FlowIndex;

/// `max(incoming sum, outgoing sum)` per node.
pub(super) fn node_totals(index: &FlowIndex, edges: &[FlowEdge]) -> Vec<f64> {
    let sum = |edge_ids: &[usize]| -> f64 { edge_ids.iter().map(|&e| edges[e].value).sum() };
    (0..index.node_count())
        .map(|idx| sum(&index.incoming[idx]).max(sum(&index.outgoing[idx])))
        .collect()
}

pub(super) fn node_heights(
    totals: &[f64],
    settings: &SankeySettings,
    config: &LayoutConfig,
) -> Vec<f64> {
    let max_value = totals.iter().copied().fold(0.0, f64::max);
    let max_height = settings.height * config.max_height_ratio;
    totals
        .iter()
        .map(|&total| {
            if max_value > 0.0 {
                (total / max_value * max_height).max(config.min_node_height)
            } else {
                config.min_node_height
            }
        })
        .collect()
}
