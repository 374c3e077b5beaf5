use crate::config::LayoutConfig;
use crate::ir::FlowEdge;

use super::flow_index::FlowIndex;
use super::{BezierPath, FlowGeometry, NodeLayout};

/// Per-node rolling cursors for the two band stacks.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    outgoing_y: f64,
    incoming_y: f64,
}

pub(super) fn band_thickness(value: f64, max_value: f64, config: &LayoutConfig) -> f64 {
    if max_value <= 0.0 {
        return config.min_thickness;
    }
    (value / max_value * config.thickness_scale)
        .min(config.max_thickness)
        .max(config.min_thickness)
}

/// One geometry per edge, in input order. Bands are stacked at each node in
/// the order the edges appear, `band_gap` apart.
pub(super) fn generate_flows(
    index: &FlowIndex,
    edges: &[FlowEdge],
    nodes: &[NodeLayout],
    config: &LayoutConfig,
) -> Vec<FlowGeometry> {
    let mut cursors: Vec<Cursor> = nodes
        .iter()
        .map(|node| Cursor {
            outgoing_y: node.y,
            incoming_y: node.y,
        })
        .collect();
    let max_value = edges.iter().map(|edge| edge.value).fold(0.0, f64::max);

    let mut flows = Vec::with_capacity(edges.len());
    for (edge, &(from_idx, to_idx)) in edges.iter().zip(&index.edge_ends) {
        let from_node = &nodes[from_idx];
        let to_node = &nodes[to_idx];
        let thickness = band_thickness(edge.value, max_value, config);

        let from_x = from_node.right();
        let from_y = cursors[from_idx].outgoing_y + thickness / 2.0;
        let to_x = to_node.x;
        let to_y = cursors[to_idx].incoming_y + thickness / 2.0;

        cursors[from_idx].outgoing_y += thickness + config.band_gap;
        cursors[to_idx].incoming_y += thickness + config.band_gap;

        let span = to_x - from_x;
        let path = BezierPath {
            start: (from_x, from_y),
            control1: (from_x + span * config.control_ratio_start, from_y),
            control2: (from_x + span * config.control_ratio_end, to_y),
            end: (to_x, to_y),
        };

        log::trace!(
            from = edge.from.as_str(),
            to = edge.to.as_str(),
            thickness;
            "Flow band placed"
        );
        flows.push(FlowGeometry {
            from: edge.from.clone(),
            to: edge.to.clone(),
            value: edge.value,
            thickness,
            from_y,
            to_y,
            path,
            color: from_node.color.clone(),
        });
    }
    flows
}
