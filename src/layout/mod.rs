mod error;
mod flow_index;
mod geometry;
mod levels;
mod ordering;
mod position;
mod sizing;
pub(crate) mod types;
pub use error::LayoutError;
pub use types::*;

use flow_index::FlowIndex;
use geometry::generate_flows;
use levels::assign_levels;
use ordering::sorted_flows;
use position::position_nodes;
use sizing::{node_heights, node_totals};

use crate::color::node_color;
use crate::config::{LayoutConfig, SankeySettings};
use crate::ir::FlowEdge;

pub fn compute_layout(
    edges: &[FlowEdge],
    settings: &SankeySettings,
) -> Result<SankeyLayout, LayoutError> {
    compute_layout_with(edges, settings, &LayoutConfig::default())
}

/// Runs the five layout stages in order: levels, sizes, positions, flow
/// ordering, band geometry. Pure; the same input always yields the same
/// layout.
pub fn compute_layout_with(
    edges: &[FlowEdge],
    settings: &SankeySettings,
    config: &LayoutConfig,
) -> Result<SankeyLayout, LayoutError> {
    validate_settings(settings)?;
    validate_edges(edges)?;

    let index = FlowIndex::build(edges);
    log::debug!(
        nodes = index.node_count(),
        flows = edges.len();
        "Computing sankey layout"
    );

    let levels = assign_levels(&index);
    let totals = node_totals(&index, edges);
    let heights = node_heights(&totals, settings, config);
    let positions = position_nodes(&levels, &totals, &heights, settings, config);

    let mut nodes = Vec::with_capacity(index.node_count());
    for (idx, id) in index.node_ids.iter().enumerate() {
        let (x, y) = positions[idx];
        let color = node_color(id, &settings.colors)
            .ok_or(LayoutError::EmptyPalette)?
            .to_string();
        nodes.push(NodeLayout {
            id: id.clone(),
            level: levels[idx],
            x,
            y,
            width: settings.node_width,
            height: heights[idx],
            total_value: totals[idx],
            color,
            incoming_flows: sorted_flows(&index.incoming[idx], edges),
            outgoing_flows: sorted_flows(&index.outgoing[idx], edges),
        });
    }

    let flows = generate_flows(&index, edges, &nodes, config);

    let layout = SankeyLayout {
        width: settings.width,
        height: settings.height,
        nodes,
        flows,
    };
    log::debug!(levels = layout.level_count(); "Sankey layout computed");
    Ok(layout)
}

fn validate_settings(settings: &SankeySettings) -> Result<(), LayoutError> {
    let positive = [
        ("width", settings.width),
        ("height", settings.height),
        ("nodeWidth", settings.node_width),
    ];
    for (name, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::InvalidSettings(format!(
                "{name} must be a positive number, got {value}"
            )));
        }
    }
    if !settings.node_padding.is_finite() || settings.node_padding < 0.0 {
        return Err(LayoutError::InvalidSettings(format!(
            "nodePadding must be non-negative, got {}",
            settings.node_padding
        )));
    }
    if settings.colors.is_empty() {
        return Err(LayoutError::EmptyPalette);
    }
    Ok(())
}

fn validate_edges(edges: &[FlowEdge]) -> Result<(), LayoutError> {
    for (index, edge) in edges.iter().enumerate() {
        if edge.from.is_empty() {
            return Err(LayoutError::invalid_edge(index, "missing `from` node"));
        }
        if edge.to.is_empty() {
            return Err(LayoutError::invalid_edge(index, "missing `to` node"));
        }
        if !edge.value.is_finite() {
            return Err(LayoutError::invalid_edge(
                index,
                format!("value {} is not a finite number", edge.value),
            ));
        }
        if edge.value < 0.0 {
            return Err(LayoutError::invalid_edge(
                index,
                format!("value {} is negative", edge.value),
            ));
        }
    }
    Ok(())
}
