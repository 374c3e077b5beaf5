use crate::config::{LayoutConfig, SankeySettings};

/// Column x and stacked y for every node.
///
/// Columns are spread evenly over the canvas width. Inside a column nodes are
/// ordered by total value (largest on top, ties keep input order) and the
/// stack is centered vertically, never closer than `margin` to the top.
pub(super) fn position_nodes(
    levels: &[usize],
    totals: &[f64],
    heights: &[f64],
    settings: &SankeySettings,
    config: &LayoutConfig,
) -> Vec<(f64, f64)> {
    let mut positions = vec![(0.0, 0.0); levels.len()];
    let Some(max_level) = levels.iter().copied().max() else {
        return positions;
    };

    let level_width = ((settings.width - settings.node_width) / max_level.max(1) as f64)
        .max(config.min_level_width);

    let mut level_nodes: Vec<Vec<usize>> = vec![Vec::new(); max_level + 1];
    for (idx, &level) in levels.iter().enumerate() {
        level_nodes[level].push(idx);
    }

    for (level, nodes) in level_nodes.iter_mut().enumerate() {
        if nodes.is_empty() {
            continue;
        }
        nodes.sort_by(|a, b| totals[*b].total_cmp(&totals[*a]));

        let stack_height: f64 = nodes.iter().map(|&idx| heights[idx]).sum();
        let spacing = (nodes.len() - 1) as f64 * settings.node_padding;
        let mut cursor = ((settings.height - stack_height - spacing) / 2.0).max(config.margin);
        let x = level as f64 * level_width + config.margin;
        for &idx in nodes.iter() {
            positions[idx] = (x, cursor.max(config.margin));
            cursor += heights[idx] + settings.node_padding;
        }
    }

    positions
}
