#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, RenderConfig, SankeySettings};
pub use ir::FlowEdge;
pub use layout::{FlowGeometry, LayoutError, NodeLayout, SankeyLayout, compute_layout};
pub use parser::{ParseError, parse_flows};
pub use render::{RenderSink, SvgSink, render_svg};
pub use theme::Theme;

/// Everything needed to go from flow text to SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub settings: SankeySettings,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl RenderOptions {
    pub fn figma_default() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::default()
        }
    }
}

/// Parses `input`, applies any settings embedded in it, lays it out and
/// renders SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let parsed = parse_flows(input)?;
    let mut settings = options.settings;
    if let Some(overrides) = &parsed.settings {
        config::apply_settings_overrides(&mut settings, overrides)?;
    }
    let layout = layout::compute_layout_with(&parsed.edges, &settings, &options.layout)?;
    Ok(render_svg(
        &layout,
        &settings,
        &options.theme,
        &options.render,
    ))
}

pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_options(input, RenderOptions::default())
}
