use crate::color::{Rgb, hex_to_rgb};
use crate::config::{LayoutConfig, RenderConfig, SankeySettings};
use crate::ir::FlowEdge;
use crate::layout::{
    BezierPath, FlowGeometry, LayoutError, NodeLayout, SankeyLayout, compute_layout_with,
};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

const DEFAULT_FLOW_OPACITY: f64 = 0.6;
const NODE_GRADIENT_END_ALPHA: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid { color: Rgb, opacity: f64 },
    /// Left-to-right linear gradient.
    Linear { stops: Vec<GradientStop> },
}

/// Filled band outline: top edge forward, bottom edge back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonOutline {
    pub top: BezierPath,
    pub bottom: BezierPath,
}

impl RibbonOutline {
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} Z",
            self.top.start.0,
            self.top.start.1,
            self.top.control1.0,
            self.top.control1.1,
            self.top.control2.0,
            self.top.control2.1,
            self.top.end.0,
            self.top.end.1,
            self.bottom.start.0,
            self.bottom.start.1,
            self.bottom.control1.0,
            self.bottom.control1.1,
            self.bottom.control2.0,
            self.bottom.control2.1,
            self.bottom.end.0,
            self.bottom.end.1,
        )
    }
}

/// Builds the band outline around a flow centerline. Control points sit
/// `min(cap, span / 2)` in from each end.
pub fn ribbon_outline(flow: &FlowGeometry, curve_cap: f64) -> RibbonOutline {
    let from_x = flow.from_x();
    let to_x = flow.to_x();
    let half = flow.thickness / 2.0;
    let offset = ((to_x - from_x) * 0.5).min(curve_cap);
    let c1x = from_x + offset;
    let c2x = to_x - offset;
    RibbonOutline {
        top: BezierPath {
            start: (from_x, flow.from_y - half),
            control1: (c1x, flow.from_y - half),
            control2: (c2x, flow.to_y - half),
            end: (to_x, flow.to_y - half),
        },
        bottom: BezierPath {
            start: (to_x, flow.to_y + half),
            control1: (c2x, flow.to_y + half),
            control2: (c1x, flow.from_y + half),
            end: (from_x, flow.from_y + half),
        },
    }
}

/// Drawing surface the layout is handed to. Implementations decide how the
/// primitives become pixels, markup or host objects.
pub trait RenderSink {
    fn create_frame(&mut self, width: f64, height: f64, background: &str);
    fn create_ribbon(&mut self, flow: &FlowGeometry, outline: &RibbonOutline, fill: &Fill);
    fn create_node(&mut self, node: &NodeLayout, fill: &Fill);
    fn create_label(&mut self, node: &NodeLayout, theme: &Theme);
    fn notify(&mut self, message: &str);
}

fn flow_opacity(settings: &SankeySettings) -> f64 {
    if settings.flow_opacity.is_finite() {
        settings.flow_opacity.clamp(0.0, 1.0)
    } else {
        DEFAULT_FLOW_OPACITY
    }
}

pub fn flow_fill(flow: &FlowGeometry, layout: &SankeyLayout, settings: &SankeySettings) -> Fill {
    let opacity = flow_opacity(settings);
    let source = hex_to_rgb(&flow.color);
    if !settings.enable_gradients {
        return Fill::Solid {
            color: source,
            opacity,
        };
    }
    let target = layout
        .node(&flow.to)
        .map(|node| hex_to_rgb(&node.color))
        .unwrap_or(source);
    Fill::Linear {
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: source,
                opacity,
            },
            GradientStop {
                offset: 1.0,
                color: target,
                opacity,
            },
        ],
    }
}

pub fn node_fill(node: &NodeLayout, settings: &SankeySettings) -> Fill {
    let color = hex_to_rgb(&node.color);
    if !settings.enable_gradients {
        return Fill::Solid {
            color,
            opacity: 1.0,
        };
    }
    Fill::Linear {
        stops: vec![
            GradientStop {
                offset: 0.0,
                color,
                opacity: 1.0,
            },
            GradientStop {
                offset: 1.0,
                color,
                opacity: NODE_GRADIENT_END_ALPHA,
            },
        ],
    }
}

/// Frame first, then every ribbon in flow order, then node rectangles with
/// their labels on top.
pub fn draw_layout(
    layout: &SankeyLayout,
    settings: &SankeySettings,
    theme: &Theme,
    render: &RenderConfig,
    sink: &mut dyn RenderSink,
) {
    sink.create_frame(layout.width, layout.height, &theme.background);
    for flow in &layout.flows {
        let outline = ribbon_outline(flow, render.ribbon_curve_cap);
        sink.create_ribbon(flow, &outline, &flow_fill(flow, layout, settings));
    }
    for node in &layout.nodes {
        sink.create_node(node, &node_fill(node, settings));
        sink.create_label(node, theme);
    }
}

/// Computes and draws in one go, reporting the outcome through
/// [`RenderSink::notify`].
pub fn render_flows(
    edges: &[FlowEdge],
    settings: &SankeySettings,
    layout_config: &LayoutConfig,
    theme: &Theme,
    render: &RenderConfig,
    sink: &mut dyn RenderSink,
) -> Result<SankeyLayout, LayoutError> {
    match compute_layout_with(edges, settings, layout_config) {
        Ok(layout) => {
            draw_layout(&layout, settings, theme, render, sink);
            sink.notify("Sankey chart generated successfully");
            Ok(layout)
        }
        Err(err) => {
            sink.notify(&format!("Error generating chart: {err}"));
            Err(err)
        }
    }
}

#[derive(Debug, Default)]
pub struct SvgSink {
    body: String,
    width: f64,
    height: f64,
    gradient_count: usize,
    notifications: Vec<String>,
}

impl SvgSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn finish(self) -> String {
        let width = self.width.max(1.0);
        let height = self.height.max(1.0);
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">{}</svg>",
            self.body
        )
    }

    fn paint(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid { color, opacity } => {
                format!("fill=\"{}\" fill-opacity=\"{opacity}\"", color.to_css())
            }
            Fill::Linear { stops } => {
                let id = format!("sankey-grad-{}", self.gradient_count);
                self.gradient_count += 1;
                let _ = write!(
                    self.body,
                    "<defs><linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"0\">"
                );
                for stop in stops {
                    let _ = write!(
                        self.body,
                        "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
                        stop.offset,
                        stop.color.to_css(),
                        stop.opacity
                    );
                }
                self.body.push_str("</linearGradient></defs>");
                format!("fill=\"url(#{id})\"")
            }
        }
    }
}

impl RenderSink for SvgSink {
    fn create_frame(&mut self, width: f64, height: f64, background: &str) {
        self.width = width;
        self.height = height;
        let _ = write!(
            self.body,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background)
        );
    }

    fn create_ribbon(&mut self, flow: &FlowGeometry, outline: &RibbonOutline, fill: &Fill) {
        let paint = self.paint(fill);
        let _ = write!(
            self.body,
            "<path class=\"sankey-flow\" d=\"{}\" {paint}><title>{}</title></path>",
            outline.to_svg_path(),
            escape_xml(&format!("Flow: {} \u{2192} {} ({})", flow.from, flow.to, flow.value))
        );
    }

    fn create_node(&mut self, node: &NodeLayout, fill: &Fill) {
        let paint = self.paint(fill);
        let _ = write!(
            self.body,
            "<rect class=\"sankey-node\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {paint}><title>{}</title></rect>",
            node.x,
            node.y,
            node.width,
            node.height,
            escape_xml(&node.id)
        );
    }

    fn create_label(&mut self, node: &NodeLayout, theme: &Theme) {
        let x = node.right() + theme.label_offset;
        let y = node.y + node.height / 2.0;
        let _ = write!(
            self.body,
            "<text x=\"{x:.2}\" y=\"{y:.2}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            theme.font_size,
            escape_xml(&theme.font_weight),
            escape_xml(&theme.label_color),
            escape_xml(&node.id)
        );
    }

    fn notify(&mut self, message: &str) {
        log::info!(message; "Renderer notification");
        self.notifications.push(message.to_string());
    }
}

pub fn render_svg(
    layout: &SankeyLayout,
    settings: &SankeySettings,
    theme: &Theme,
    render: &RenderConfig,
) -> String {
    let mut sink = SvgSink::new();
    draw_layout(layout, settings, theme, render, &mut sink);
    sink.finish()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme.font_family.clone();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32) {
        opt.default_size = size;
    }
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
