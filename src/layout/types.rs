use crate::ir::{FlowEdge, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: NodeId,
    pub level: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub total_value: f64,
    pub color: String,
    /// Sorted by value, largest first.
    pub incoming_flows: Vec<FlowEdge>,
    /// Sorted by value, largest first.
    pub outgoing_flows: Vec<FlowEdge>,
}

impl NodeLayout {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Cubic Bézier centerline of a flow band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPath {
    pub start: (f64, f64),
    pub control1: (f64, f64),
    pub control2: (f64, f64),
    pub end: (f64, f64),
}

impl BezierPath {
    /// SVG path data, `M x y C c1x c1y c2x c2y x y`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.start.0,
            self.start.1,
            self.control1.0,
            self.control1.1,
            self.control2.0,
            self.control2.1,
            self.end.0,
            self.end.1
        )
    }

    pub fn point_at(&self, t: f64) -> (f64, f64) {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        (
            a * self.start.0 + b * self.control1.0 + c * self.control2.0 + d * self.end.0,
            a * self.start.1 + b * self.control1.1 + c * self.control2.1 + d * self.end.1,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowGeometry {
    pub from: NodeId,
    pub to: NodeId,
    pub value: f64,
    pub thickness: f64,
    pub from_y: f64,
    pub to_y: f64,
    pub path: BezierPath,
    pub color: String,
}

impl FlowGeometry {
    pub fn from_x(&self) -> f64 {
        self.path.start.0
    }

    pub fn to_x(&self) -> f64 {
        self.path.end.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SankeyLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeLayout>,
    pub flows: Vec<FlowGeometry>,
}

impl SankeyLayout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn level_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.level + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.flows.is_empty()
    }
}
