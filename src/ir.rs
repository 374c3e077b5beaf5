use serde::{Deserialize, Serialize};

pub type NodeId = String;

/// One weighted flow between two named nodes. Parallel edges between the same
/// pair are kept as distinct flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub value: f64,
}

impl FlowEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, value: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            value,
        }
    }
}
