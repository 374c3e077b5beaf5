use crate::layout::SankeyLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub levels: usize,
    pub nodes: Vec<NodeDump>,
    pub flows: Vec<FlowDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub level: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub total_value: f64,
    pub color: String,
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDump {
    pub from: String,
    pub to: String,
    pub value: f64,
    pub thickness: f64,
    pub from_y: f64,
    pub to_y: f64,
    pub color: String,
    pub path: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &SankeyLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                level: node.level,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                total_value: node.total_value,
                color: node.color.clone(),
                incoming: node.incoming_flows.iter().map(|f| f.from.clone()).collect(),
                outgoing: node.outgoing_flows.iter().map(|f| f.to.clone()).collect(),
            })
            .collect();

        let flows = layout
            .flows
            .iter()
            .map(|flow| FlowDump {
                from: flow.from.clone(),
                to: flow.to.clone(),
                value: flow.value,
                thickness: flow.thickness,
                from_y: flow.from_y,
                to_y: flow.to_y,
                color: flow.color.clone(),
                path: flow.path.to_svg_path(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            levels: layout.level_count(),
            nodes,
            flows,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &SankeyLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
