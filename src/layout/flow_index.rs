use std::collections::HashMap;

use crate::ir::FlowEdge;

/// Arena view of an edge list: nodes by first appearance, edges by index.
#[derive(Debug)]
pub(super) struct FlowIndex {
    pub node_ids: Vec<String>,
    pub edge_ends: Vec<(usize, usize)>,
    pub incoming: Vec<Vec<usize>>,
    pub outgoing: Vec<Vec<usize>>,
}

impl FlowIndex {
    pub fn build(edges: &[FlowEdge]) -> Self {
        let mut node_ids: Vec<String> = Vec::new();
        let mut id_to_idx: HashMap<&str, usize> = HashMap::new();
        let mut edge_ends = Vec::with_capacity(edges.len());
        for edge in edges {
            let from_idx = intern(&edge.from, &mut id_to_idx, &mut node_ids);
            let to_idx = intern(&edge.to, &mut id_to_idx, &mut node_ids);
            edge_ends.push((from_idx, to_idx));
        }

        let mut incoming = vec![Vec::new(); node_ids.len()];
        let mut outgoing = vec![Vec::new(); node_ids.len()];
        for (edge_idx, &(from_idx, to_idx)) in edge_ends.iter().enumerate() {
            outgoing[from_idx].push(edge_idx);
            incoming[to_idx].push(edge_idx);
        }

        Self {
            node_ids,
            edge_ends,
            incoming,
            outgoing,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }
}

fn intern<'a>(
    id: &'a str,
    id_to_idx: &mut HashMap<&'a str, usize>,
    node_ids: &mut Vec<String>,
) -> usize {
    *id_to_idx.entry(id).or_insert_with(|| {
        node_ids.push(id.to_string());
        node_ids.len() - 1
    })
}
