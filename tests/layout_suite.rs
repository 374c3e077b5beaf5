use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use proptest::prelude::*;
use sankey_rs_renderer::{
    FlowEdge, RenderOptions, SankeyLayout, SankeySettings, compute_layout, parse_flows,
    render_with_options,
};

fn layout(edges: &[FlowEdge]) -> SankeyLayout {
    compute_layout(edges, &SankeySettings::default()).expect("layout failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: NaN leaked into output");
}

#[test]
fn single_flow_spans_two_levels() {
    let result = layout(&[FlowEdge::new("a", "b", 10.0)]);
    assert_eq!(result.nodes.len(), 2);
    assert_eq!(result.node("a").unwrap().level, 0);
    assert_eq!(result.node("b").unwrap().level, 1);
    assert_eq!(result.flows.len(), 1);
    assert_eq!(result.flows[0].thickness, 25.0);
}

#[test]
fn longest_path_beats_direct_edge() {
    let result = layout(&[
        FlowEdge::new("a", "b", 10.0),
        FlowEdge::new("b", "c", 10.0),
        FlowEdge::new("a", "c", 5.0),
    ]);
    let levels: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|id| result.node(id).unwrap().level)
        .collect();
    assert_eq!(levels, vec![0, 1, 2]);
}

#[test]
fn zero_values_fall_back_to_minimums() {
    let result = layout(&[FlowEdge::new("a", "b", 0.0)]);
    for node in &result.nodes {
        assert_eq!(node.height, 30.0);
        assert_eq!(node.total_value, 0.0);
    }
    assert_eq!(result.flows[0].thickness, 2.0);
    assert!(result.flows[0].from_y.is_finite());
}

#[test]
fn empty_edge_list_is_empty_layout() {
    let result = layout(&[]);
    assert!(result.nodes.is_empty());
    assert!(result.flows.is_empty());
}

#[test]
fn incoming_flows_sorted_and_stacked() {
    let edges = [FlowEdge::new("a", "c", 3.0), FlowEdge::new("b", "c", 7.0)];
    let result = layout(&edges);
    let c = result.node("c").unwrap();
    assert_eq!(
        c.incoming_flows,
        vec![FlowEdge::new("b", "c", 7.0), FlowEdge::new("a", "c", 3.0)]
    );

    let into_c: Vec<_> = result.flows.iter().filter(|f| f.to == "c").collect();
    assert_eq!(into_c.len(), 2);
    let first = into_c[0];
    let second = into_c[1];
    assert!(second.to_y > first.to_y);
    let first_top = first.to_y - first.thickness / 2.0;
    let second_top = second.to_y - second.thickness / 2.0;
    assert!(second_top - first_top >= first.thickness + 2.0 - 1e-9);
}

#[test]
fn render_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "energy.txt",
        "budget.json",
        "message.json",
        "cycle.txt",
        "zero.txt",
    ];
    for name in candidates {
        let input = std::fs::read_to_string(root.join(name)).expect("fixture read failed");
        let svg = render_with_options(&input, RenderOptions::default())
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_valid_svg(&svg, name);

        let parsed = parse_flows(&input).expect("parse failed");
        let flow_paths = svg.matches("class=\"sankey-flow\"").count();
        assert_eq!(flow_paths, parsed.edges.len(), "{name}: flow count");
    }
}

#[test]
fn message_fixture_applies_embedded_settings() {
    let input = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/message.json"),
    )
    .unwrap();
    let svg = render_with_options(&input, RenderOptions::modern()).unwrap();
    assert!(svg.contains("width=\"960\" height=\"640\""));
    assert!(svg.contains("linearGradient"));
}

#[test]
fn cycle_fixture_places_every_node() {
    let input = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cycle.txt"),
    )
    .unwrap();
    let parsed = parse_flows(&input).unwrap();
    let result = layout(&parsed.edges);
    let ids: Vec<_> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Source", "A", "B", "Sink"]);
    assert_eq!(result.node("Source").unwrap().level, 0);
    assert!(result.flows.iter().all(|f| f.thickness.is_finite()));
}

fn arb_edges() -> impl Strategy<Value = Vec<FlowEdge>> {
    prop::collection::vec((0usize..8, 0usize..8, 0u32..1000), 0..24).prop_map(|raw| {
        raw.into_iter()
            .map(|(from, to, value)| {
                FlowEdge::new(format!("n{from}"), format!("n{to}"), f64::from(value))
            })
            .collect()
    })
}

fn arb_dag_edges() -> impl Strategy<Value = Vec<FlowEdge>> {
    prop::collection::vec((0usize..8, 1usize..8, 1u32..500), 0..24).prop_map(|raw| {
        raw.into_iter()
            .map(|(from, step, value)| {
                let to = from + step;
                FlowEdge::new(format!("n{from}"), format!("n{to}"), f64::from(value))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn every_endpoint_becomes_exactly_one_node(edges in arb_edges()) {
        let result = layout(&edges);
        let expected: HashSet<&str> = edges
            .iter()
            .flat_map(|e| [e.from.as_str(), e.to.as_str()])
            .collect();
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn flows_follow_input_order(edges in arb_edges()) {
        let result = layout(&edges);
        prop_assert_eq!(result.flows.len(), edges.len());
        for (flow, edge) in result.flows.iter().zip(&edges) {
            prop_assert_eq!(&flow.from, &edge.from);
            prop_assert_eq!(&flow.to, &edge.to);
            prop_assert_eq!(flow.value, edge.value);
        }
    }

    #[test]
    fn layout_is_deterministic(edges in arb_edges()) {
        prop_assert_eq!(layout(&edges), layout(&edges));
    }

    #[test]
    fn dag_levels_increase_along_edges(edges in arb_dag_edges()) {
        let result = layout(&edges);
        for edge in &edges {
            let from = result.node(&edge.from).unwrap().level;
            let to = result.node(&edge.to).unwrap().level;
            prop_assert!(from < to, "{} -> {}: {} !< {}", edge.from, edge.to, from, to);
        }
    }

    #[test]
    fn nodes_in_a_level_do_not_overlap(edges in arb_edges()) {
        let settings = SankeySettings::default();
        let result = layout(&edges);
        let mut by_level: BTreeMap<usize, Vec<(f64, f64)>> = BTreeMap::new();
        for node in &result.nodes {
            by_level.entry(node.level).or_default().push((node.y, node.bottom()));
        }
        for spans in by_level.values_mut() {
            spans.sort_by(|a, b| a.0.total_cmp(&b.0));
            for pair in spans.windows(2) {
                prop_assert!(pair[1].0 >= pair[0].1 + settings.node_padding - 1e-9);
            }
        }
    }

    #[test]
    fn thickness_stays_clamped(edges in arb_edges()) {
        let result = layout(&edges);
        for flow in &result.flows {
            prop_assert!(!flow.thickness.is_nan());
            prop_assert!((2.0..=30.0).contains(&flow.thickness));
            prop_assert!(flow.from_y.is_finite() && flow.to_y.is_finite());
        }
    }
}
