//! End-to-end runs of the projection → layout → transition pipeline.

use std::collections::HashSet;

use force_graph_view::components::force_graph::{
	GraphConfig, GraphData, GraphEdge, GraphError, GraphNode, GraphPipeline, ViewState,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn node(id: &str, category: &str) -> GraphNode {
	GraphNode {
		id: id.into(),
		category: category.into(),
		name: id.to_uppercase(),
		href: None,
		direct: false,
	}
}

fn edge(source: &str, target: &str) -> GraphEdge {
	GraphEdge {
		source: source.into(),
		target: target.into(),
		label: None,
	}
}

fn chain(len: usize) -> GraphData {
	let nodes = (0..len)
		.map(|i| node(&format!("n{i}"), if i % 2 == 0 { "even" } else { "odd" }))
		.collect();
	let edges = (1..len)
		.map(|i| edge(&format!("n{}", i - 1), &format!("n{i}")))
		.collect();
	GraphData { nodes, edges }
}

#[test]
fn sample_graph_renders_two_nodes_from_origin() {
	let mut pipeline = GraphPipeline::default();
	let frame = pipeline
		.run(&GraphData::sample(), &GraphConfig::default(), &ViewState::default())
		.unwrap()
		.unwrap();

	let ids: Vec<&str> = frame.nodes.iter().map(|n| n.id()).collect();
	assert_eq!(ids, vec!["a", "b"]);
	assert_eq!(frame.edges.len(), 1);
	assert_eq!(frame.edges[0].id, "e0");
	assert_eq!(frame.edges[0].label.as_deref(), Some("friend"));
	for n in &frame.nodes {
		assert_eq!((n.x, n.y), (0.0, 0.0));
		assert!((0.0..=1.0).contains(&n.x2) && (0.0..=1.0).contains(&n.y2));
	}
	assert_ne!(frame.nodes[0].node.color, frame.nodes[1].node.color);
}

#[test]
fn default_cap_limits_to_fifty_nodes() {
	let mut pipeline = GraphPipeline::default();
	let frame = pipeline
		.run(&chain(80), &GraphConfig::default(), &ViewState::default())
		.unwrap()
		.unwrap();
	assert_eq!(frame.nodes.len(), 50);
	assert_eq!(frame.edges.len(), 49);
	assert_eq!(frame.nodes.last().map(|n| n.id()), Some("n49"));
}

#[test]
fn raising_the_cap_keeps_old_nodes_in_place() {
	let mut pipeline = GraphPipeline::default();
	let config = GraphConfig::default();
	let data = chain(80);

	let first = pipeline.run(&data, &config, &ViewState::default()).unwrap().unwrap();
	let view = ViewState {
		current_max_nodes: Some(70),
		..ViewState::default()
	};
	let second = pipeline.run(&data, &config, &view).unwrap().unwrap();

	assert_eq!(second.nodes.len(), 70);
	for (old, new) in first.nodes.iter().zip(&second.nodes) {
		assert_eq!(old.id(), new.id());
		assert_eq!(new.from(), old.to());
	}
	for new in &second.nodes[50..] {
		assert_eq!((new.x, new.y), (0.0, 0.0));
	}
}

#[test]
fn filter_selects_matching_nodes() {
	let config = GraphConfig::default()
		.with_filter("evens", |n: &GraphNode| n.category == "even")
		.with_filter("odds", |n: &GraphNode| n.category == "odd");
	let data = GraphData {
		edges: vec![edge("n0", "n2"), edge("n0", "n1")],
		..chain(6)
	};

	let mut pipeline = GraphPipeline::default();
	let frame = pipeline
		.run(&data, &config, &ViewState::initial(&config))
		.unwrap()
		.unwrap();
	let ids: Vec<&str> = frame.nodes.iter().map(|n| n.id()).collect();
	assert_eq!(ids, vec!["n0", "n2", "n4"]);
	assert_eq!(frame.edges.len(), 1);
	assert_eq!((frame.edges[0].source.as_str(), frame.edges[0].target.as_str()), ("n0", "n2"));
}

#[test]
fn duplicate_ids_are_rejected() {
	let data = GraphData {
		nodes: vec![node("a", "x"), node("a", "y")],
		edges: Vec::new(),
	};
	let mut pipeline = GraphPipeline::default();
	assert_eq!(
		pipeline.run(&data, &GraphConfig::default(), &ViewState::default()),
		Err(GraphError::DuplicateNodeId("a".into()))
	);
}

#[test]
fn config_parses_from_json() {
	let config: GraphConfig = serde_json::from_str(
		r##"{
			"categoryColors": {"cat": "#f00", "dog": "#00f"},
			"ignoreFloaters": true,
			"showLegend": true,
			"title": "Pets"
		}"##,
	)
	.unwrap();
	let mut pipeline = GraphPipeline::default();
	let frame = pipeline
		.run(&GraphData::sample(), &config, &ViewState::default())
		.unwrap()
		.unwrap();
	let colors: Vec<&str> = frame.nodes.iter().map(|n| n.node.color.as_str()).collect();
	assert_eq!(colors, vec!["#f00", "#00f"]);
}

#[test]
fn data_parses_without_edges() {
	let data: GraphData =
		serde_json::from_str(r#"{"nodes": [{"id": "a", "category": "c", "name": "A"}]}"#).unwrap();
	assert!(data.edges.is_empty());
	assert!(!data.nodes[0].direct);
}

fn arb_graph() -> impl Strategy<Value = GraphData> {
	(1usize..40).prop_flat_map(|len| {
		let edges = prop::collection::vec((0..len + 5, 0..len + 5), 0..60);
		let categories = prop::collection::vec(0usize..4, len);
		(Just(len), edges, categories).prop_map(|(len, edges, categories)| GraphData {
			nodes: (0..len)
				.map(|i| node(&format!("n{i}"), &format!("c{}", categories[i])))
				.collect(),
			edges: edges
				.into_iter()
				.map(|(s, t)| edge(&format!("n{s}"), &format!("n{t}")))
				.collect(),
		})
	})
}

proptest! {
	#[test]
	fn rendered_edges_connect_rendered_nodes(
		data in arb_graph(),
		cap in 1usize..60,
		ignore_floaters in any::<bool>(),
	) {
		let config = GraphConfig { ignore_floaters, ..GraphConfig::default() };
		let view = ViewState { current_max_nodes: Some(cap), ..ViewState::default() };
		let mut pipeline = GraphPipeline::default();
		if let Some(frame) = pipeline.run(&data, &config, &view).unwrap() {
			let ids: HashSet<&str> = frame.nodes.iter().map(|n| n.id()).collect();
			prop_assert!(frame.nodes.len() <= cap);
			prop_assert!(frame.edges.len() <= data.edges.len());
			for e in &frame.edges {
				prop_assert!(ids.contains(e.source.as_str()));
				prop_assert!(ids.contains(e.target.as_str()));
			}
			for n in &frame.nodes {
				prop_assert!((0.0..=1.0).contains(&n.x2));
				prop_assert!((0.0..=1.0).contains(&n.y2));
			}
		}
	}

	#[test]
	fn filter_mode_ignores_the_slider(data in arb_graph(), cap in 1usize..60) {
		let config = GraphConfig::default().with_filter("c0", |n: &GraphNode| n.category == "c0");
		let filtered = ViewState::initial(&config);
		let capped = ViewState { current_max_nodes: Some(cap), ..filtered.clone() };

		let ids = |view: &ViewState| -> Vec<String> {
			GraphPipeline::default()
				.run(&data, &config, view)
				.unwrap()
				.map(|f| f.nodes.iter().map(|n| n.id().to_owned()).collect())
				.unwrap_or_default()
		};
		prop_assert_eq!(ids(&filtered), ids(&capped));
	}
}
