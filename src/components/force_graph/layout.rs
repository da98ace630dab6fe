//! Static force-directed layout.
//!
//! Runs the `force_graph` simulation for a fixed number of steps instead of
//! to convergence, then fits the result into the unit square. The step budget
//! bounds the cost of a layout pass regardless of how the graph behaves.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::projection::{ProjectedNode, Projection};

/// Point in the unit square.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A projected node with its freshly computed layout position.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
	pub node: ProjectedNode,
	pub position: Position,
}

/// Simulation tuning.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Number of simulation steps per layout.
	pub ticks: usize,
	/// Simulated seconds per step.
	pub tick_dt: f32,
	/// Radius of the circle nodes are seeded on, in simulation units.
	pub seed_radius: f64,
	pub node_mass: f32,
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			ticks: 300,
			tick_dt: 0.016,
			seed_radius: 100.0,
			node_mass: 10.0,
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Computes unit-square coordinates for a projection.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
	config: LayoutConfig,
}

impl LayoutEngine {
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Lay out `projection.nodes`, preserving their order in the output.
	pub fn layout(&self, projection: &Projection) -> Vec<PlacedNode> {
		let count = projection.nodes.len();
		if count == 0 {
			return Vec::new();
		}

		let c = &self.config;
		// Node user data is the node's position in the projection.
		let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
			force_charge: c.force_charge,
			force_spring: c.force_spring,
			force_max: c.force_max,
			node_speed: c.node_speed,
			damping_factor: c.damping_factor,
		});

		let mut id_to_idx = HashMap::with_capacity(count);
		for (i, node) in projection.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			let idx = graph.add_node(NodeData {
				x: (c.seed_radius * angle.cos()) as f32,
				y: (c.seed_radius * angle.sin()) as f32,
				mass: c.node_mass,
				is_anchor: false,
				user_data: i,
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for edge in &projection.edges {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				// Self-loops exert no useful force.
				if src != tgt {
					graph.add_edge(src, tgt, EdgeData::default());
				}
			}
		}

		for _ in 0..c.ticks {
			graph.update(c.tick_dt);
		}

		let mut raw = vec![(0.0_f64, 0.0_f64); count];
		graph.visit_nodes(|node| {
			raw[node.data.user_data] = (node.x() as f64, node.y() as f64);
		});

		normalize(&raw)
			.into_iter()
			.zip(&projection.nodes)
			.map(|(position, node)| PlacedNode {
				node: node.clone(),
				position,
			})
			.collect()
	}
}

/// Fit points into `[0,1] × [0,1]`, keeping the aspect ratio and centering the
/// shorter axis. A degenerate extent collapses every point to the center.
fn normalize(points: &[(f64, f64)]) -> Vec<Position> {
	let center = Position::new(0.5, 0.5);
	if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
		return vec![center; points.len()];
	}

	let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
	let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
	for &(x, y) in points {
		min_x = min_x.min(x);
		min_y = min_y.min(y);
		max_x = max_x.max(x);
		max_y = max_y.max(y);
	}

	let (width, height) = (max_x - min_x, max_y - min_y);
	let span = width.max(height);
	if span < f64::EPSILON {
		return vec![center; points.len()];
	}

	let (pad_x, pad_y) = ((1.0 - width / span) / 2.0, (1.0 - height / span) / 2.0);
	points
		.iter()
		.map(|&(x, y)| {
			Position::new(
				((x - min_x) / span + pad_x).clamp(0.0, 1.0),
				((y - min_y) / span + pad_y).clamp(0.0, 1.0),
			)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::{GraphConfig, ViewState};
	use crate::components::force_graph::projection::GraphDataProjector;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	fn star(n: usize) -> Projection {
		let data = GraphData {
			nodes: (0..n)
				.map(|i| GraphNode {
					id: i.to_string(),
					category: "c".into(),
					name: i.to_string(),
					href: None,
					direct: i == 0,
				})
				.collect(),
			edges: (1..n)
				.map(|i| GraphEdge {
					source: "0".into(),
					target: i.to_string(),
					label: None,
				})
				.collect(),
		};
		GraphDataProjector::default()
			.project(&data, &GraphConfig::default(), &ViewState::default())
			.unwrap()
	}

	fn in_unit_square(p: Position) -> bool {
		(0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
	}

	#[test]
	fn empty_projection_has_no_positions() {
		assert!(LayoutEngine::default().layout(&Projection::default()).is_empty());
	}

	#[test]
	fn single_node_sits_in_the_center() {
		let placed = LayoutEngine::default().layout(&star(1));
		assert_eq!(placed.len(), 1);
		assert_eq!(placed[0].position, Position::new(0.5, 0.5));
	}

	#[test]
	fn positions_stay_in_unit_square_and_keep_order() {
		let projection = star(12);
		let placed = LayoutEngine::default().layout(&projection);

		assert_eq!(placed.len(), 12);
		for (p, n) in placed.iter().zip(&projection.nodes) {
			assert_eq!(p.node.id, n.id);
			assert!(in_unit_square(p.position), "{:?} out of bounds", p.position);
		}
	}

	#[test]
	fn layout_spreads_nodes() {
		let placed = LayoutEngine::default().layout(&star(6));
		let xs: Vec<f64> = placed.iter().map(|p| p.position.x).collect();
		let ys: Vec<f64> = placed.iter().map(|p| p.position.y).collect();
		let spread = |v: &[f64]| {
			v.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
				- v.iter().cloned().fold(f64::INFINITY, f64::min)
		};
		// The longer axis is stretched to the full square.
		assert!((spread(&xs).max(spread(&ys)) - 1.0).abs() < 1e-9);
	}

	#[test]
	fn normalize_centers_the_short_axis() {
		let out = normalize(&[(0.0, 5.0), (10.0, 5.0)]);
		assert_eq!(out, vec![Position::new(0.0, 0.5), Position::new(1.0, 0.5)]);
	}

	#[test]
	fn normalize_collapses_non_finite_input() {
		let out = normalize(&[(f64::NAN, 0.0), (1.0, 1.0)]);
		assert_eq!(out, vec![Position::new(0.5, 0.5); 2]);
	}
}
