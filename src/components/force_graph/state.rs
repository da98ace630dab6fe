//! Rendering engine state: the loaded frame, its animation and pointer handling.
//!
//! The engine takes a [`Frame`] of keyframed nodes, animates each node from
//! its start to its target over `animations_time`, and turns raw pointer input
//! into [`EngineEvent`]s for the owning component. It never talks to the DOM;
//! drawing lives in `render`.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use super::layout::Position;
use super::pipeline::Frame;
use super::projection::ProjectedEdge;
use super::settings::{RendererSettings, Viewport, WeightRange};
use super::transition::FrameNode;

/// Pointer travel (px) before a press on a node becomes a drag.
const DRAG_THRESHOLD: f64 = 3.0;

/// Named events dispatched to the component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
	OverNode(String),
	ClickNode(String),
	DragStart(String),
	DragEnd(String),
}

/// A frame node plus its currently drawn position.
#[derive(Clone, Debug)]
pub struct EngineNode {
	pub frame: FrameNode,
	/// Current position in layout space.
	pub pos: Position,
}

/// An edge resolved to node indices, with its current color.
#[derive(Clone, Debug)]
pub struct EngineEdge {
	pub edge: ProjectedEdge,
	pub source: usize,
	pub target: usize,
	pub color: String,
}

/// Where and how large an edge label is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel<'a> {
	pub text: &'a str,
	/// Segment midpoint in world space.
	pub x: f64,
	pub y: f64,
	/// Font size in pixels, proportional to the edge width.
	pub size: f64,
}

/// Pan and zoom transform applied on top of the fitted viewport.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Tracks a press on a node, which may turn into a drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// The canvas engine's graph store and interaction state.
pub struct GraphEngine {
	pub settings: RendererSettings,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	nodes: Vec<EngineNode>,
	edges: Vec<EngineEdge>,
	id_to_idx: HashMap<String, usize>,
	/// Adjacency index, rebuilt on every load.
	adjacency: Vec<HashSet<usize>>,
	node_range: WeightRange,
	edge_range: WeightRange,
	hovered: Option<usize>,
	elapsed: Duration,
}

impl GraphEngine {
	pub fn new(settings: RendererSettings, width: f64, height: f64) -> Self {
		Self {
			settings,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			nodes: Vec::new(),
			edges: Vec::new(),
			id_to_idx: HashMap::new(),
			adjacency: Vec::new(),
			node_range: WeightRange::of(std::iter::empty()),
			edge_range: WeightRange::of(std::iter::empty()),
			hovered: None,
			elapsed: Duration::ZERO,
		}
	}

	/// Replace the displayed graph and restart the transition.
	pub fn load(&mut self, frame: Frame, settings: RendererSettings) {
		self.clear();
		self.settings = settings;

		for (i, node) in frame.nodes.into_iter().enumerate() {
			self.id_to_idx.insert(node.node.id.clone(), i);
			self.nodes.push(EngineNode {
				pos: node.from(),
				frame: node,
			});
		}
		self.adjacency = vec![HashSet::new(); self.nodes.len()];

		for edge in frame.edges {
			let (Some(&source), Some(&target)) = (
				self.id_to_idx.get(&edge.source),
				self.id_to_idx.get(&edge.target),
			) else {
				continue;
			};
			self.adjacency[source].insert(target);
			self.adjacency[target].insert(source);
			self.edges.push(EngineEdge {
				color: edge.color.clone(),
				edge,
				source,
				target,
			});
		}

		self.node_range = WeightRange::of(self.nodes.iter().map(|n| n.frame.node.size));
		self.edge_range = WeightRange::of(self.edges.iter().map(|e| e.edge.size));
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.id_to_idx.clear();
		self.adjacency.clear();
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;
		self.elapsed = Duration::ZERO;
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn nodes(&self) -> &[EngineNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[EngineEdge] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&EngineNode> {
		self.id_to_idx.get(id).map(|&i| &self.nodes[i])
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Ids of the nodes sharing an edge with `id`.
	pub fn neighbors(&self, id: &str) -> HashSet<&str> {
		self.id_to_idx
			.get(id)
			.map(|&i| {
				self.adjacency[i]
					.iter()
					.map(|&n| self.nodes[n].frame.node.id.as_str())
					.collect()
			})
			.unwrap_or_default()
	}

	/// Color every edge between `id` and its neighbors (or between two of its
	/// neighbors) with `highlight`, and all other edges with `base`.
	pub fn highlight_neighbors(&mut self, id: &str, highlight: &str, base: &str) {
		let Some(&center) = self.id_to_idx.get(id) else {
			return;
		};
		let keep = &self.adjacency[center];
		for edge in &mut self.edges {
			let kept = |n: usize| n == center || keep.contains(&n);
			edge.color = if kept(edge.source) && kept(edge.target) {
				highlight.to_owned()
			} else {
				base.to_owned()
			};
		}
	}

	/// Advance the transition by `dt`.
	pub fn tick(&mut self, dt: Duration) {
		if !self.is_animating() {
			return;
		}
		self.elapsed += dt;
		let t = ease_quadratic_in_out(self.progress());
		let dragged = self.drag.active.then_some(self.drag.node_idx).flatten();
		for (i, node) in self.nodes.iter_mut().enumerate() {
			if Some(i) == dragged {
				continue;
			}
			let (from, to) = (node.frame.from(), node.frame.to());
			node.pos = Position::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
		}
	}

	/// Transition progress in `[0, 1]`.
	pub fn progress(&self) -> f64 {
		let total = self.settings.animations_time.as_secs_f64();
		if total <= 0.0 {
			return 1.0;
		}
		(self.elapsed.as_secs_f64() / total).min(1.0)
	}

	pub fn is_animating(&self) -> bool {
		!self.nodes.is_empty() && self.elapsed < self.settings.animations_time
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Fit of layout space into the canvas, before the camera transform.
	pub fn viewport(&self) -> Viewport {
		Viewport::fit(
			self.width,
			self.height,
			self.settings.side_margin + self.settings.max_node_size,
		)
	}

	/// Node center in world space (canvas pixels before the camera transform).
	pub fn node_world(&self, idx: usize) -> (f64, f64) {
		let pos = self.nodes[idx].pos;
		self.viewport().to_screen(pos.x, pos.y)
	}

	pub fn node_radius(&self, idx: usize) -> f64 {
		self.node_range.scale(
			self.nodes[idx].frame.node.size,
			self.settings.min_node_size,
			self.settings.max_node_size,
		)
	}

	pub fn edge_width(&self, edge: &EngineEdge) -> f64 {
		self.edge_range.scale(
			edge.edge.size,
			self.settings.min_edge_size,
			self.settings.max_edge_size,
		)
	}

	/// Labels of edges that carry one. A label whose on-screen size falls
	/// below `label_threshold` is skipped.
	pub fn edge_labels(&self) -> Vec<EdgeLabel<'_>> {
		let settings = &self.settings;
		self.edges
			.iter()
			.filter_map(|edge| {
				let text = edge.edge.label.as_deref()?;
				let size = settings.default_label_size * self.edge_width(edge)
					/ settings.max_edge_size.max(f64::EPSILON);
				if size * self.transform.k < settings.label_threshold {
					return None;
				}
				let (x1, y1) = self.node_world(edge.source);
				let (x2, y2) = self.node_world(edge.target);
				Some(EdgeLabel {
					text,
					x: (x1 + x2) / 2.0,
					y: (y1 + y2) / 2.0,
					size,
				})
			})
			.collect()
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (wx, wy) = self.screen_to_world(sx, sy);
		(0..self.nodes.len()).rev().find(|&i| {
			let (nx, ny) = self.node_world(i);
			let (dx, dy) = (nx - wx, ny - wy);
			(dx * dx + dy * dy).sqrt() <= self.node_radius(i)
		})
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at(sx, sy) {
			self.drag = DragState {
				active: false,
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
			};
		} else if self.settings.enable_camera {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> Vec<EngineEvent> {
		let mut events = Vec::new();

		if let Some(idx) = self.drag.node_idx {
			if !self.drag.active {
				let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
				if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD {
					return events;
				}
				self.drag.active = true;
				events.push(EngineEvent::DragStart(self.nodes[idx].frame.node.id.clone()));
			}
			let (wx, wy) = self.screen_to_world(sx, sy);
			let (lx, ly) = self.viewport().to_layout(wx, wy);
			let node = &mut self.nodes[idx];
			node.pos = Position::new(lx, ly);
			// Pin the node so the running transition leaves it where it was dropped.
			node.frame.x = lx;
			node.frame.y = ly;
			node.frame.x2 = lx;
			node.frame.y2 = ly;
			return events;
		}

		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			return events;
		}

		let hovered = self.node_at(sx, sy);
		if hovered != self.hovered {
			self.hovered = hovered;
			if let Some(idx) = hovered {
				events.push(EngineEvent::OverNode(self.nodes[idx].frame.node.id.clone()));
			}
		}
		events
	}

	/// Release the pointer. A release over the pressed node is a click, even
	/// after a drag; the component decides whether to honor it.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Vec<EngineEvent> {
		let mut events = Vec::new();
		if let Some(idx) = self.drag.node_idx {
			let id = self.nodes[idx].frame.node.id.clone();
			if self.drag.active {
				events.push(EngineEvent::DragEnd(id.clone()));
			}
			if self.node_at(sx, sy) == Some(idx) {
				events.push(EngineEvent::ClickNode(id));
			}
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
		events
	}

	pub fn pointer_leave(&mut self) -> Vec<EngineEvent> {
		let mut events = Vec::new();
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				events.push(EngineEvent::DragEnd(self.nodes[idx].frame.node.id.clone()));
			}
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;
		events
	}

	/// Zoom around the pointer. Ignored unless the camera is enabled.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		if !self.settings.enable_camera {
			return;
		}
		let ratio = self.settings.zooming_ratio;
		let factor = if delta_y > 0.0 { 1.0 / ratio } else { ratio };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let applied = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * applied;
		self.transform.y = sy - (sy - self.transform.y) * applied;
		self.transform.k = new_k;
	}
}

fn ease_quadratic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		-1.0 + (4.0 - 2.0 * t) * t
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::force_graph::projection::ProjectedNode;

	fn frame_node(id: &str, from: (f64, f64), to: (f64, f64), size: f64) -> FrameNode {
		FrameNode {
			node: ProjectedNode {
				id: id.into(),
				category: "c".into(),
				label: id.into(),
				href: None,
				color: "#000".into(),
				size,
			},
			x: from.0,
			y: from.1,
			x2: to.0,
			y2: to.1,
		}
	}

	fn edge(i: usize, source: &str, target: &str) -> ProjectedEdge {
		ProjectedEdge {
			id: format!("e{i}"),
			source: source.into(),
			target: target.into(),
			label: None,
			color: "#e2e2e2".into(),
			size: 2.0,
		}
	}

	/// a - b - c, d isolated; everything already at its target.
	fn engine() -> GraphEngine {
		let frame = Frame {
			nodes: vec![
				frame_node("a", (0.0, 0.0), (0.0, 0.0), 1.0),
				frame_node("b", (0.5, 0.5), (0.5, 0.5), 0.5),
				frame_node("c", (1.0, 1.0), (1.0, 1.0), 0.5),
				frame_node("d", (1.0, 0.0), (1.0, 0.0), 0.5),
			],
			edges: vec![edge(0, "a", "b"), edge(1, "b", "c"), edge(2, "a", "zzz")],
		};
		let mut engine = GraphEngine::new(RendererSettings::default(), 422.0, 422.0);
		engine.load(frame, RendererSettings::default());
		engine
	}

	fn screen_of(engine: &GraphEngine, id: &str) -> (f64, f64) {
		let idx = engine.nodes().iter().position(|n| n.frame.id() == id).unwrap();
		engine.node_world(idx)
	}

	#[test]
	fn edge_label_sits_at_segment_midpoint() {
		let frame = Frame {
			nodes: engine().nodes().iter().map(|n| n.frame.clone()).collect(),
			edges: vec![
				ProjectedEdge {
					label: Some("friend".into()),
					..edge(0, "a", "b")
				},
				edge(1, "b", "c"),
			],
		};
		let mut engine = GraphEngine::new(RendererSettings::default(), 422.0, 422.0);
		engine.load(frame.clone(), RendererSettings::default());
		assert_eq!(
			engine.edge_labels(),
			vec![EdgeLabel {
				text: "friend",
				x: 111.0,
				y: 111.0,
				size: 14.0,
			}]
		);

		let hidden = RendererSettings {
			label_threshold: 20.0,
			..RendererSettings::default()
		};
		engine.load(frame, hidden);
		assert!(engine.edge_labels().is_empty());
	}

	#[test]
	fn dangling_edges_are_not_loaded() {
		assert_eq!(engine().edges().len(), 2);
	}

	#[test]
	fn neighbors_are_indexed_on_load() {
		let engine = engine();
		assert_eq!(engine.neighbors("b"), HashSet::from(["a", "c"]));
		assert_eq!(engine.neighbors("d"), HashSet::new());
		assert_eq!(engine.neighbors("missing"), HashSet::new());
	}

	#[test]
	fn hover_highlight_recolors_incident_edges() {
		let mut engine = engine();
		engine.highlight_neighbors("a", "#808080", "#e2e2e2");
		let colors: Vec<_> = engine.edges().iter().map(|e| e.color.as_str()).collect();
		assert_eq!(colors, vec!["#808080", "#e2e2e2"]);

		engine.highlight_neighbors("b", "#808080", "#e2e2e2");
		assert!(engine.edges().iter().all(|e| e.color == "#808080"));
	}

	#[test]
	fn animation_runs_from_start_to_target() {
		let frame = Frame {
			nodes: vec![frame_node("a", (0.0, 0.0), (1.0, 0.5), 1.0)],
			edges: Vec::new(),
		};
		let mut engine = GraphEngine::new(RendererSettings::default(), 100.0, 100.0);
		engine.load(frame, RendererSettings::default());
		assert_eq!(engine.nodes()[0].pos, Position::new(0.0, 0.0));

		engine.tick(Duration::from_millis(500));
		assert_eq!(engine.nodes()[0].pos, Position::new(0.5, 0.25));
		assert!(engine.is_animating());

		engine.tick(Duration::from_millis(700));
		assert_eq!(engine.nodes()[0].pos, Position::new(1.0, 0.5));
		assert!(!engine.is_animating());
	}

	#[test]
	fn node_sizes_scale_between_settings_bounds() {
		let settings = RendererSettings {
			min_node_size: 4.0,
			max_node_size: 8.0,
			..RendererSettings::default()
		};
		let mut engine = engine();
		let frame = Frame {
			nodes: engine.nodes().iter().map(|n| n.frame.clone()).collect(),
			edges: Vec::new(),
		};
		engine.load(frame, settings);
		assert_eq!(engine.node_radius(0), 8.0);
		assert_eq!(engine.node_radius(1), 4.0);
	}

	#[test]
	fn hover_emits_over_node_once() {
		let mut engine = engine();
		let (x, y) = screen_of(&engine, "b");
		assert_eq!(engine.pointer_move(x, y), vec![EngineEvent::OverNode("b".into())]);
		assert_eq!(engine.pointer_move(x + 1.0, y), Vec::new());
		assert_eq!(engine.hovered(), Some(1));
		assert_eq!(engine.pointer_move(x + 50.0, y), Vec::new());
		assert_eq!(engine.hovered(), None);
	}

	#[test]
	fn press_and_release_is_a_click() {
		let mut engine = engine();
		let (x, y) = screen_of(&engine, "c");
		engine.pointer_down(x, y);
		assert_eq!(engine.pointer_up(x, y), vec![EngineEvent::ClickNode("c".into())]);
	}

	#[test]
	fn drag_moves_node_and_reports_start_and_end() {
		let mut engine = engine();
		let (x, y) = screen_of(&engine, "b");
		engine.pointer_down(x, y);
		assert_eq!(engine.pointer_move(x + 1.0, y), Vec::new());
		assert_eq!(
			engine.pointer_move(x + 40.0, y),
			vec![EngineEvent::DragStart("b".into())]
		);
		assert_eq!(screen_of(&engine, "b"), (x + 40.0, y));

		let events = engine.pointer_up(x + 40.0, y);
		assert_eq!(
			events,
			vec![
				EngineEvent::DragEnd("b".into()),
				EngineEvent::ClickNode("b".into())
			]
		);
		assert!(!engine.drag.active);
	}

	#[test]
	fn camera_disabled_ignores_wheel_and_pan() {
		let mut engine = engine();
		engine.wheel(10.0, 10.0, 1.0);
		engine.pointer_down(211.0, 1.0);
		engine.pointer_move(300.0, 100.0);
		assert_eq!(engine.transform.k, 1.0);
		assert_eq!((engine.transform.x, engine.transform.y), (0.0, 0.0));
	}

	#[test]
	fn camera_pan_and_zoom() {
		let mut engine = engine();
		engine.settings.enable_camera = true;
		engine.settings.zooming_ratio = 2.0;

		engine.pointer_down(211.0, 1.0);
		engine.pointer_move(221.0, 6.0);
		engine.pointer_up(221.0, 6.0);
		assert_eq!((engine.transform.x, engine.transform.y), (10.0, 5.0));

		engine.wheel(0.0, 0.0, -1.0);
		assert_eq!(engine.transform.k, 2.0);
		assert_eq!((engine.transform.x, engine.transform.y), (20.0, 10.0));
	}

	#[test]
	fn clear_empties_the_store() {
		let mut engine = engine();
		engine.clear();
		assert!(engine.is_empty());
		assert!(engine.edges().is_empty());
		assert_eq!(engine.neighbors("a"), HashSet::new());
	}
}
