//! Derives the node and edge set for one render pass from raw data.
//!
//! Selection is either filter-driven or capped by the slider, never both.
//! Edges survive only when both endpoints survived node selection; dangling
//! edges are dropped without a diagnostic.

use std::collections::HashSet;

use super::color::{ColorScale, ColorScaleResolver};
use super::config::{GraphConfig, GraphDefaults, ViewState};
use super::types::{GraphData, GraphError, GraphNode};

/// A selected node decorated for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedNode {
	pub id: String,
	pub category: String,
	pub label: String,
	pub href: Option<String>,
	pub color: String,
	/// Relative size weight (`1.0` direct, `0.5` otherwise by default).
	pub size: f64,
}

/// An edge whose endpoints are both in the projection.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedEdge {
	/// Sequential id (`e0`, `e1`, ...). Not stable across projections.
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: Option<String>,
	pub color: String,
	pub size: f64,
}

/// The filtered, capped, decorated node/edge set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projection {
	pub nodes: Vec<ProjectedNode>,
	pub edges: Vec<ProjectedEdge>,
}

impl Projection {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Turns a [`GraphData`] snapshot into a [`Projection`].
#[derive(Clone, Debug)]
pub struct GraphDataProjector {
	colors: ColorScaleResolver,
	max_nodes: usize,
	edge_color: String,
	edge_weight: f64,
	direct_node_weight: f64,
	node_weight: f64,
}

impl GraphDataProjector {
	pub fn new(defaults: &GraphDefaults) -> Self {
		Self {
			colors: ColorScaleResolver::new(defaults.palette.clone(), defaults.fallback_color.clone()),
			max_nodes: defaults.max_nodes,
			edge_color: defaults.edge_color.clone(),
			edge_weight: defaults.edge_weight,
			direct_node_weight: defaults.direct_node_weight,
			node_weight: defaults.node_weight,
		}
	}

	/// Color scale for a snapshot, resolved over all of its nodes so colors do
	/// not shift when the selection changes.
	pub fn color_scale(&self, data: &GraphData, config: &GraphConfig) -> ColorScale {
		self.colors
			.resolve(&data.nodes, config.category_colors.as_ref())
	}

	pub fn project(
		&self,
		data: &GraphData,
		config: &GraphConfig,
		view: &ViewState,
	) -> Result<Projection, GraphError> {
		data.validate()?;

		let scale = self.color_scale(data, config);
		let selected = self.select_nodes(data, config, view);

		let ids: HashSet<&str> = selected.iter().map(|n| n.id.as_str()).collect();
		let edge_color = config.edge_color.as_deref().unwrap_or(&self.edge_color);
		let edges: Vec<ProjectedEdge> = data
			.edges
			.iter()
			.filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
			.enumerate()
			.map(|(i, e)| ProjectedEdge {
				id: format!("e{i}"),
				source: e.source.clone(),
				target: e.target.clone(),
				label: e.label.clone(),
				color: edge_color.to_owned(),
				size: self.edge_weight,
			})
			.collect();

		let connected: Option<HashSet<&str>> = config.ignore_floaters.then(|| {
			edges
				.iter()
				.flat_map(|e| [e.source.as_str(), e.target.as_str()])
				.collect()
		});

		let nodes = selected
			.into_iter()
			.filter(|n| connected.as_ref().is_none_or(|c| c.contains(n.id.as_str())))
			.map(|n| ProjectedNode {
				id: n.id.clone(),
				category: n.category.clone(),
				label: n.name.clone(),
				href: n.href.clone(),
				color: scale.color(&n.category).to_owned(),
				size: if n.direct {
					self.direct_node_weight
				} else {
					self.node_weight
				},
			})
			.collect();

		Ok(Projection { nodes, edges })
	}

	fn select_nodes<'a>(
		&self,
		data: &'a GraphData,
		config: &GraphConfig,
		view: &ViewState,
	) -> Vec<&'a GraphNode> {
		if let Some(filter) = view
			.current_filter
			.as_deref()
			.and_then(|name| config.filter(name))
		{
			return data.nodes.iter().filter(|n| filter(n)).collect();
		}
		let cap = view.current_max_nodes.unwrap_or(self.max_nodes);
		data.nodes.iter().take(cap).collect()
	}
}

impl Default for GraphDataProjector {
	fn default() -> Self {
		Self::new(&GraphDefaults::default())
	}
}
