//! Projection → layout → reconciliation, run as one synchronous pass.

use log::debug;

use super::config::{GraphConfig, GraphDefaults, ViewState};
use super::layout::{LayoutConfig, LayoutEngine, Position};
use super::projection::{GraphDataProjector, ProjectedEdge};
use super::transition::{FrameNode, TransitionReconciler};
use super::types::{GraphData, GraphError};

/// Everything the rendering engine needs for one animated transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub nodes: Vec<FrameNode>,
	pub edges: Vec<ProjectedEdge>,
}

/// Owns the stages of a render pass and the previous frame's positions.
#[derive(Clone, Debug)]
pub struct GraphPipeline {
	projector: GraphDataProjector,
	layout: LayoutEngine,
	reconciler: TransitionReconciler,
}

impl GraphPipeline {
	pub fn new(defaults: &GraphDefaults, layout: LayoutConfig) -> Self {
		let (ox, oy) = defaults.origin;
		Self {
			projector: GraphDataProjector::new(defaults),
			layout: LayoutEngine::new(layout),
			reconciler: TransitionReconciler::new(Position::new(ox, oy)),
		}
	}

	pub fn projector(&self) -> &GraphDataProjector {
		&self.projector
	}

	/// Run one pass. `Ok(None)` means the projection was empty and nothing
	/// should be rendered.
	pub fn run(
		&mut self,
		data: &GraphData,
		config: &GraphConfig,
		view: &ViewState,
	) -> Result<Option<Frame>, GraphError> {
		let projection = self.projector.project(data, config, view)?;
		let placed = self.layout.layout(&projection);
		let nodes = self.reconciler.reconcile(placed);

		debug!(
			"force-graph-view: projected {} of {} nodes, {} of {} edges",
			nodes.len(),
			data.nodes.len(),
			projection.edges.len(),
			data.edges.len()
		);

		if nodes.is_empty() {
			return Ok(None);
		}
		Ok(Some(Frame {
			nodes,
			edges: projection.edges,
		}))
	}
}

impl Default for GraphPipeline {
	fn default() -> Self {
		Self::new(&GraphDefaults::default(), LayoutConfig::default())
	}
}
