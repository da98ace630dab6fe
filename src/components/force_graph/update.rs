//! Decides whether a property or state change warrants a new layout.

use super::config::ViewState;
use super::types::GraphData;

/// The inputs one render pass was (or will be) computed from.
#[derive(Clone, Copy, Debug)]
pub struct RenderInputs<'a, S> {
	pub data: &'a GraphData,
	pub view: &'a ViewState,
	/// Caller-controlled stage marker. When present it replaces data-based
	/// change detection.
	pub stage: Option<&'a S>,
}

/// Whether the pipeline must re-run when moving from `prev` to `next`.
///
/// - With a stage marker on `next`, recompute exactly when the marker changed.
/// - Without one, recompute only when the node count **and** the edge count
///   both changed. A change to just one of them is not detected.
/// - Any view state change always recomputes.
pub fn should_recompute<S: PartialEq>(prev: &RenderInputs<'_, S>, next: &RenderInputs<'_, S>) -> bool {
	let changed = match next.stage {
		Some(stage) => prev.stage != Some(stage),
		None => data_changed(prev.data, next.data),
	};
	changed || prev.view != next.view
}

fn data_changed(prev: &GraphData, next: &GraphData) -> bool {
	let nodes_differ = prev.nodes.len() != next.nodes.len();
	let edges_differ = prev.edges.len() != next.edges.len();
	nodes_differ && edges_differ
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphEdge, GraphNode};

	fn sized(nodes: usize, edges: usize) -> GraphData {
		GraphData {
			nodes: (0..nodes)
				.map(|i| GraphNode {
					id: i.to_string(),
					category: "c".into(),
					name: i.to_string(),
					href: None,
					direct: false,
				})
				.collect(),
			edges: (0..edges)
				.map(|_| GraphEdge {
					source: "0".into(),
					target: "1".into(),
					label: None,
				})
				.collect(),
		}
	}

	fn inputs<'a>(data: &'a GraphData, view: &'a ViewState) -> RenderInputs<'a, u32> {
		RenderInputs {
			data,
			view,
			stage: None,
		}
	}

	#[test]
	fn node_count_change_alone_is_not_detected() {
		// Known quirk: both counts must change.
		let (prev, next, view) = (sized(2, 1), sized(3, 1), ViewState::default());
		assert!(!should_recompute(&inputs(&prev, &view), &inputs(&next, &view)));
	}

	#[test]
	fn edge_count_change_alone_is_not_detected() {
		let (prev, next, view) = (sized(2, 1), sized(2, 4), ViewState::default());
		assert!(!should_recompute(&inputs(&prev, &view), &inputs(&next, &view)));
	}

	#[test]
	fn both_counts_changing_recomputes() {
		let (prev, next, view) = (sized(2, 1), sized(3, 2), ViewState::default());
		assert!(should_recompute(&inputs(&prev, &view), &inputs(&next, &view)));
	}

	#[test]
	fn identical_data_does_not_recompute() {
		let (data, view) = (sized(4, 3), ViewState::default());
		assert!(!should_recompute(&inputs(&data, &view), &inputs(&data, &view)));
	}

	#[test]
	fn view_change_always_recomputes() {
		let data = sized(4, 3);
		let prev_view = ViewState::default();
		let next_view = ViewState {
			current_max_nodes: Some(80),
			current_filter: None,
		};
		assert!(should_recompute(
			&inputs(&data, &prev_view),
			&inputs(&data, &next_view)
		));

		let staged_prev = RenderInputs {
			stage: Some(&1),
			..inputs(&data, &prev_view)
		};
		let staged_next = RenderInputs {
			stage: Some(&1),
			..inputs(&data, &next_view)
		};
		assert!(should_recompute(&staged_prev, &staged_next));
	}

	#[test]
	fn stage_overrides_data_detection() {
		let (prev, next, view) = (sized(2, 1), sized(3, 2), ViewState::default());
		let same_stage_prev = RenderInputs {
			stage: Some(&7),
			..inputs(&prev, &view)
		};
		let same_stage_next = RenderInputs {
			stage: Some(&7),
			..inputs(&next, &view)
		};
		assert!(!should_recompute(&same_stage_prev, &same_stage_next));

		let bumped = RenderInputs {
			stage: Some(&8),
			..inputs(&prev, &view)
		};
		assert!(should_recompute(&same_stage_prev, &bumped));
	}

	#[test]
	fn stage_appearing_counts_as_change() {
		let (data, view) = (sized(2, 1), ViewState::default());
		let next = RenderInputs {
			stage: Some(&0),
			..inputs(&data, &view)
		};
		assert!(should_recompute(&inputs(&data, &view), &next));
	}

	#[test]
	fn stage_disappearing_falls_back_to_counts() {
		let view = ViewState::default();
		let (small, same, larger) = (sized(2, 1), sized(2, 1), sized(3, 2));
		let staged = RenderInputs {
			stage: Some(&4),
			..inputs(&small, &view)
		};
		assert!(!should_recompute(&staged, &inputs(&same, &view)));
		assert!(should_recompute(&staged, &inputs(&larger, &view)));
	}
}
