//! Keyframe bookkeeping between consecutive layouts.
//!
//! Each node's start point is the target it had in the previous frame, so a
//! new layout animates from where the node was last drawn. The reconciler is
//! the only owner of the previous frame.

use std::collections::HashMap;

use super::layout::{PlacedNode, Position};
use super::projection::ProjectedNode;

/// A node with a start (`x`, `y`) and target (`x2`, `y2`) coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
	pub node: ProjectedNode,
	pub x: f64,
	pub y: f64,
	pub x2: f64,
	pub y2: f64,
}

impl FrameNode {
	pub fn id(&self) -> &str {
		&self.node.id
	}

	pub fn from(&self) -> Position {
		Position::new(self.x, self.y)
	}

	pub fn to(&self) -> Position {
		Position::new(self.x2, self.y2)
	}
}

/// Produces keyframe pairs and remembers the targets for the next run.
#[derive(Clone, Debug)]
pub struct TransitionReconciler {
	origin: Position,
	prior: HashMap<String, Position>,
}

impl TransitionReconciler {
	pub fn new(origin: Position) -> Self {
		Self {
			origin,
			prior: HashMap::new(),
		}
	}

	pub fn reconcile(&mut self, placed: Vec<PlacedNode>) -> Vec<FrameNode> {
		let frame: Vec<FrameNode> = placed
			.into_iter()
			.map(|p| {
				let start = self.prior.get(&p.node.id).copied().unwrap_or(self.origin);
				FrameNode {
					node: p.node,
					x: start.x,
					y: start.y,
					x2: p.position.x,
					y2: p.position.y,
				}
			})
			.collect();

		self.prior = frame
			.iter()
			.map(|n| (n.node.id.clone(), n.to()))
			.collect();
		frame
	}

	/// Number of nodes remembered from the last run.
	pub fn prior_len(&self) -> usize {
		self.prior.len()
	}
}

impl Default for TransitionReconciler {
	fn default() -> Self {
		Self::new(Position::default())
	}
}
