//! Graph data structures for input to the graph view component.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in edges.
	pub id: String,
	/// Category used for color grouping and the legend.
	pub category: String,
	/// Display label.
	pub name: String,
	/// Navigation target followed when the node is clicked.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub href: Option<String>,
	/// Direct nodes are drawn in the larger size tier.
	#[serde(default)]
	pub direct: bool,
}

/// An edge between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphEdge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Optional edge label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

/// Complete graph data: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

/// Errors raised while ingesting graph data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	/// Two nodes share the same id, so edges could not be resolved unambiguously.
	#[error("duplicate node id: {0}")]
	DuplicateNodeId(String),
}

impl GraphData {
	/// Two-node sample shown when the host supplies no data.
	pub fn sample() -> Self {
		Self {
			nodes: vec![
				GraphNode {
					id: "a".into(),
					category: "cat".into(),
					name: "Garfield".into(),
					href: None,
					direct: false,
				},
				GraphNode {
					id: "b".into(),
					category: "dog".into(),
					name: "Pluto".into(),
					href: None,
					direct: false,
				},
			],
			edges: vec![GraphEdge {
				source: "a".into(),
				target: "b".into(),
				label: Some("friend".into()),
			}],
		}
	}

	/// Rejects snapshots with duplicate node ids.
	pub fn validate(&self) -> Result<(), GraphError> {
		let mut seen = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
		}
		Ok(())
	}
}
