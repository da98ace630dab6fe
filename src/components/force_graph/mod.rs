//! Category-colored node-link graph widget.
//!
//! Turns a snapshot of nodes and edges into an animated canvas view:
//! - Projection of the snapshot under the current view state (node cap or
//!   named filter), with category colors stable across the whole snapshot
//! - Force-directed layout normalized to the unit square
//! - Transitions that animate each node from its previous position
//! - Neighbor highlighting on hover, dragging, and click-through links
//! - Image export with optional title and legend
//!
//! The pure stages are usable without a browser:
//!
//! ```ignore
//! use force_graph_view::{GraphConfig, GraphData, GraphPipeline, ViewState};
//!
//! let mut pipeline = GraphPipeline::default();
//! let frame = pipeline.run(&GraphData::sample(), &GraphConfig::default(), &ViewState::default())?;
//! ```
//!
//! In a Leptos view:
//!
//! ```ignore
//! view! { <GraphView data=data config=GraphConfig::default() /> }
//! ```

pub mod color;
mod component;
pub mod config;
pub mod layout;
pub mod pipeline;
pub mod projection;
mod render;
pub mod settings;
pub mod snapshot;
pub mod state;
pub mod theme;
pub mod timing;
pub mod transition;
mod types;
pub mod update;

pub use color::{ColorScale, ColorScaleResolver, LegendEntry};
pub use component::GraphView;
pub use config::{CategoryColors, GraphConfig, GraphDefaults, NodeFilter, ViewState};
pub use layout::{LayoutConfig, LayoutEngine, PlacedNode, Position};
pub use pipeline::{Frame, GraphPipeline};
pub use projection::{GraphDataProjector, ProjectedEdge, ProjectedNode, Projection};
pub use snapshot::{ImageFormat, SnapshotError, SnapshotOptions, take_snapshot};
pub use theme::Theme;
pub use transition::{FrameNode, TransitionReconciler};
pub use types::{GraphData, GraphEdge, GraphError, GraphNode};
pub use update::{RenderInputs, should_recompute};
