//! Rendering settings and the mapping from layout space to canvas pixels.
//!
//! Layout coordinates live in the unit square; node and edge `size` values are
//! relative weights. The renderer rescales both:
//!
//! - **Positions** are fit into the canvas with a uniform scale, centered,
//!   leaving `side_margin` plus the largest node radius free on each side.
//! - **Sizes** are mapped linearly from the weight range present in the frame
//!   onto `[min, max]` pixels. Equal bounds give every element the same size.

use std::time::Duration;

use super::config::{GraphConfig, GraphDefaults};

/// Settings record handed to the rendering engine with each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererSettings {
	/// Duration of the from → to transition.
	pub animations_time: Duration,
	/// Minimum rendered node radius (px) for a label to be drawn.
	pub label_threshold: f64,
	pub default_label_size: f64,
	pub min_node_size: f64,
	pub max_node_size: f64,
	pub min_edge_size: f64,
	pub max_edge_size: f64,
	/// Free space around the graph in pixels.
	pub side_margin: f64,
	/// Zoom step for one wheel notch. `1.0` disables zooming.
	pub zooming_ratio: f64,
	/// Allow panning and zooming.
	pub enable_camera: bool,
}

impl RendererSettings {
	pub fn from_config(config: &GraphConfig, defaults: &GraphDefaults) -> Self {
		let node_size = config.node_size.unwrap_or(defaults.node_size);
		let edge_size = config.edge_size.unwrap_or(defaults.edge_size);
		Self {
			animations_time: defaults.transition,
			label_threshold: 0.0,
			default_label_size: config.label_size.unwrap_or(defaults.label_size),
			min_node_size: node_size,
			max_node_size: node_size,
			min_edge_size: edge_size,
			max_edge_size: edge_size,
			side_margin: 4.0,
			zooming_ratio: 1.0,
			enable_camera: false,
		}
	}

	pub fn label_font(&self) -> String {
		format!("{}px sans-serif", self.default_label_size)
	}
}

impl Default for RendererSettings {
	fn default() -> Self {
		Self::from_config(&GraphConfig::default(), &GraphDefaults::default())
	}
}

/// Inclusive range of weights observed in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightRange {
	pub min: f64,
	pub max: f64,
}

impl WeightRange {
	pub fn of(weights: impl IntoIterator<Item = f64>) -> Self {
		let mut range = Self {
			min: f64::INFINITY,
			max: f64::NEG_INFINITY,
		};
		for w in weights {
			range.min = range.min.min(w);
			range.max = range.max.max(w);
		}
		if range.min > range.max {
			range = Self { min: 1.0, max: 1.0 };
		}
		range
	}

	/// Map `weight` onto `[lo, hi]`. A flat range maps everything to `hi`.
	pub fn scale(&self, weight: f64, lo: f64, hi: f64) -> f64 {
		let span = self.max - self.min;
		if span <= f64::EPSILON {
			return hi;
		}
		lo + (weight - self.min) / span * (hi - lo)
	}
}

/// Uniform fit of the unit square into a `width × height` canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub offset_x: f64,
	pub offset_y: f64,
	pub scale: f64,
}

impl Viewport {
	pub fn fit(width: f64, height: f64, padding: f64) -> Self {
		let scale = (width.min(height) - 2.0 * padding).max(1.0);
		Self {
			offset_x: (width - scale) / 2.0,
			offset_y: (height - scale) / 2.0,
			scale,
		}
	}

	pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(self.offset_x + x * self.scale, self.offset_y + y * self.scale)
	}

	pub fn to_layout(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.offset_x) / self.scale, (sy - self.offset_y) / self.scale)
	}
}
