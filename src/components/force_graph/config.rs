//! Component configuration, view state and the defaults shared by every stage.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use super::theme::Palette;
use super::types::GraphNode;

/// Predicate selecting the nodes shown while a filter is active.
pub type NodeFilter = Arc<dyn Fn(&GraphNode) -> bool + Send + Sync>;

/// Category → color mapping that keeps the order its keys were given in.
///
/// The order becomes the legend order. A repeated key takes the later color
/// and keeps its first position.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CategoryColors(pub IndexMap<String, String>);

impl CategoryColors {
	pub fn get(&self, category: &str) -> Option<&str> {
		self.0.get(category).map(String::as_str)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CategoryColors {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Host-supplied options for a graph view.
///
/// Every field is optional; unset values fall back to [`GraphDefaults`].
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
	/// Named node filters, in selector order. When non-empty the slider is
	/// replaced by a filter selector and the first filter starts active.
	#[serde(skip)]
	pub filters: Vec<(String, NodeFilter)>,
	pub category_colors: Option<CategoryColors>,
	pub edge_color: Option<String>,
	pub highlighted_edge_color: Option<String>,
	/// Rendered node radius in pixels.
	pub node_size: Option<f64>,
	/// Rendered edge width in pixels.
	pub edge_size: Option<f64>,
	pub label_size: Option<f64>,
	/// Drop nodes without any edge in the current projection.
	pub ignore_floaters: bool,
	pub header_text: Option<String>,
	/// Title composited onto downloaded images.
	pub title: Option<String>,
	/// Composite the category legend onto downloaded images.
	pub show_legend: bool,
	/// Hide the slider/filter controls.
	pub hide_filter: bool,
}

impl GraphConfig {
	pub fn with_filter(
		mut self,
		name: impl Into<String>,
		filter: impl Fn(&GraphNode) -> bool + Send + Sync + 'static,
	) -> Self {
		self.filters.push((name.into(), Arc::new(filter)));
		self
	}

	pub fn filter(&self, name: &str) -> Option<&NodeFilter> {
		self.filters
			.iter()
			.find(|(filter_name, _)| filter_name == name)
			.map(|(_, filter)| filter)
	}

	pub fn filter_names(&self) -> impl Iterator<Item = &str> {
		self.filters.iter().map(|(name, _)| name.as_str())
	}
}

impl fmt::Debug for GraphConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GraphConfig")
			.field("filters", &self.filter_names().collect::<Vec<_>>())
			.field("category_colors", &self.category_colors)
			.field("edge_color", &self.edge_color)
			.field("highlighted_edge_color", &self.highlighted_edge_color)
			.field("node_size", &self.node_size)
			.field("edge_size", &self.edge_size)
			.field("label_size", &self.label_size)
			.field("ignore_floaters", &self.ignore_floaters)
			.field("header_text", &self.header_text)
			.field("title", &self.title)
			.field("show_legend", &self.show_legend)
			.field("hide_filter", &self.hide_filter)
			.finish()
	}
}

/// User-adjustable, non-persisted UI state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
	/// Node cap chosen with the slider.
	pub current_max_nodes: Option<usize>,
	/// Name of the active filter.
	pub current_filter: Option<String>,
}

impl ViewState {
	/// Initial state for a config: the first configured filter is active.
	pub fn initial(config: &GraphConfig) -> Self {
		Self {
			current_max_nodes: None,
			current_filter: config.filter_names().next().map(str::to_owned),
		}
	}
}

/// Constants used across the pipeline and the shell.
#[derive(Clone, Debug)]
pub struct GraphDefaults {
	/// Node cap when the slider has not been touched; also the slider minimum.
	pub max_nodes: usize,
	/// Slider maximum.
	pub max_max_nodes: usize,
	pub edge_color: String,
	pub highlighted_edge_color: String,
	/// Edge weight written on projected edges.
	pub edge_weight: f64,
	/// Node weight for `direct` nodes.
	pub direct_node_weight: f64,
	/// Node weight for all other nodes.
	pub node_weight: f64,
	/// Color for categories missing from an explicit mapping.
	pub fallback_color: String,
	pub palette: Palette,
	/// Start point for nodes without a previous frame.
	pub origin: (f64, f64),
	pub transition: Duration,
	pub slider_debounce: Duration,
	/// Click suppression after a drag ends.
	pub click_cooldown: Duration,
	/// Canvas height in pixels.
	pub height: f64,
	/// Rendered node radius in pixels.
	pub node_size: f64,
	/// Rendered edge width in pixels.
	pub edge_size: f64,
	pub label_size: f64,
}

impl Default for GraphDefaults {
	fn default() -> Self {
		Self {
			max_nodes: 50,
			max_max_nodes: 150,
			edge_color: "#e2e2e2".into(),
			highlighted_edge_color: "#808080".into(),
			edge_weight: 2.0,
			direct_node_weight: 1.0,
			node_weight: 0.5,
			fallback_color: "black".into(),
			palette: Palette::category10(),
			origin: (0.0, 0.0),
			transition: Duration::from_millis(1000),
			slider_debounce: Duration::from_millis(1000),
			click_cooldown: Duration::from_millis(50),
			height: 600.0,
			node_size: 7.0,
			edge_size: 2.0,
			label_size: 14.0,
		}
	}
}
