//! Category → color resolution for nodes and the legend.

use indexmap::IndexMap;

use super::config::CategoryColors;
use super::theme::Palette;
use super::types::GraphNode;

/// One legend row: a swatch color and the category it stands for.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	pub color: String,
	pub text: String,
}

/// A total mapping from category to CSS color with an ordered domain.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
	/// Keys are the domain, in legend order.
	colors: IndexMap<String, String>,
	fallback: String,
}

impl ColorScale {
	/// Color for `category`. Unknown categories get the fallback color.
	pub fn color(&self, category: &str) -> &str {
		self.colors
			.get(category)
			.map(String::as_str)
			.unwrap_or(&self.fallback)
	}

	/// Categories known to the scale, in legend order.
	pub fn domain(&self) -> impl Iterator<Item = &str> {
		self.colors.keys().map(String::as_str)
	}

	pub fn legend(&self) -> Vec<LegendEntry> {
		self.colors
			.iter()
			.map(|(category, color)| LegendEntry {
				color: color.clone(),
				text: category.clone(),
			})
			.collect()
	}
}

/// Builds [`ColorScale`]s from an explicit mapping or a palette.
#[derive(Clone, Debug)]
pub struct ColorScaleResolver {
	palette: Palette,
	fallback: String,
}

impl ColorScaleResolver {
	pub fn new(palette: Palette, fallback: impl Into<String>) -> Self {
		Self {
			palette,
			fallback: fallback.into(),
		}
	}

	/// Resolve the scale for a node set.
	///
	/// An explicit mapping is used as-is (its key order is the domain).
	/// Otherwise categories are collected in first-seen order and assigned
	/// palette colors by position.
	pub fn resolve(&self, nodes: &[GraphNode], explicit: Option<&CategoryColors>) -> ColorScale {
		match explicit {
			Some(mapping) => ColorScale {
				colors: mapping.0.clone(),
				fallback: self.fallback.clone(),
			},
			None => {
				let mut colors = IndexMap::new();
				for node in nodes {
					if colors.contains_key(&node.category) {
						continue;
					}
					let color = self
						.palette
						.get(colors.len())
						.unwrap_or(&self.fallback)
						.to_owned();
					colors.insert(node.category.clone(), color);
				}
				ColorScale {
					colors,
					fallback: self.fallback.clone(),
				}
			}
		}
	}
}

impl Default for ColorScaleResolver {
	fn default() -> Self {
		Self::new(Palette::category10(), "black")
	}
}
