//! Visual theming for the graph view.
//!
//! Provides the categorical node palette and the canvas colors that are not
//! driven by graph data.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// An ordered list of CSS colors assigned to categories by position.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub colors: Vec<String>,
}

impl Palette {
	pub fn new<I, S>(colors: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			colors: colors.into_iter().map(Into::into).collect(),
		}
	}

	/// The ten-color categorical palette.
	pub fn category10() -> Self {
		Self::new([
			"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
			"#bcbd22", "#17becf",
		])
	}

	/// Color for the `index`-th category, cycling when the palette runs out.
	/// An empty palette yields `None`.
	pub fn get(&self, index: usize) -> Option<&str> {
		if self.colors.is_empty() {
			return None;
		}
		Some(&self.colors[index % self.colors.len()])
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::category10()
	}
}

/// Canvas colors for the parts of the graph not colored by data.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	/// Canvas fill behind the graph. Fully transparent leaves the page visible.
	pub background: Color,
	/// Node label text color.
	pub label: Color,
	/// Ring drawn around the hovered node.
	pub hover_ring: Color,
}

impl Theme {
	/// Light theme: transparent background, dark labels.
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgba(255, 255, 255, 0.0),
			label: Color::rgb(0, 0, 0),
			hover_ring: Color::rgba(128, 128, 128, 0.8),
		}
	}

	/// Dark theme for pages with a dark background.
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: Color::rgb(22, 27, 34),
			label: Color::rgba(255, 255, 255, 0.85),
			hover_ring: Color::rgba(255, 255, 255, 0.8),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
