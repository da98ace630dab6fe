//! Static image export of the rendered graph.
//!
//! The graph canvas is copied onto an off-screen canvas, optionally decorated
//! with a title and the category legend, encoded as a data URL and, on
//! request, offered to the user as a download.

use std::f64::consts::PI;
use std::str::FromStr;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement};

use super::color::LegendEntry;

/// Errors raised while exporting an image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
	#[error("unsupported snapshot format \"{0}\"")]
	UnsupportedFormat(String),
	#[error("no browser document available")]
	NoDocument,
	#[error("canvas has no 2d rendering context")]
	NoContext,
	#[error("browser call failed: {0}")]
	Browser(String),
}

impl From<JsValue> for SnapshotError {
	fn from(value: JsValue) -> Self {
		SnapshotError::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Image encodings the export supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFormat {
	#[default]
	Png,
	Jpeg,
	Gif,
	Tiff,
}

impl ImageFormat {
	pub fn mime(self) -> &'static str {
		match self {
			ImageFormat::Png => "image/png",
			ImageFormat::Jpeg => "image/jpeg",
			ImageFormat::Gif => "image/gif",
			ImageFormat::Tiff => "image/tiff",
		}
	}

	pub fn extension(self) -> &'static str {
		match self {
			ImageFormat::Png => "png",
			ImageFormat::Jpeg => "jpg",
			ImageFormat::Gif => "gif",
			ImageFormat::Tiff => "tiff",
		}
	}
}

impl FromStr for ImageFormat {
	type Err = SnapshotError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"png" => Ok(ImageFormat::Png),
			"jpg" => Ok(ImageFormat::Jpeg),
			"gif" => Ok(ImageFormat::Gif),
			"tiff" => Ok(ImageFormat::Tiff),
			other => Err(SnapshotError::UnsupportedFormat(other.to_owned())),
		}
	}
}

/// What to put in the exported image and how to deliver it.
#[derive(Clone, Debug, Default)]
pub struct SnapshotOptions {
	/// Format name (`png`, `jpg`, `gif`, `tiff`). Defaults to `png`.
	pub format: Option<String>,
	/// Trigger a browser download in addition to returning the data URL.
	pub download: bool,
	pub legend: Option<Vec<LegendEntry>>,
	pub title: Option<String>,
	/// Fill behind the graph; transparent when unset.
	pub background: Option<String>,
	/// Explicit download filename.
	pub filename: Option<String>,
}

/// Calendar date used for default filenames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
	pub year: u32,
	pub month: u32,
	pub day: u32,
}

impl Date {
	/// Today's date according to the browser.
	pub fn today() -> Self {
		let now = js_sys::Date::new_0();
		Self {
			year: now.get_full_year(),
			month: now.get_month() + 1,
			day: now.get_date(),
		}
	}
}

/// Download filename: the explicit one, a slug of the title, or a date stamp.
pub fn default_filename(
	filename: Option<&str>,
	title: Option<&str>,
	date: Date,
	format: ImageFormat,
) -> String {
	if let Some(name) = filename {
		return name.to_owned();
	}
	let stem = title
		.map(slugify)
		.filter(|slug| !slug.is_empty())
		.unwrap_or_else(|| format!("graph-{:04}-{:02}-{:02}", date.year, date.month, date.day));
	format!("{stem}.{}", format.extension())
}

fn slugify(title: &str) -> String {
	let mut slug = String::with_capacity(title.len());
	for c in title.chars() {
		if c.is_alphanumeric() {
			slug.extend(c.to_lowercase());
		} else if !slug.ends_with('-') {
			slug.push('-');
		}
	}
	slug.trim_matches('-').to_owned()
}

/// Composite `canvas` into an image and return its data URL.
///
/// The format is validated before any canvas work is done.
pub fn take_snapshot(
	canvas: &HtmlCanvasElement,
	options: &SnapshotOptions,
) -> Result<String, SnapshotError> {
	let format = match options.format.as_deref() {
		Some(name) => name.parse()?,
		None => ImageFormat::default(),
	};

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(SnapshotError::NoDocument)?;
	let merged: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
	merged.set_width(canvas.width());
	merged.set_height(canvas.height());
	let ctx = context_2d(&merged)?;
	let (width, height) = (merged.width() as f64, merged.height() as f64);

	if let Some(background) = &options.background {
		ctx.set_fill_style_str(background);
		ctx.fill_rect(0.0, 0.0, width, height);
	}
	ctx.draw_image_with_html_canvas_element(canvas, 0.0, 0.0)?;

	ctx.set_font("17px Arial");
	if let Some(title) = &options.title {
		ctx.set_fill_style_str("#000");
		ctx.fill_text(title, width - 200.0, 30.0)?;
	}
	if let Some(legend) = &options.legend {
		draw_legend(&ctx, legend)?;
	}

	let data_url = merged.to_data_url_with_type(format.mime())?;

	if options.download {
		let filename = default_filename(
			options.filename.as_deref(),
			options.title.as_deref(),
			Date::today(),
			format,
		);
		download(&document, &data_url, &filename)?;
	}
	Ok(data_url)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SnapshotError> {
	canvas
		.get_context("2d")?
		.ok_or(SnapshotError::NoContext)?
		.dyn_into()
		.map_err(|_| SnapshotError::NoContext)
}

fn draw_legend(ctx: &CanvasRenderingContext2d, legend: &[LegendEntry]) -> Result<(), SnapshotError> {
	for (i, entry) in legend.iter().enumerate() {
		let y = 30.0 + i as f64 * 25.0;
		ctx.set_fill_style_str(&entry.color);
		ctx.begin_path();
		ctx.arc(50.0, y, 10.0, 0.0, 2.0 * PI)?;
		ctx.close_path();
		ctx.fill();
		ctx.set_fill_style_str("#000");
		ctx.fill_text(&entry.text, 65.0, y + 5.0)?;
	}
	Ok(())
}

fn download(document: &Document, data_url: &str, filename: &str) -> Result<(), SnapshotError> {
	let anchor: HtmlAnchorElement = document.create_element("a")?.unchecked_into();
	anchor.set_href(data_url);
	anchor.set_download(filename);
	anchor.click();
	Ok(())
}
