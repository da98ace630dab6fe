//! force-graph-view: category-colored node-link graph widget for web pages.
//!
//! This crate provides a WASM graph component that lays out a snapshot of
//! nodes and edges with a force simulation, animates between successive
//! layouts, and lets visitors cap, filter, explore and export the graph.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	Frame, GraphConfig, GraphData, GraphEdge, GraphError, GraphNode, GraphPipeline, GraphView,
	ViewState,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("force-graph-view: logging initialized");
}

/// Parse the JSON body of the script element with the given id.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("force-graph-view: failed to parse #{id}: {e}");
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Option<GraphData> {
	let data: GraphData = load_script_json("graph-data")?;
	info!(
		"force-graph-view: loaded {} nodes, {} edges",
		data.nodes.len(),
		data.edges.len()
	);
	Some(data)
}

/// Load widget options from a script element with id="graph-config".
fn load_graph_config() -> GraphConfig {
	load_script_json("graph-config").unwrap_or_default()
}

/// Main application component.
/// Loads graph data and options from the DOM and renders the widget.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(GraphData::sample);
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_graph_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="graph-page">
			<GraphView data=graph_signal config=config />
		</div>
	}
}
