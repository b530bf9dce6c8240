//! knowledge-map-canvas: interactive canvas view for biomedical knowledge maps.
//!
//! This crate provides a WASM-based graph canvas that renders knowledge maps with
//! styled nodes and labelled edges, supports selection, drag, pan/zoom, interactive
//! edge creation with undo/redo, and lays graphs out with a force simulation.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph_viewer::{
	CanvasGraphView, Edge, Graph, GraphCanvas, GraphEntity, GraphError, GraphView, InputEvent,
	LayoutGroup, Node, ViewerConfig,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("knowledge-map-canvas: logging initialized");
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
			warn!("knowledge-map-canvas: failed to parse #{id}: {e}");
			None
		}
	}
}

/// Load the graph from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Option<Graph> {
	let graph: Graph = load_script_json("graph-data")?;
	info!(
		"knowledge-map-canvas: loaded {} nodes, {} edges",
		graph.nodes.len(),
		graph.edges.len()
	);
	Some(graph)
}

/// Main application component.
/// Loads the graph and optional viewer configuration from the DOM and renders the canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph.clone());
	let config = load_script_json::<ViewerConfig>("viewer-config").unwrap_or_default();
	let selection = RwSignal::new(0usize);
	let on_selection = Callback::new(move |entities: Vec<GraphEntity>| selection.set(entities.len()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Knowledge Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphCanvas graph=graph_signal config=config fullscreen=true on_selection=on_selection />
			<div class="graph-overlay">
				<h1>"Knowledge Map"</h1>
				<p class="subtitle">
					"Drag nodes to move them. Double-click a node, then click another to connect them. "
					"Scroll to zoom. Drag the background to pan. Ctrl+Z to undo."
				</p>
				<p class="selection">{move || format!("{} selected", selection.get())}</p>
			</div>
		</div>
	}
}
