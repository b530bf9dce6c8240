//! Leptos component wrapping the graph canvas.
//!
//! The component creates an HTML canvas, wraps its 2d context as a [`WebCanvas`]
//! and drives a [`CanvasGraphView`] with it. DOM events are translated into
//! [`InputEvent`]s; an animation loop via `requestAnimationFrame` advances the
//! layout and redraws whenever the view asked for it. Copy and paste go through
//! the browser's clipboard events while the canvas has focus.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, ClipboardEvent, HtmlCanvasElement, HtmlElement, KeyboardEvent,
	MouseEvent, WheelEvent, Window,
};

use super::canvas::WebCanvas;
use super::canvas_view::{CanvasGraphView, InputEvent};
use super::config::ViewerConfig;
use super::types::{Graph, GraphEntity};

type SharedView = Rc<RefCell<Option<CanvasGraphView<WebCanvas>>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn initial_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(size) = window_size(window) {
			return size;
		}
	}
	let container = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			container
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			container
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn sync_cursor(canvas: &HtmlCanvasElement, view: &CanvasGraphView<WebCanvas>) {
	let _ = HtmlElement::style(canvas).set_property("cursor", view.cursor().as_css());
}

/// Forward one input event, then sync the cursor and the label form.
fn feed(
	shared: &SharedView,
	canvas: &HtmlCanvasElement,
	label_open: RwSignal<bool>,
	event: InputEvent,
) {
	let mut guard = shared.borrow_mut();
	let Some(view) = guard.as_mut() else {
		return;
	};
	if let Err(err) = view.handle_input(event) {
		warn!("input event failed: {err}");
	}
	sync_cursor(canvas, view);
	label_open.set(view.pending_edge().is_some());
}

/// Handler for a pointer event that carries only a canvas position.
fn pointer_handler(
	shared: SharedView,
	canvas_ref: NodeRef<leptos::html::Canvas>,
	label_open: RwSignal<bool>,
	make: fn(f64, f64) -> InputEvent,
) -> impl Fn(MouseEvent) + 'static {
	move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		feed(&shared, &canvas, label_open, make(x, y));
	}
}

/// Renders an interactive knowledge map on a canvas element.
///
/// Pass the graph via the reactive `graph` signal; every new value replaces the
/// graph and re-fits the view. The component sizes itself to its parent by default;
/// set `fullscreen = true` to fill the viewport and follow window resizes. Explicit
/// `width`/`height` override automatic sizing. With `auto_layout` the force layout
/// runs whenever a graph is loaded.
#[component]
pub fn GraphCanvas(
	#[prop(into)] graph: Signal<Graph>,
	#[prop(optional)] config: Option<ViewerConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = false)] auto_layout: bool,
	#[prop(optional)] on_selection: Option<Callback<Vec<GraphEntity>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let label_open = RwSignal::new(false);
	let config = config.unwrap_or_default();

	let shared: SharedView = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (shared_init, animate_init, resize_cb_init) =
		(shared.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if shared_init.borrow().is_none() {
			let Some(window) = web_sys::window() else {
				warn!("graph canvas: no window");
				return;
			};
			let (w, h) = initial_size(&window, &canvas, fullscreen, width, height);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let Some(ctx) = context_2d(&canvas) else {
				warn!("graph canvas: 2d context unavailable");
				return;
			};

			let mut view = CanvasGraphView::new(WebCanvas::new(ctx), w, h, config.clone());
			if let Some(callback) = on_selection {
				view.view_mut()
					.subscribe_selection(move |selection| callback.run(selection.to_vec()));
			}
			*shared_init.borrow_mut() = Some(view);

			if fullscreen {
				let (shared_resize, canvas_resize) = (shared_init.clone(), canvas.clone());
				*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
					let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
						return;
					};
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Some(view) = shared_resize.borrow_mut().as_mut() {
						view.set_size(nw, nh);
					}
				}));
				if let Some(ref cb) = *resize_cb_init.borrow() {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}

			let (shared_anim, animate_inner, canvas_anim) =
				(shared_init.clone(), animate_init.clone(), canvas.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
				if let Some(view) = shared_anim.borrow_mut().as_mut() {
					match view.animation_frame_fired(now) {
						Ok(true) => sync_cursor(&canvas_anim, view),
						Ok(false) => {}
						Err(err) => warn!("frame failed: {err}"),
					}
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					if let Some(window) = web_sys::window() {
						let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
					}
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}

		if let Some(view) = shared_init.borrow_mut().as_mut() {
			match view.set_graph(graph) {
				Ok(()) => {
					info!(
						"graph canvas: showing {} nodes, {} edges",
						view.view().nodes().len(),
						view.view().edges().len()
					);
					if auto_layout {
						if let Err(err) = view.view_mut().start_graph_layout() {
							warn!("layout failed to start: {err}");
						}
					}
				}
				Err(err) => warn!("graph rejected: {err}"),
			}
		}
	});

	Effect::new(move |_| {
		if label_open.get() {
			if let Some(input) = input_ref.get() {
				let _ = input.focus();
			}
		}
	});

	let shared_md = shared.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let _ = canvas.focus();
		let (x, y) = canvas_point(&canvas, &ev);
		feed(&shared_md, &canvas, label_open, InputEvent::MouseDown { x, y });
	};

	let on_mousemove = pointer_handler(shared.clone(), canvas_ref, label_open, |x, y| {
		InputEvent::MouseMove { x, y }
	});
	let on_mouseup = pointer_handler(shared.clone(), canvas_ref, label_open, |x, y| {
		InputEvent::MouseUp { x, y }
	});
	let on_click = pointer_handler(shared.clone(), canvas_ref, label_open, |x, y| {
		InputEvent::Click { x, y }
	});
	let on_dblclick = pointer_handler(shared.clone(), canvas_ref, label_open, |x, y| {
		InputEvent::DoubleClick { x, y }
	});

	let shared_ml = shared.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		feed(&shared_ml, &canvas.into(), label_open, InputEvent::MouseLeave);
	};

	let shared_wh = shared.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		let event = InputEvent::Wheel {
			x,
			y,
			delta_y: ev.delta_y(),
			time_ms: ev.time_stamp(),
		};
		feed(&shared_wh, &canvas, label_open, event);
	};

	let shared_kd = shared.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let key = ev.key();
		let ctrl = ev.ctrl_key() || ev.meta_key();
		let shortcut = match key.as_str() {
			"Backspace" | "Delete" => true,
			"z" | "Z" | "y" => ctrl,
			_ => false,
		};
		if shortcut {
			ev.prevent_default();
		}
		feed(&shared_kd, &canvas.into(), label_open, InputEvent::KeyDown { key, ctrl });
	};

	let shared_cp = shared.clone();
	let on_copy = move |ev: ClipboardEvent| {
		let guard = shared_cp.borrow();
		let Some(text) = guard.as_ref().and_then(|view| view.interaction().clipboard.as_deref()) else {
			return;
		};
		if let Some(data) = ev.clipboard_data() {
			if data.set_data("text/plain", text).is_ok() {
				ev.prevent_default();
			}
		}
	};

	let shared_ps = shared.clone();
	let on_paste = move |ev: ClipboardEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		ev.prevent_default();
		let text = ev
			.clipboard_data()
			.and_then(|data| data.get_data("text/plain").ok());
		feed(&shared_ps, &canvas.into(), label_open, InputEvent::Paste { text });
	};

	let shared_lb = shared.clone();
	let on_label_key = move |ev: KeyboardEvent| {
		let key = ev.key();
		if key != "Enter" && key != "Escape" {
			return;
		}
		ev.prevent_default();
		let Some(input) = input_ref.get() else {
			return;
		};
		let label = (key == "Enter").then(|| input.value());
		input.set_value("");
		if let Some(view) = shared_lb.borrow_mut().as_mut() {
			if let Err(err) = view.resolve_edge_label(label) {
				warn!("edge creation failed: {err}");
			}
		}
		label_open.set(false);
		if let Some(canvas) = canvas_ref.get() {
			let _ = canvas.focus();
		}
	};

	view! {
		<div class="graph-canvas" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="graph-canvas-surface"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				on:keydown=on_keydown
				on:copy=on_copy
				on:paste=on_paste
				style="display: block; outline: none;"
			/>
			<div
				class="graph-canvas-label"
				style=move || {
					format!(
						"position: absolute; top: 1rem; left: 50%; transform: translateX(-50%); display: {};",
						if label_open.get() { "block" } else { "none" },
					)
				}
			>
				<input node_ref=input_ref type="text" placeholder="Edge label, Enter to add" on:keydown=on_label_key />
			</div>
		</div>
	}
}
