//! Canvas-bound graph view.
//!
//! [`CanvasGraphView`] owns a [`GraphView`] together with everything that only
//! makes sense on screen: the pan/zoom transform, the pointer gesture state, the
//! installed behaviors and the cursor. Raw pointer input enters through
//! [`CanvasGraphView::handle_input`] in screen coordinates and is turned into
//! clicks, drags, pans and zooms here. After every input the view checks whether
//! the selection changed and, if so, tells the behaviors and offers resize
//! handles for a lone resizable node.

use log::debug;

use super::behaviors::{
	BehaviorList, BehaviorResult, CanvasBehavior, Handled, InteractionState, KeyPress, PasteEvent,
	PendingEdge, PointerEvent,
};
use super::canvas::DrawingContext;
use super::config::ViewerConfig;
use super::error::GraphError;
use super::geometry::Point;
use super::history::{CompoundAction, EdgeCreation, EdgeDeletion, GraphAction, NodeDeletion, NodeMove};
use super::render::{self, Scene};
use super::resize::ActiveNodeResize;
use super::types::{Edge, Graph, GraphEntity};
use super::view::GraphView;

/// Screen transform: graph point `p` is drawn at `p * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn invert_x(&self, sx: f64) -> f64 {
		(sx - self.x) / self.k
	}

	pub fn invert_y(&self, sy: f64) -> f64 {
		(sy - self.y) / self.k
	}

	/// Screen point to graph point.
	pub fn invert(&self, sx: f64, sy: f64) -> Point {
		Point::new(self.invert_x(sx), self.invert_y(sy))
	}

	/// Graph point to screen point.
	pub fn apply(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}
}

/// Where the pointer is pressed, and on what.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchPosition {
	pub position: Point,
	pub entity: Option<GraphEntity>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
	#[default]
	Default,
	Grab,
	Grabbing,
	Move,
}

impl Cursor {
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Default => "default",
			Cursor::Grab => "grab",
			Cursor::Grabbing => "grabbing",
			Cursor::Move => "move",
		}
	}
}

/// Raw input in screen (canvas pixel) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
	MouseDown { x: f64, y: f64 },
	MouseMove { x: f64, y: f64 },
	MouseUp { x: f64, y: f64 },
	MouseLeave,
	Click { x: f64, y: f64 },
	DoubleClick { x: f64, y: f64 },
	/// `delta_y < 0` zooms in.
	Wheel { x: f64, y: f64, delta_y: f64, time_ms: f64 },
	/// `ctrl` is set for Control or Meta.
	KeyDown { key: String, ctrl: bool },
	/// The platform's paste gesture, with the clipboard's plain text if readable.
	Paste { text: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PressMode {
	/// Pressed but not moved past the drag threshold yet.
	Pending,
	Dragging,
	Panning { origin_x: f64, origin_y: f64 },
}

#[derive(Clone, Debug)]
struct Press {
	start: Point,
	entity: Option<GraphEntity>,
	mode: PressMode,
}

/// A [`GraphView`] bound to a drawing surface.
pub struct CanvasGraphView<C: DrawingContext> {
	view: GraphView,
	ctx: C,
	transform: ViewTransform,
	width: f64,
	height: f64,

	hover_position: Option<Point>,
	touch_position: Option<TouchPosition>,
	mouse_down: bool,
	panning_or_zooming: bool,
	dragged: Option<GraphEntity>,
	/// Node position minus pointer position at drag start.
	drag_offset: (f64, f64),
	/// Node position at drag start.
	drag_origin: Option<(f64, f64)>,

	interaction: InteractionState,
	behaviors: BehaviorList,
	/// Selection as behaviors last saw it.
	last_selection: Vec<GraphEntity>,
	cursor: Cursor,

	press: Option<Press>,
	suppress_click: bool,
	last_wheel_ms: Option<f64>,
	last_fit_ms: Option<f64>,
	now_ms: f64,
}

impl<C: DrawingContext + Clone + 'static> CanvasGraphView<C> {
	/// A view over an empty graph, measuring text with a clone of `ctx`.
	pub fn new(ctx: C, width: f64, height: f64, config: ViewerConfig) -> Self {
		let view = GraphView::new(Box::new(ctx.clone()), config);
		Self {
			view,
			ctx,
			transform: ViewTransform::default(),
			width,
			height,
			hover_position: None,
			touch_position: None,
			mouse_down: false,
			panning_or_zooming: false,
			dragged: None,
			drag_offset: (0.0, 0.0),
			drag_origin: None,
			interaction: InteractionState::default(),
			behaviors: BehaviorList::standard(),
			last_selection: Vec::new(),
			cursor: Cursor::Default,
			press: None,
			suppress_click: false,
			last_wheel_ms: None,
			last_fit_ms: None,
			now_ms: 0.0,
		}
	}
}

impl<C: DrawingContext> CanvasGraphView<C> {
	pub fn view(&self) -> &GraphView {
		&self.view
	}

	pub fn view_mut(&mut self) -> &mut GraphView {
		&mut self.view
	}

	pub fn context(&self) -> &C {
		&self.ctx
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn set_transform(&mut self, transform: ViewTransform) {
		self.transform = transform;
		self.view.request_render();
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn cursor(&self) -> Cursor {
		self.cursor
	}

	pub fn hover_position(&self) -> Option<Point> {
		self.hover_position
	}

	pub fn touch_position(&self) -> Option<&TouchPosition> {
		self.touch_position.as_ref()
	}

	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	/// The edge waiting for its label, if any.
	pub fn pending_edge(&self) -> Option<&PendingEdge> {
		self.interaction.pending_edge.as_ref()
	}

	pub fn behaviors_mut(&mut self) -> &mut BehaviorList {
		&mut self.behaviors
	}

	/// Replace the graph, reset pointer state and fit it to the canvas.
	pub fn set_graph(&mut self, graph: Graph) -> Result<(), GraphError> {
		self.view.set_graph(graph)?;
		self.interaction = InteractionState::default();
		self.press = None;
		self.dragged = None;
		self.drag_origin = None;
		self.touch_position = None;
		self.mouse_down = false;
		self.panning_or_zooming = false;
		self.zoom_to_fit(self.view.config().zoom.fit_padding);
		self.sync_selection()
	}

	// ========================================================================
	// Gestures
	// ========================================================================

	/// Feed one raw input event.
	///
	/// A press that travels at least the drag threshold becomes a node drag when it
	/// started on an entity and a pan otherwise. The click the browser reports after
	/// such a gesture is swallowed.
	pub fn handle_input(&mut self, event: InputEvent) -> Result<(), GraphError> {
		match event {
			InputEvent::MouseDown { x, y } => {
				self.canvas_mouse_down();
				self.suppress_click = false;
				let entity = self.entity_at_screen(x, y)?;
				self.press = Some(Press {
					start: Point::new(x, y),
					entity,
					mode: PressMode::Pending,
				});
			}
			InputEvent::MouseMove { x, y } => {
				self.canvas_mouse_moved(x, y)?;
				self.continue_gesture(x, y)?;
			}
			InputEvent::MouseUp { x, y } => {
				self.finish_gesture(x, y)?;
				self.canvas_mouse_up();
			}
			InputEvent::MouseLeave => {
				self.finish_gesture_outside()?;
				self.canvas_mouse_leave();
			}
			InputEvent::Click { x, y } => {
				if !std::mem::take(&mut self.suppress_click) {
					self.canvas_clicked(x, y)?;
				}
			}
			InputEvent::DoubleClick { x, y } => self.canvas_double_clicked(x, y)?,
			InputEvent::Wheel {
				x,
				y,
				delta_y,
				time_ms,
			} => self.wheel_zoom(x, y, delta_y, time_ms),
			InputEvent::KeyDown { key, ctrl } => self.canvas_key_down(&key, ctrl)?,
			InputEvent::Paste { text } => {
				self.canvas_paste(text)?;
			}
		}
		self.sync_selection()
	}

	/// Offer a selection change to the behaviors, then install resize handles
	/// when exactly one resizable node is selected.
	fn sync_selection(&mut self) -> Result<(), GraphError> {
		if self.view.selection() == self.last_selection.as_slice() {
			return Ok(());
		}
		self.last_selection = self.view.selection().to_vec();
		self.dispatch(|b, view, state| b.selection_changed(view, state))?;

		if let [GraphEntity::Node(hash)] = self.view.selection() {
			if !self.behaviors.contains(ActiveNodeResize::KEY) {
				if let Some(resize) = ActiveNodeResize::for_node(&self.view, hash) {
					self.behaviors.add(
						ActiveNodeResize::KEY,
						Box::new(resize),
						ActiveNodeResize::PRIORITY,
					)?;
					self.view.request_render();
				}
			}
		}
		Ok(())
	}

	fn continue_gesture(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let Some(Press { start, entity, mode }) = self.press.clone() else {
			return Ok(());
		};
		match mode {
			PressMode::Pending => {
				if start.distance_to(Point::new(x, y)) < self.view.config().zoom.drag_threshold {
					return Ok(());
				}
				match entity {
					Some(entity) => {
						self.set_press_mode(PressMode::Dragging);
						self.canvas_drag_started(start.x, start.y, entity)?;
						self.canvas_dragged(x, y)?;
					}
					None => {
						let (origin_x, origin_y) = (self.transform.x, self.transform.y);
						self.set_press_mode(PressMode::Panning { origin_x, origin_y });
						self.pan_to(x, y, start, origin_x, origin_y);
					}
				}
			}
			PressMode::Dragging => self.canvas_dragged(x, y)?,
			PressMode::Panning { origin_x, origin_y } => self.pan_to(x, y, start, origin_x, origin_y),
		}
		Ok(())
	}

	fn finish_gesture(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let Some(press) = self.press.take() else {
			return Ok(());
		};
		match press.mode {
			PressMode::Pending => {}
			PressMode::Dragging => {
				self.suppress_click = true;
				self.canvas_drag_ended(x, y)?;
			}
			PressMode::Panning { .. } => {
				self.suppress_click = true;
				self.canvas_zoom_ended();
			}
		}
		Ok(())
	}

	/// The pointer left mid-gesture: end it where it last was.
	fn finish_gesture_outside(&mut self) -> Result<(), GraphError> {
		let last = self
			.hover_position
			.map(|p| self.transform.apply(p))
			.or_else(|| self.press.as_ref().map(|p| p.start));
		match last {
			Some(p) => self.finish_gesture(p.x, p.y),
			None => Ok(()),
		}
	}

	fn set_press_mode(&mut self, mode: PressMode) {
		if let Some(press) = self.press.as_mut() {
			press.mode = mode;
		}
	}

	fn pan_to(&mut self, x: f64, y: f64, start: Point, origin_x: f64, origin_y: f64) {
		let transform = ViewTransform {
			x: origin_x + (x - start.x),
			y: origin_y + (y - start.y),
			k: self.transform.k,
		};
		self.canvas_zoomed(x, y, transform);
	}

	fn wheel_zoom(&mut self, x: f64, y: f64, delta_y: f64, time_ms: f64) {
		let zoom = &self.view.config().zoom;
		let factor = if delta_y < 0.0 {
			zoom.wheel_factor
		} else if delta_y > 0.0 {
			1.0 / zoom.wheel_factor
		} else {
			return;
		};
		let k = (self.transform.k * factor).clamp(zoom.min_k, zoom.max_k);
		let anchor = self.transform.invert(x, y);
		let transform = ViewTransform {
			x: x - anchor.x * k,
			y: y - anchor.y * k,
			k,
		};
		self.last_wheel_ms = Some(time_ms);
		self.canvas_zoomed(x, y, transform);
	}

	// ========================================================================
	// Canvas events
	// ========================================================================

	/// Hit-test a screen point. Behaviors may claim the point first.
	fn entity_at_screen(&self, x: f64, y: f64) -> Result<Option<GraphEntity>, GraphError> {
		let p = self.transform.invert(x, y);
		if let Some(entity) = self.behaviors.entity_at(&self.view, p.x, p.y, self.transform.k) {
			return Ok(Some(entity));
		}
		self.view.get_entity_at_position(p.x, p.y)
	}

	fn pointer_event(&self, x: f64, y: f64) -> Result<PointerEvent, GraphError> {
		let p = self.transform.invert(x, y);
		Ok(PointerEvent {
			x: p.x,
			y: p.y,
			k: self.transform.k,
			entity: self.entity_at_screen(x, y)?,
		})
	}

	/// A pointer event at a screen point about a known subject.
	fn subject_event(&self, x: f64, y: f64, entity: Option<GraphEntity>) -> PointerEvent {
		let p = self.transform.invert(x, y);
		PointerEvent {
			x: p.x,
			y: p.y,
			k: self.transform.k,
			entity,
		}
	}

	fn dispatch(
		&mut self,
		mut handler: impl FnMut(&mut dyn CanvasBehavior, &mut GraphView, &mut InteractionState) -> Handled,
	) -> Result<bool, GraphError> {
		let view = &mut self.view;
		let interaction = &mut self.interaction;
		let result = self.behaviors.apply(|b| handler(b, view, interaction))?;
		Ok(result == BehaviorResult::Stop)
	}

	/// Select what was clicked, or clear the selection on empty space.
	pub fn canvas_clicked(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let event = self.pointer_event(x, y)?;
		if self.dispatch(|b, view, state| b.click(view, state, &event))? {
			return Ok(());
		}
		self.view.select(event.entity.into_iter().collect());
		Ok(())
	}

	pub fn canvas_double_clicked(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let event = self.pointer_event(x, y)?;
		self.dispatch(|b, view, state| b.double_click(view, state, &event))?;
		Ok(())
	}

	pub fn canvas_mouse_down(&mut self) {
		self.mouse_down = true;
	}

	pub fn canvas_mouse_moved(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let event = self.pointer_event(x, y)?;
		self.view.set_highlighted(event.entity.clone());
		let position = Point::new(event.x, event.y);
		self.hover_position = Some(position);

		if !self.dispatch(|b, view, state| b.mouse_move(view, state, &event))? && self.mouse_down {
			self.touch_position = Some(TouchPosition {
				position,
				entity: None,
			});
			self.view.request_render();
		}
		self.update_cursor();
		Ok(())
	}

	pub fn canvas_mouse_leave(&mut self) {
		self.hover_position = None;
		self.view.set_highlighted(None);
		self.update_cursor();
	}

	pub fn canvas_mouse_up(&mut self) {
		self.mouse_down = false;
		if self.touch_position.take().is_some() {
			self.view.request_render();
		}
	}

	/// Start dragging `subject`. `x`/`y` is the screen point where the press began.
	pub fn canvas_drag_started(
		&mut self,
		x: f64,
		y: f64,
		subject: GraphEntity,
	) -> Result<(), GraphError> {
		let event = self.subject_event(x, y, Some(subject.clone()));
		if self.dispatch(|b, view, state| b.drag_start(view, state, &event))? {
			return Ok(());
		}
		let p = Point::new(event.x, event.y);

		self.drag_origin = None;
		if let Some((nx, ny)) = subject.node_hash().and_then(|h| self.view.node_position(h)) {
			self.drag_offset = (nx - p.x, ny - p.y);
			self.drag_origin = Some((nx, ny));
		}
		self.dragged = Some(subject.clone());
		self.view.select(vec![subject.clone()]);
		self.touch_position = Some(TouchPosition {
			position: p,
			entity: Some(subject),
		});
		self.update_cursor();
		Ok(())
	}

	/// Move the dragged node under the pointer. Nodes stay put while an edge is
	/// being drawn. Behaviors see the drag even when one of them took over its
	/// start, such as a resize handle.
	pub fn canvas_dragged(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let event = self.subject_event(x, y, self.dragged.clone());
		if self.dispatch(|b, view, state| b.drag(view, state, &event))? {
			return Ok(());
		}
		let Some(subject) = self.dragged.clone() else {
			return Ok(());
		};
		let p = Point::new(event.x, event.y);

		if self.interaction.edge_creation.is_none() {
			if let Some(hash) = subject.node_hash() {
				let (nx, ny) = (p.x + self.drag_offset.0, p.y + self.drag_offset.1);
				self.view.update_node_position(hash, nx, ny)?;
				self.view.set_position_override(hash, nx, ny);
			}
		}
		self.touch_position = Some(TouchPosition {
			position: p,
			entity: Some(subject),
		});
		self.view.request_render();
		Ok(())
	}

	/// Finish a drag. A node that actually moved is recorded as one undoable move.
	pub fn canvas_drag_ended(&mut self, x: f64, y: f64) -> Result<(), GraphError> {
		let dragged = self.dragged.take();
		let origin = self.drag_origin.take();
		let event = self.subject_event(x, y, dragged.clone());
		let stopped = self.dispatch(|b, view, state| b.drag_end(view, state, &event))?;

		self.view.clear_position_overrides();
		self.mouse_down = false;
		self.touch_position = None;
		self.view.request_render();
		self.update_cursor();

		if stopped {
			return Ok(());
		}
		let Some(hash) = dragged.as_ref().and_then(GraphEntity::node_hash) else {
			return Ok(());
		};
		if let (Some(from), Some(to)) = (origin, self.view.node_position(hash)) {
			if from != to {
				self.view.execute(Box::new(NodeMove::new(hash, from, to)))?;
			}
		}
		Ok(())
	}

	/// Apply a pan or zoom. `x`/`y` is the screen point driving it.
	pub fn canvas_zoomed(&mut self, x: f64, y: f64, transform: ViewTransform) {
		self.transform = transform;
		self.panning_or_zooming = true;
		self.touch_position = Some(TouchPosition {
			position: transform.invert(x, y),
			entity: None,
		});
		self.view.request_render();
		self.update_cursor();
	}

	pub fn canvas_zoom_ended(&mut self) {
		self.panning_or_zooming = false;
		self.touch_position = None;
		self.mouse_down = false;
		self.view.request_render();
		self.update_cursor();
	}

	/// Behaviors see the key first. Unhandled: Delete/Backspace removes the
	/// selection, Ctrl+Z undoes, Ctrl+Y or Ctrl+Shift+Z redoes.
	pub fn canvas_key_down(&mut self, key: &str, ctrl: bool) -> Result<(), GraphError> {
		let press = KeyPress { key, ctrl };
		if self.dispatch(|b, view, state| b.key_down(view, state, press))? {
			return Ok(());
		}
		match (key, ctrl) {
			("Delete" | "Backspace", false) => {
				self.delete_selection()?;
			}
			("z", true) => {
				self.view.undo()?;
			}
			("y" | "Z", true) => {
				self.view.redo()?;
			}
			_ => {}
		}
		Ok(())
	}

	/// Paste at the pointer. `text` is the system clipboard's plain text; without
	/// it the last in-app copy is used. Returns whether anything was pasted.
	pub fn canvas_paste(&mut self, text: Option<String>) -> Result<bool, GraphError> {
		let event = PasteEvent {
			text,
			position: self.hover_position,
		};
		self.dispatch(|b, view, state| b.paste(view, state, &event))
	}

	/// Delete every selected entity as one undoable action. Returns `false` when
	/// nothing is selected.
	pub fn delete_selection(&mut self) -> Result<bool, GraphError> {
		let selection = self.view.selection().to_vec();
		if selection.is_empty() {
			return Ok(false);
		}
		// Edges go first; node deletions cascade whatever edges remain.
		let mut actions: Vec<Box<dyn GraphAction>> = Vec::new();
		for entity in &selection {
			if let GraphEntity::Edge(edge) = entity {
				actions.push(Box::new(EdgeDeletion::new(edge.clone())));
			}
		}
		for entity in &selection {
			if let GraphEntity::Node(hash) = entity {
				actions.push(Box::new(NodeDeletion::new(hash.clone())));
			}
		}
		let description = format!("Delete {} item(s)", actions.len());
		self.view
			.execute(Box::new(CompoundAction::new(description, actions)))?;
		Ok(true)
	}

	/// Supply the label for the pending edge and create it. `None` means the
	/// prompt was dismissed and drops the edge; blank text yields an unlabelled
	/// edge. Returns whether an edge was created.
	pub fn resolve_edge_label(&mut self, label: Option<String>) -> Result<bool, GraphError> {
		let Some(pending) = self.interaction.pending_edge.take() else {
			return Ok(false);
		};
		self.view.request_render();
		let Some(label) = label else {
			debug!("edge {} -> {} dropped", pending.from, pending.to);
			return Ok(false);
		};
		let label = label.trim();
		let edge = Edge {
			label: (!label.is_empty()).then(|| label.to_string()),
			..Edge::new(pending.from, pending.to, None)
		};
		self.view.execute(Box::new(EdgeCreation::new(edge)))?;
		Ok(true)
	}

	// ========================================================================
	// Viewport
	// ========================================================================

	/// Center the graph and scale it down (never up) so every node fits.
	pub fn zoom_to_fit(&mut self, padding: f64) {
		let (w, h) = (self.width, self.height);
		self.transform = match self.view.bounding_box(self.view.nodes(), padding) {
			None => ViewTransform {
				x: w / 2.0,
				y: h / 2.0,
				k: 1.0,
			},
			Some(b) => {
				let (bw, bh) = (b.width(), b.height());
				let k = 1f64.min((w / bw).min(h / bh));
				ViewTransform {
					x: w / 2.0 - k * (b.min_x + bw / 2.0),
					y: h / 2.0 - k * (b.min_y + bh / 2.0),
					k,
				}
			}
		};
		self.last_fit_ms = Some(self.now_ms);
		self.view.request_render();
	}

	/// Resize the canvas. Shortly after a zoom-to-fit the fit is re-applied.
	pub fn set_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let window = self.view.config().zoom.refit_window_ms;
		if self
			.last_fit_ms
			.is_some_and(|at| self.now_ms - at <= window)
		{
			self.zoom_to_fit(self.view.config().zoom.fit_padding);
		}
		self.view.request_render();
	}

	// ========================================================================
	// Frame loop
	// ========================================================================

	/// Per-frame work: advance the layout, end an idle wheel zoom and draw if
	/// anything asked for it. Returns whether a frame was drawn.
	pub fn animation_frame_fired(&mut self, now_ms: f64) -> Result<bool, GraphError> {
		self.now_ms = now_ms;
		self.sync_selection()?;
		if let Some(last) = self.last_wheel_ms {
			if now_ms - last >= self.view.config().zoom.zoom_end_delay_ms {
				self.last_wheel_ms = None;
				self.canvas_zoom_ended();
			}
		}
		if self.view.automatic_layout_enabled() {
			self.view.tick_layout()?;
		}
		if self.ctx.take_pending_redraw() {
			self.view.request_render();
		}
		if self.view.take_render_request() {
			self.render()?;
			return Ok(true);
		}
		Ok(false)
	}

	/// Draw one frame now.
	pub fn render(&mut self) -> Result<(), GraphError> {
		let scene = Scene {
			view: &self.view,
			transform: self.transform,
			width: self.width,
			height: self.height,
			touch_position: self.touch_position.as_ref(),
			interaction: &self.interaction,
			behaviors: &self.behaviors,
		};
		render::render(&scene, &mut self.ctx)?;
		self.update_cursor();
		Ok(())
	}

	fn update_cursor(&mut self) {
		let cursor = if self.dragged.is_some() {
			Cursor::Grabbing
		} else if self.panning_or_zooming {
			Cursor::Move
		} else if self.view.highlighted().is_some() {
			Cursor::Grab
		} else {
			Cursor::Default
		};
		self.cursor = cursor;
	}
}
