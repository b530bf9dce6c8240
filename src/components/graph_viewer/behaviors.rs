//! Pluggable input behaviors.
//!
//! A [`BehaviorList`] offers each input event to its behaviors from the highest
//! priority down. Each handler decides whether the event keeps travelling and
//! whether the behavior stays installed. The canvas view only runs its own default
//! handling when no behavior stopped the event.
//!
//! Behaviors may come and go at runtime: the resize handles are installed when a
//! single resizable node is selected and remove themselves once the selection
//! moves on.

use log::debug;

use super::canvas::DrawingContext;
use super::clipboard::ClipboardShortcut;
use super::error::GraphError;
use super::geometry::Point;
use super::scale::ScaledValues;
use super::terminators::LineTerminator;
use super::types::GraphEntity;
use super::view::GraphView;

/// Outcome of offering an event to one behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BehaviorResult {
	/// Offer the event to the next behavior.
	Continue,
	/// Swallow the event.
	Stop,
	/// Uninstall this behavior, then offer the event to the next one.
	RemoveAndContinue,
	/// Uninstall this behavior and swallow the event.
	RemoveAndStop,
}

/// A pointer event in graph coordinates, with the entity under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
	pub x: f64,
	pub y: f64,
	/// Zoom level at the time of the event.
	pub k: f64,
	pub entity: Option<GraphEntity>,
}

impl PointerEvent {
	pub fn node_hash(&self) -> Option<&str> {
		self.entity.as_ref().and_then(GraphEntity::node_hash)
	}
}

/// A key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress<'a> {
	pub key: &'a str,
	/// Control or Meta held.
	pub ctrl: bool,
}

/// A paste request.
#[derive(Clone, Debug, PartialEq)]
pub struct PasteEvent {
	/// Plain text from the system clipboard, when the platform handed any over.
	pub text: Option<String>,
	/// Pointer position in graph coordinates.
	pub position: Option<Point>,
}

/// An edge being drawn by the user: the origin node and, once the pointer has
/// moved, the free end.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeCreationState {
	pub from: String,
	pub to: Option<Point>,
}

/// An edge whose endpoints are chosen and which now waits for its label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEdge {
	pub from: String,
	pub to: String,
}

/// Interaction state shared by the canvas view and its behaviors.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	pub edge_creation: Option<EdgeCreationState>,
	pub pending_edge: Option<PendingEdge>,
	/// Last copied selection, serialized. Also serves as the paste source when
	/// the system clipboard is unavailable.
	pub clipboard: Option<String>,
}

/// What a behavior handler returns.
pub type Handled = Result<BehaviorResult, GraphError>;

/// An input strategy layered over the canvas view. Every handler defaults to
/// [`BehaviorResult::Continue`].
#[allow(unused_variables)]
pub trait CanvasBehavior {
	/// Called once when installed.
	fn setup(&mut self) {}

	/// Called once when uninstalled.
	fn destroy(&mut self) {}

	fn key_down(&mut self, view: &mut GraphView, state: &mut InteractionState, key: KeyPress<'_>) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	/// The selection differs from what it was when behaviors last saw it.
	fn selection_changed(&mut self, view: &mut GraphView, state: &mut InteractionState) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	fn paste(&mut self, view: &mut GraphView, state: &mut InteractionState, event: &PasteEvent) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	/// Claim a graph point ahead of regular hit testing, e.g. a handle drawn
	/// outside its node.
	fn entity_at(&self, view: &GraphView, x: f64, y: f64, k: f64) -> Option<GraphEntity> {
		None
	}

	fn click(&mut self, view: &mut GraphView, state: &mut InteractionState, event: &PointerEvent) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	fn double_click(
		&mut self,
		view: &mut GraphView,
		state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	fn mouse_move(
		&mut self,
		view: &mut GraphView,
		state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	fn drag_start(
		&mut self,
		view: &mut GraphView,
		state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	fn drag(&mut self, view: &mut GraphView, state: &mut InteractionState, event: &PointerEvent) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	fn drag_end(
		&mut self,
		view: &mut GraphView,
		state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		Ok(BehaviorResult::Continue)
	}

	/// Overlay drawn in graph space, after groups and before edges.
	fn draw(
		&self,
		view: &GraphView,
		state: &InteractionState,
		ctx: &mut dyn DrawingContext,
		scale: &ScaledValues,
	) {
	}

	/// Overlay drawn in graph space on top of the nodes.
	fn draw_foreground(
		&self,
		view: &GraphView,
		state: &InteractionState,
		ctx: &mut dyn DrawingContext,
		scale: &ScaledValues,
	) {
	}
}

struct BehaviorEntry {
	key: String,
	priority: i32,
	behavior: Box<dyn CanvasBehavior>,
}

/// Behaviors ordered by priority, higher first. Equal priorities keep their
/// installation order.
#[derive(Default)]
pub struct BehaviorList {
	entries: Vec<BehaviorEntry>,
}

impl BehaviorList {
	/// A list with the built-in behaviors installed.
	pub fn standard() -> Self {
		let mut list = Self::default();
		list.install(
			InteractiveEdgeCreation::KEY.to_string(),
			Box::new(InteractiveEdgeCreation),
			InteractiveEdgeCreation::PRIORITY,
		);
		list.install(
			ClipboardShortcut::KEY.to_string(),
			Box::new(ClipboardShortcut::default()),
			ClipboardShortcut::PRIORITY,
		);
		list
	}

	pub fn add(
		&mut self,
		key: impl Into<String>,
		behavior: Box<dyn CanvasBehavior>,
		priority: i32,
	) -> Result<(), GraphError> {
		let key = key.into();
		if self.contains(&key) {
			return Err(GraphError::DuplicateBehavior { key });
		}
		self.install(key, behavior, priority);
		Ok(())
	}

	fn install(&mut self, key: String, mut behavior: Box<dyn CanvasBehavior>, priority: i32) {
		let at = self
			.entries
			.iter()
			.position(|e| e.priority < priority)
			.unwrap_or(self.entries.len());
		behavior.setup();
		self.entries.insert(
			at,
			BehaviorEntry {
				key,
				priority,
				behavior,
			},
		);
	}

	/// Uninstall a behavior. Returns whether it was installed.
	pub fn delete(&mut self, key: &str) -> bool {
		let Some(at) = self.entries.iter().position(|e| e.key == key) else {
			return false;
		};
		let mut entry = self.entries.remove(at);
		entry.behavior.destroy();
		true
	}

	pub fn contains(&self, key: &str) -> bool {
		self.entries.iter().any(|e| e.key == key)
	}

	/// Installed keys, in dispatch order.
	pub fn keys(&self) -> Vec<&str> {
		self.entries.iter().map(|e| e.key.as_str()).collect()
	}

	/// Offer an event to every behavior in order. Returns [`BehaviorResult::Stop`]
	/// if some behavior swallowed it, else [`BehaviorResult::Continue`].
	pub fn apply(
		&mut self,
		mut handler: impl FnMut(&mut dyn CanvasBehavior) -> Handled,
	) -> Handled {
		let mut i = 0;
		while i < self.entries.len() {
			let result = handler(self.entries[i].behavior.as_mut())?;
			match result {
				BehaviorResult::Continue => i += 1,
				BehaviorResult::Stop => return Ok(BehaviorResult::Stop),
				BehaviorResult::RemoveAndContinue => {
					self.remove_at(i);
				}
				BehaviorResult::RemoveAndStop => {
					self.remove_at(i);
					return Ok(BehaviorResult::Stop);
				}
			}
		}
		Ok(BehaviorResult::Continue)
	}

	/// The first entity a behavior claims at a graph point, in dispatch order.
	pub fn entity_at(&self, view: &GraphView, x: f64, y: f64, k: f64) -> Option<GraphEntity> {
		self.entries
			.iter()
			.find_map(|e| e.behavior.entity_at(view, x, y, k))
	}

	/// Let every behavior draw its overlay, lowest priority first so higher
	/// priorities end up on top.
	pub fn draw(
		&self,
		view: &GraphView,
		state: &InteractionState,
		ctx: &mut dyn DrawingContext,
		scale: &ScaledValues,
	) {
		for entry in self.entries.iter().rev() {
			entry.behavior.draw(view, state, ctx, scale);
		}
	}

	/// Like [`BehaviorList::draw`], for the layer above the nodes.
	pub fn draw_foreground(
		&self,
		view: &GraphView,
		state: &InteractionState,
		ctx: &mut dyn DrawingContext,
		scale: &ScaledValues,
	) {
		for entry in self.entries.iter().rev() {
			entry.behavior.draw_foreground(view, state, ctx, scale);
		}
	}

	fn remove_at(&mut self, i: usize) {
		let mut entry = self.entries.remove(i);
		debug!("behavior '{}' removed itself", entry.key);
		entry.behavior.destroy();
	}
}

/// Double-click a node, then click another node to connect them.
///
/// Clicking empty space or the origin node, or pressing Escape, cancels. A
/// committed edge is parked as a [`PendingEdge`] until its label is supplied.
#[derive(Clone, Debug, Default)]
pub struct InteractiveEdgeCreation;

impl InteractiveEdgeCreation {
	pub const KEY: &'static str = "interactive-edge-creation";
	pub const PRIORITY: i32 = 100;
}

impl CanvasBehavior for InteractiveEdgeCreation {
	fn key_down(&mut self, view: &mut GraphView, state: &mut InteractionState, key: KeyPress<'_>) -> Handled {
		if key.key == "Escape" && state.edge_creation.take().is_some() {
			debug!("edge creation cancelled");
			view.request_render();
			return Ok(BehaviorResult::Stop);
		}
		Ok(BehaviorResult::Continue)
	}

	fn click(&mut self, view: &mut GraphView, state: &mut InteractionState, event: &PointerEvent) -> Handled {
		let Some(creation) = state.edge_creation.take() else {
			return Ok(BehaviorResult::Continue);
		};
		match event.node_hash() {
			Some(to) if to != creation.from => {
				state.pending_edge = Some(PendingEdge {
					from: creation.from,
					to: to.to_string(),
				});
			}
			_ => debug!("edge creation cancelled"),
		}
		view.request_render();
		Ok(BehaviorResult::Stop)
	}

	fn double_click(
		&mut self,
		view: &mut GraphView,
		state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		if state.edge_creation.is_some() || state.pending_edge.is_some() {
			return Ok(BehaviorResult::Continue);
		}
		let Some(from) = event.node_hash() else {
			return Ok(BehaviorResult::Continue);
		};
		state.edge_creation = Some(EdgeCreationState {
			from: from.to_string(),
			to: None,
		});
		view.request_render();
		Ok(BehaviorResult::Stop)
	}

	fn mouse_move(
		&mut self,
		view: &mut GraphView,
		state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		if let Some(creation) = state.edge_creation.as_mut() {
			creation.to = Some(Point::new(event.x, event.y));
			view.request_render();
		}
		Ok(BehaviorResult::Continue)
	}

	fn draw(
		&self,
		view: &GraphView,
		state: &InteractionState,
		ctx: &mut dyn DrawingContext,
		scale: &ScaledValues,
	) {
		let Some(EdgeCreationState { from, to: Some(to) }) = &state.edge_creation else {
			return;
		};
		let Some(node) = view.get_node_by_hash(from) else {
			return;
		};
		let theme = view.theme();
		let color = theme.creation_line.to_css();
		let start = Point::new(node.data.x, node.data.y);

		ctx.set_line_width(scale.creation_line_width);
		let line_end =
			LineTerminator::arrow(scale.creation_arrow_size).draw(ctx, start, *to, &color);

		ctx.begin_path();
		ctx.set_line_width(scale.creation_line_width);
		ctx.set_stroke_style(&color);
		ctx.move_to(start.x, start.y);
		ctx.line_to(line_end.x, line_end.y);
		ctx.stroke();

		ctx.begin_path();
		ctx.circle(to.x, to.y, scale.creation_node_radius);
		ctx.stroke();
		ctx.set_fill_style(&theme.creation_node_fill.to_css());
		ctx.fill();
	}
}
