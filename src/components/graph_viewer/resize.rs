//! Resize handles for the selected node.
//!
//! [`ActiveNodeResize`] is installed by the canvas view whenever exactly one
//! resizable node is selected and uninstalls itself as soon as the selection
//! changes. Boxes get handles on the left, right and bottom sides; images also get
//! four corner handles that scale both dimensions while keeping the aspect ratio.
//! The top side has none so the node stays easy to grab.

use log::debug;

use super::behaviors::{BehaviorResult, CanvasBehavior, Handled, InteractionState, PointerEvent};
use super::canvas::DrawingContext;
use super::geometry::{BoundingBox, Point};
use super::history::NodeResize;
use super::placed::PlacedNode;
use super::scale::ScaledValues;
use super::types::GraphEntity;
use super::view::{GraphView, NodeGeometry};

/// One grip around the node's bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
	Right,
	Left,
	Bottom,
	TopLeft,
	BottomLeft,
	BottomRight,
	TopRight,
}

impl Handle {
	const SIDES: [Handle; 3] = [Handle::Right, Handle::Left, Handle::Bottom];
	const CORNERS: [Handle; 4] = [
		Handle::TopLeft,
		Handle::BottomLeft,
		Handle::BottomRight,
		Handle::TopRight,
	];

	pub fn is_corner(self) -> bool {
		!Self::SIDES.contains(&self)
	}

	/// Center of the handle on a node's bounding box.
	fn anchor(self, b: &BoundingBox) -> Point {
		let c = b.center();
		match self {
			Handle::Right => Point::new(b.max_x, c.y),
			Handle::Left => Point::new(b.min_x, c.y),
			Handle::Bottom => Point::new(c.x, b.max_y),
			Handle::TopLeft => Point::new(b.min_x, b.min_y),
			Handle::BottomLeft => Point::new(b.min_x, b.max_y),
			Handle::BottomRight => Point::new(b.max_x, b.max_y),
			Handle::TopRight => Point::new(b.max_x, b.min_y),
		}
	}

	/// Geometry after dragging this handle from `start` to `pointer`.
	///
	/// Side handles move one edge and keep the opposite one where it was. Corner
	/// handles keep the center and aspect ratio and size the node so the corner
	/// follows the pointer's distance from the center.
	fn resize(self, origin: NodeGeometry, start: Point, pointer: Point, handle_size: f64) -> NodeGeometry {
		let dx = pointer.x - start.x;
		let dy = pointer.y - start.y;
		match self {
			Handle::Right => NodeGeometry {
				x: origin.x + dx / 2.0,
				width: (origin.width + dx).abs(),
				..origin
			},
			Handle::Left => NodeGeometry {
				x: origin.x + dx / 2.0,
				width: (origin.width - dx).abs(),
				..origin
			},
			Handle::Bottom => NodeGeometry {
				y: origin.y + dy / 2.0,
				height: (origin.height + dy).abs(),
				..origin
			},
			_ => {
				if origin.height <= 0.0 {
					return origin;
				}
				let ratio = origin.width / origin.height;
				let diagonal = std::f64::consts::SQRT_2 * handle_size;
				let reach = (pointer.x - origin.x).hypot(pointer.y - origin.y) - diagonal / 2.0;
				let half_height = (reach / (ratio * ratio + 1.0).sqrt()).abs();
				NodeGeometry {
					width: 2.0 * half_height * ratio,
					height: 2.0 * half_height,
					..origin
				}
			}
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
	handle: Handle,
	origin: NodeGeometry,
	start: Point,
}

/// Handles for one node, active while that node is the whole selection.
#[derive(Clone, Debug)]
pub struct ActiveNodeResize {
	target: String,
	/// Corner handles with a locked aspect ratio.
	uniform: bool,
	active: Option<ActiveDrag>,
}

impl ActiveNodeResize {
	pub const KEY: &'static str = "handle-resizable/active";
	pub const PRIORITY: i32 = 100;

	/// Handles for a node, if its shape can be resized. Icon nodes size
	/// themselves from their glyph and label and get none.
	pub fn for_node(view: &GraphView, hash: &str) -> Option<Self> {
		let node = view.get_node_by_hash(hash)?;
		let uniform = match view.place_node(node) {
			PlacedNode::Rectangle(_) => false,
			PlacedNode::Image(_) => true,
			PlacedNode::Icon(_) => return None,
		};
		Some(Self {
			target: hash.to_string(),
			uniform,
			active: None,
		})
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn is_resizing(&self) -> bool {
		self.active.is_some()
	}

	/// Handle boxes in graph coordinates at zoom `k`.
	pub fn handles(&self, view: &GraphView, k: f64) -> Vec<(Handle, BoundingBox)> {
		let Some(node) = view.get_node_by_hash(&self.target) else {
			return Vec::new();
		};
		let size = handle_size(view, k);
		let bbox = view.place_node(node).bounding_box();
		let corners: &[Handle] = if self.uniform { &Handle::CORNERS } else { &[] };
		Handle::SIDES
			.iter()
			.chain(corners)
			.map(|&h| {
				let at = h.anchor(&bbox);
				(h, BoundingBox::centered(at.x, at.y, size, size))
			})
			.collect()
	}

	fn handle_at(&self, view: &GraphView, x: f64, y: f64, k: f64) -> Option<Handle> {
		self.handles(view, k)
			.into_iter()
			.find(|(_, b)| b.contains(x, y))
			.map(|(h, _)| h)
	}

	fn is_current(&self, view: &GraphView) -> bool {
		matches!(view.selection(), [GraphEntity::Node(hash)] if *hash == self.target)
	}
}

fn handle_size(view: &GraphView, k: f64) -> f64 {
	ScaledValues::new(&view.config().scale, k).handle_size
}

impl CanvasBehavior for ActiveNodeResize {
	fn selection_changed(&mut self, view: &mut GraphView, _state: &mut InteractionState) -> Handled {
		if self.is_current(view) {
			Ok(BehaviorResult::Continue)
		} else {
			view.request_render();
			Ok(BehaviorResult::RemoveAndContinue)
		}
	}

	fn entity_at(&self, view: &GraphView, x: f64, y: f64, k: f64) -> Option<GraphEntity> {
		if self.active.is_some() || self.handle_at(view, x, y, k).is_some() {
			Some(GraphEntity::Node(self.target.clone()))
		} else {
			None
		}
	}

	fn drag_start(
		&mut self,
		view: &mut GraphView,
		_state: &mut InteractionState,
		event: &PointerEvent,
	) -> Handled {
		let Some(handle) = self.handle_at(view, event.x, event.y, event.k) else {
			return Ok(BehaviorResult::Continue);
		};
		let Some(origin) = view.node_geometry(&self.target) else {
			return Ok(BehaviorResult::Continue);
		};
		debug!("resizing {} from {:?}", self.target, handle);
		self.active = Some(ActiveDrag {
			handle,
			origin,
			start: Point::new(event.x, event.y),
		});
		Ok(BehaviorResult::Stop)
	}

	fn drag(&mut self, view: &mut GraphView, _state: &mut InteractionState, event: &PointerEvent) -> Handled {
		let Some(active) = self.active else {
			return Ok(BehaviorResult::Continue);
		};
		let size = handle_size(view, event.k);
		let geometry = active.handle.resize(
			active.origin,
			active.start,
			Point::new(event.x, event.y),
			size,
		);
		view.set_node_geometry(&self.target, geometry)?;
		Ok(BehaviorResult::Stop)
	}

	fn drag_end(
		&mut self,
		view: &mut GraphView,
		_state: &mut InteractionState,
		_event: &PointerEvent,
	) -> Handled {
		let Some(active) = self.active.take() else {
			return Ok(BehaviorResult::Continue);
		};
		if let Some(current) = view.node_geometry(&self.target) {
			if current.width != active.origin.width || current.height != active.origin.height {
				view.execute(Box::new(NodeResize::new(&self.target, active.origin, current)))?;
			}
		}
		view.request_render();
		Ok(BehaviorResult::Stop)
	}

	fn draw_foreground(
		&self,
		view: &GraphView,
		_state: &InteractionState,
		ctx: &mut dyn DrawingContext,
		scale: &ScaledValues,
	) {
		let theme = view.theme();
		if let Some(active) = &self.active {
			let o = active.origin;
			ctx.begin_path();
			ctx.set_line_width(scale.node_border_width);
			ctx.set_line_dash(&[4.0 / scale.k, 4.0 / scale.k]);
			ctx.set_stroke_style(&theme.border.faded(0.5).to_css());
			ctx.rect(o.x - o.width / 2.0, o.y - o.height / 2.0, o.width, o.height);
			ctx.stroke();
			ctx.set_line_dash(&[]);
		}
		for (handle, b) in self.handles(view, scale.k) {
			let color = if handle.is_corner() {
				theme.border.tinted(0.4)
			} else {
				theme.border
			};
			ctx.set_fill_style(&color.to_css());
			ctx.fill_rect(b.min_x, b.min_y, b.width(), b.height());
		}
	}
}
