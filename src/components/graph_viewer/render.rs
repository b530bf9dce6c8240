//! Canvas rendering for the graph view.
//!
//! One frame is drawn in fixed passes so later layers sit on top:
//! 1. Background (screen space)
//! 2. Touch indicator, then the hover backdrop when nothing is pressed
//! 3. Layout groups, then behavior overlays such as the edge being drawn
//! 4. Edge lines, then edge labels
//! 5. Nodes, in list order
//! 6. Behavior foregrounds such as resize handles

use super::behaviors::{BehaviorList, InteractionState};
use super::canvas::DrawingContext;
use super::canvas_view::{TouchPosition, ViewTransform};
use super::error::GraphError;
use super::scale::ScaledValues;
use super::types::GraphEntity;
use super::view::GraphView;

/// Everything one frame needs, borrowed from the canvas view.
pub struct Scene<'a> {
	pub view: &'a GraphView,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	pub touch_position: Option<&'a TouchPosition>,
	pub interaction: &'a InteractionState,
	pub behaviors: &'a BehaviorList,
}

/// Renders the complete graph. Edges are placed before anything is drawn, so a
/// dangling edge fails the frame without leaving it half painted.
pub fn render(scene: &Scene<'_>, ctx: &mut dyn DrawingContext) -> Result<(), GraphError> {
	let view = scene.view;
	let scale = ScaledValues::new(&view.config().scale, scene.transform.k);
	let edges = view
		.edges()
		.iter()
		.map(|edge| view.place_edge(edge))
		.collect::<Result<Vec<_>, _>>()?;

	ctx.save();
	draw_background(scene, ctx);

	ctx.translate(scene.transform.x, scene.transform.y);
	ctx.scale(scene.transform.k);

	match scene.touch_position {
		Some(touch) => draw_touch_indicator(view, touch, ctx, &scale),
		None => draw_highlight_backdrop(view, ctx, &scale),
	}

	for group in view.place_groups() {
		group.render(ctx);
	}
	scene.behaviors.draw(view, scene.interaction, ctx, &scale);

	for edge in &edges {
		ctx.begin_path();
		edge.render(ctx);
	}
	for edge in &edges {
		edge.render_label(ctx, &scale);
	}

	for node in view.nodes() {
		view.place_node(node).render(ctx, &scale);
	}
	scene.behaviors.draw_foreground(view, scene.interaction, ctx, &scale);

	ctx.restore();
	Ok(())
}

fn draw_background(scene: &Scene<'_>, ctx: &mut dyn DrawingContext) {
	match scene.view.theme().background {
		Some(color) => {
			ctx.set_fill_style(&color.to_css());
			ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
		}
		None => ctx.clear_rect(0.0, 0.0, scene.width, scene.height),
	}
}

/// Shade the pressed node, or mark the pressed point on empty space.
fn draw_touch_indicator(
	view: &GraphView,
	touch: &TouchPosition,
	ctx: &mut dyn DrawingContext,
	scale: &ScaledValues,
) {
	ctx.set_fill_style(&view.theme().backdrop.to_css());
	let node = touch
		.entity
		.as_ref()
		.and_then(GraphEntity::node_hash)
		.and_then(|hash| view.get_node_by_hash(hash));

	ctx.begin_path();
	match node {
		Some(node) => {
			let Some(b) = view.bounding_box(std::slice::from_ref(node), scale.backdrop_padding) else {
				return;
			};
			ctx.rect(b.min_x, b.min_y, b.width(), b.height());
		}
		None => ctx.circle(touch.position.x, touch.position.y, scale.touch_radius),
	}
	ctx.fill();
}

fn draw_highlight_backdrop(view: &GraphView, ctx: &mut dyn DrawingContext, scale: &ScaledValues) {
	let Some(node) = view
		.highlighted()
		.and_then(GraphEntity::node_hash)
		.and_then(|hash| view.get_node_by_hash(hash))
	else {
		return;
	};
	let Some(b) = view.bounding_box(std::slice::from_ref(node), scale.backdrop_padding) else {
		return;
	};
	ctx.begin_path();
	ctx.set_fill_style(&view.theme().backdrop.to_css());
	ctx.rect(b.min_x, b.min_y, b.width(), b.height());
	ctx.fill();
}
