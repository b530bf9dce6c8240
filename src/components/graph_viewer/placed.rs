//! Placed shapes: nodes, edges and groups after style and position have been
//! resolved into something drawable.
//!
//! Every placed object carries the colors and fonts it was placed with, so it can
//! answer geometry queries and render itself without looking anything up again.

use super::canvas::{DrawingContext, TextMetrics};
use super::geometry::{BoundingBox, Point, point_on_rect, point_segment_distance};
use super::scale::ScaledValues;
use super::terminators::LineTerminator;

/// Corner radius of rectangle nodes.
const CORNER_RADIUS: f64 = 5.0;
/// Maximum distance (graph units) from an edge line that still counts as a hit.
pub const EDGE_HIT_DISTANCE: f64 = 2.0;

/// Selection state a shape was placed with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementOptions {
	pub selected: bool,
	pub highlighted: bool,
}

/// A text run with its font and measured extent.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
	pub text: String,
	pub font: String,
	pub metrics: TextMetrics,
}

/// A node drawn as a rounded box with its name inside.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedRectangle {
	pub bbox: BoundingBox,
	pub label: PlacedText,
	pub text_color: String,
	pub fill: String,
	pub border: String,
	pub low_detail_fill: String,
	pub options: PlacementOptions,
}

impl PlacedRectangle {
	fn render(&self, ctx: &mut dyn DrawingContext, scale: &ScaledValues) {
		let b = &self.bbox;
		ctx.begin_path();
		ctx.set_line_width(if self.options.highlighted {
			scale.node_border_width_highlighted
		} else {
			scale.node_border_width
		});
		ctx.set_fill_style(&self.fill);
		ctx.rounded_rect(b.min_x, b.min_y, b.width(), b.height(), CORNER_RADIUS);
		ctx.fill();
		ctx.set_stroke_style(&self.border);
		ctx.stroke();

		if !scale.detailed(self.options.selected, self.options.highlighted) {
			return;
		}

		let center = b.center();
		let m = &self.label.metrics;
		ctx.set_font(&self.label.font);
		ctx.set_fill_style(&self.text_color);
		ctx.fill_text(
			&self.label.text,
			center.x - m.width / 2.0,
			center.y + (m.ascent - m.descent) / 2.0,
		);
	}
}

/// A node drawn as a font icon with its name stacked underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedIcon {
	pub center: Point,
	pub icon: PlacedText,
	/// Nominal glyph size, used for the bounding box width.
	pub icon_size: f64,
	pub label: PlacedText,
	/// Top of the icon.
	pub min_y: f64,
	pub spacing: f64,
	pub icon_color: String,
	pub text_color: String,
	pub low_detail_fill: String,
	pub options: PlacementOptions,
}

/// Narrowest clickable icon column, so tiny or missing glyphs stay selectable.
const MIN_CLICKABLE_ICON_WIDTH: f64 = 50.0;

impl PlacedIcon {
	fn total_height(&self) -> f64 {
		self.icon.metrics.height() + self.label.metrics.height() + self.spacing
	}

	/// Top of the label row.
	pub fn label_top(&self) -> f64 {
		self.min_y + self.icon.metrics.height() + self.spacing
	}

	fn bounding_box(&self) -> BoundingBox {
		let half = self.icon_size.max(self.label.metrics.width) / 2.0;
		BoundingBox::new(
			self.center.x - half,
			self.min_y,
			self.center.x + half,
			self.min_y + self.total_height(),
		)
	}

	/// The icon column and the label row are tested as two separate rectangles.
	fn is_point_intersecting(&self, x: f64, y: f64) -> bool {
		let icon_half = self.icon.metrics.width.max(MIN_CLICKABLE_ICON_WIDTH) / 2.0;
		let label_half = self.label.metrics.width / 2.0;
		let bottom = self.min_y + self.total_height();

		let in_icon = x >= self.center.x - icon_half
			&& x <= self.center.x + icon_half
			&& y >= self.min_y
			&& y <= bottom;
		let in_label = x >= self.center.x - label_half
			&& x <= self.center.x + label_half
			&& y >= self.label_top()
			&& y <= bottom;
		in_icon || in_label
	}

	fn render(&self, ctx: &mut dyn DrawingContext, scale: &ScaledValues) {
		ctx.begin_path();
		ctx.set_font(&self.icon.font);
		ctx.set_fill_style(&self.icon_color);
		ctx.fill_text(
			&self.icon.text,
			self.center.x - self.icon.metrics.width / 2.0,
			self.min_y + self.icon.metrics.ascent,
		);

		let m = &self.label.metrics;
		if scale.detailed(self.options.selected, self.options.highlighted) {
			ctx.set_font(&self.label.font);
			ctx.set_fill_style(&self.text_color);
			ctx.fill_text(
				&self.label.text,
				self.center.x - m.width / 2.0,
				self.label_top() + m.ascent,
			);
		} else {
			ctx.set_fill_style(&self.low_detail_fill);
			ctx.fill_rect(
				self.center.x - m.width / 2.0,
				self.label_top(),
				m.width,
				m.height(),
			);
		}
	}
}

/// A node drawn as a picture.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedImage {
	pub bbox: BoundingBox,
	pub url: String,
	pub border: String,
	pub low_detail_fill: String,
	pub options: PlacementOptions,
}

impl PlacedImage {
	fn render(&self, ctx: &mut dyn DrawingContext, scale: &ScaledValues) {
		let b = &self.bbox;
		let detailed = scale.detailed(self.options.selected, self.options.highlighted);
		if !detailed || !ctx.draw_image(&self.url, b.min_x, b.min_y, b.width(), b.height()) {
			ctx.set_fill_style(&self.low_detail_fill);
			ctx.fill_rect(b.min_x, b.min_y, b.width(), b.height());
		}

		if self.options.selected || self.options.highlighted {
			ctx.begin_path();
			ctx.set_line_width(scale.node_border_width_highlighted);
			ctx.set_stroke_style(&self.border);
			ctx.rect(b.min_x, b.min_y, b.width(), b.height());
			ctx.stroke();
		}
	}
}

/// A node ready to be measured, hit-tested and drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacedNode {
	Rectangle(PlacedRectangle),
	Icon(PlacedIcon),
	Image(PlacedImage),
}

impl PlacedNode {
	/// Axis-aligned box in graph coordinates.
	pub fn bounding_box(&self) -> BoundingBox {
		match self {
			PlacedNode::Rectangle(r) => r.bbox,
			PlacedNode::Icon(i) => i.bounding_box(),
			PlacedNode::Image(i) => i.bbox,
		}
	}

	/// Hit test in graph coordinates.
	pub fn is_point_intersecting(&self, x: f64, y: f64) -> bool {
		match self {
			PlacedNode::Rectangle(r) => r.bbox.contains(x, y),
			PlacedNode::Icon(i) => i.is_point_intersecting(x, y),
			PlacedNode::Image(i) => i.bbox.contains(x, y),
		}
	}

	/// Where a line from `(origin_x, origin_y)` toward this node enters its border.
	///
	/// Icon nodes use their bounding box rather than the exact icon/label outline.
	pub fn line_intersection_point(&self, origin_x: f64, origin_y: f64) -> Point {
		let b = self.bounding_box();
		point_on_rect(origin_x, origin_y, b.min_x, b.min_y, b.max_x, b.max_y)
	}

	pub fn render(&self, ctx: &mut dyn DrawingContext, scale: &ScaledValues) {
		match self {
			PlacedNode::Rectangle(r) => r.render(ctx, scale),
			PlacedNode::Icon(i) => i.render(ctx, scale),
			PlacedNode::Image(i) => i.render(ctx, scale),
		}
	}
}

/// An edge ready to be hit-tested and drawn in two layers (line, then label).
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEdge {
	pub from_center: Point,
	pub to_center: Point,
	/// Where the line leaves the source node's border.
	pub start: Point,
	/// Where the line meets the target node's border.
	pub end: Point,
	pub source_terminator: LineTerminator,
	pub target_terminator: LineTerminator,
	pub stroke_color: String,
	pub line_width: f64,
	pub dashed: bool,
	pub label: Option<PlacedText>,
	/// Baseline origin of the label text.
	pub label_origin: Point,
	pub label_color: String,
	pub label_halo: String,
	pub options: PlacementOptions,
}

impl PlacedEdge {
	/// Box around the label, if there is one.
	pub fn label_box(&self) -> Option<BoundingBox> {
		self.label.as_ref().map(|l| {
			BoundingBox::new(
				self.label_origin.x,
				self.label_origin.y - l.metrics.ascent,
				self.label_origin.x + l.metrics.width,
				self.label_origin.y + l.metrics.descent,
			)
		})
	}

	pub fn bounding_box(&self) -> BoundingBox {
		let line = BoundingBox::new(
			self.start.x.min(self.end.x),
			self.start.y.min(self.end.y),
			self.start.x.max(self.end.x),
			self.start.y.max(self.end.y),
		);
		match self.label_box() {
			Some(label) => line.union(&label),
			None => line,
		}
	}

	pub fn is_point_intersecting(&self, x: f64, y: f64) -> bool {
		let distance = point_segment_distance(
			x,
			y,
			self.from_center.x,
			self.from_center.y,
			self.to_center.x,
			self.to_center.y,
		);
		distance <= EDGE_HIT_DISTANCE || self.label_box().is_some_and(|b| b.contains(x, y))
	}

	/// Layer 1: the line and its terminators.
	pub fn render(&self, ctx: &mut dyn DrawingContext) {
		ctx.set_line_width(self.line_width);
		let line_end = self
			.target_terminator
			.draw(ctx, self.start, self.end, &self.stroke_color);
		let line_start = self
			.source_terminator
			.draw(ctx, self.end, self.start, &self.stroke_color);

		ctx.begin_path();
		ctx.set_line_width(self.line_width);
		ctx.set_stroke_style(&self.stroke_color);
		ctx.move_to(line_start.x, line_start.y);
		ctx.line_to(line_end.x, line_end.y);
		if self.dashed {
			ctx.set_line_dash(&[15.0, 5.0]);
		}
		ctx.stroke();
		if self.dashed {
			ctx.set_line_dash(&[]);
		}
	}

	/// Layer 2: the label, hidden when zoomed out unless selected or highlighted.
	pub fn render_label(&self, ctx: &mut dyn DrawingContext, scale: &ScaledValues) {
		let Some(label) = &self.label else {
			return;
		};
		if !(scale.edge_labels || self.options.selected || self.options.highlighted) {
			return;
		}

		ctx.begin_path();
		ctx.set_font(&label.font);
		ctx.set_stroke_style(&self.label_halo);
		ctx.set_line_width(3.0);
		ctx.stroke_text(&label.text, self.label_origin.x, self.label_origin.y);
		ctx.set_fill_style(&self.label_color);
		ctx.fill_text(&label.text, self.label_origin.x, self.label_origin.y);
	}
}

/// A layout group drawn as a translucent box behind its members.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGroup {
	pub bbox: BoundingBox,
	pub color: String,
}

impl PlacedGroup {
	pub fn render(&self, ctx: &mut dyn DrawingContext) {
		let b = &self.bbox;
		ctx.begin_path();
		ctx.set_fill_style(&self.color);
		ctx.set_stroke_style(&self.color);
		ctx.rect(b.min_x, b.min_y, b.width(), b.height());
		ctx.set_global_alpha(0.1);
		ctx.fill();
		ctx.set_global_alpha(1.0);
		ctx.stroke();
	}
}
