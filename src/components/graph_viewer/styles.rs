//! Render styles: pure mappings from a graph entity plus presentation options to
//! a placed shape.
//!
//! Node styles are chosen through [`StyleRegistry`], an explicit lookup keyed by
//! [`EntityKind`] with a guaranteed default, so unknown entity types render as
//! plain boxes instead of failing.

use std::collections::HashMap;

use super::canvas::TextMeasure;
use super::geometry::{BoundingBox, Point};
use super::placed::{
	PlacedEdge, PlacedIcon, PlacedImage, PlacedNode, PlacedRectangle, PlacedText,
	PlacementOptions,
};
use super::terminators::LineTerminator;
use super::theme::{Legend, Theme};
use super::types::{Edge, LineType, Node, TerminatorKind};

/// Base label font size in pixels.
pub const BASE_FONT_SIZE: f64 = 16.0;
/// Space added around measured text on each axis of a rectangle node.
pub const RECTANGLE_PADDING: f64 = 10.0;
const ICON_SIZE: f64 = 50.0;
const ICON_LABEL_SPACING: f64 = 2.0;
const ICON_Y_SHIFT: f64 = 7.0;
const IMAGE_SIZE: f64 = 100.0;

/// Entity types known to the knowledge map, parsed from a node's `label`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Gene,
	Protein,
	Disease,
	Chemical,
	Compound,
	Mutation,
	Species,
	Pathway,
	Phenotype,
	Company,
	Study,
	Entity,
	Link,
	Note,
	Map,
	Image,
	Other(String),
}

impl EntityKind {
	pub fn from_label(label: &str) -> Self {
		match label.to_ascii_lowercase().as_str() {
			"gene" => EntityKind::Gene,
			"protein" => EntityKind::Protein,
			"disease" => EntityKind::Disease,
			"chemical" => EntityKind::Chemical,
			"compound" => EntityKind::Compound,
			"mutation" => EntityKind::Mutation,
			"species" => EntityKind::Species,
			"pathway" => EntityKind::Pathway,
			"phenotype" => EntityKind::Phenotype,
			"company" => EntityKind::Company,
			"study" => EntityKind::Study,
			"entity" => EntityKind::Entity,
			"link" => EntityKind::Link,
			"note" => EntityKind::Note,
			"map" => EntityKind::Map,
			"image" => EntityKind::Image,
			other => EntityKind::Other(other.to_string()),
		}
	}
}

/// How a node is drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeRenderStyle {
	/// Rounded box sized to its name.
	Rectangle,
	/// Font icon above the name.
	Icon {
		code: String,
		font_family: Option<String>,
		size: f64,
		color: Option<String>,
	},
	/// Picture loaded from a URL.
	Image { url: String },
}

impl NodeRenderStyle {
	/// Resolve this style for a node into a placed shape.
	pub fn place(
		&self,
		d: &Node,
		measure: &dyn TextMeasure,
		legend: &Legend,
		theme: &Theme,
		options: PlacementOptions,
	) -> PlacedNode {
		let style = d.style.clone().unwrap_or_default();
		let label_font = node_font(d, theme, options);
		let text_color = style
			.fill_color
			.clone()
			.unwrap_or_else(|| legend.resolve(&d.label).color.to_css());
		let border = style
			.stroke_color
			.clone()
			.unwrap_or_else(|| theme.border.to_css());
		let low_detail_fill = theme.low_detail_fill.to_css();

		match self {
			NodeRenderStyle::Rectangle => {
				let metrics = measure.measure_text(&label_font, &d.display_name);
				let width = d.data.width.unwrap_or(metrics.width + RECTANGLE_PADDING);
				let height = d.data.height.unwrap_or(metrics.height() + RECTANGLE_PADDING);
				let fill = style.bg_color.clone().unwrap_or_else(|| {
					if options.highlighted {
						theme.node_fill_highlighted.to_css()
					} else if options.selected {
						theme.node_fill_selected.to_css()
					} else {
						theme.node_fill.to_css()
					}
				});
				PlacedNode::Rectangle(PlacedRectangle {
					bbox: BoundingBox::centered(d.data.x, d.data.y, width, height),
					label: PlacedText {
						text: d.display_name.clone(),
						font: label_font,
						metrics,
					},
					text_color,
					fill,
					border,
					low_detail_fill,
					options,
				})
			}
			NodeRenderStyle::Icon {
				code,
				font_family,
				size,
				color,
			} => {
				let icon_font = format!(
					"{}px {}",
					size,
					font_family.as_deref().unwrap_or(theme.icon_font_family)
				);
				let icon_metrics = measure.measure_text(&icon_font, code);
				let label_metrics = measure.measure_text(&label_font, &d.display_name);
				let total_height =
					icon_metrics.height() + label_metrics.height() + ICON_LABEL_SPACING;
				PlacedNode::Icon(PlacedIcon {
					center: Point::new(d.data.x, d.data.y),
					icon: PlacedText {
						text: code.clone(),
						font: icon_font,
						metrics: icon_metrics,
					},
					icon_size: *size,
					label: PlacedText {
						text: d.display_name.clone(),
						font: label_font,
						metrics: label_metrics,
					},
					min_y: d.data.y - total_height / 2.0 + ICON_Y_SHIFT,
					spacing: ICON_LABEL_SPACING,
					icon_color: color.clone().unwrap_or_else(|| text_color.clone()),
					text_color,
					low_detail_fill,
					options,
				})
			}
			NodeRenderStyle::Image { url } => {
				let width = d.data.width.unwrap_or(IMAGE_SIZE);
				let height = d.data.height.unwrap_or(IMAGE_SIZE);
				PlacedNode::Image(PlacedImage {
					bbox: BoundingBox::centered(d.data.x, d.data.y, width, height),
					url: url.clone(),
					border,
					low_detail_fill,
					options,
				})
			}
		}
	}
}

fn node_font(d: &Node, theme: &Theme, options: PlacementOptions) -> String {
	let scale = d
		.style
		.as_ref()
		.and_then(|s| s.font_size_scale)
		.unwrap_or(1.0);
	let weight = if options.highlighted || options.selected {
		"bold "
	} else {
		""
	};
	format!("{}{}px {}", weight, BASE_FONT_SIZE * scale, theme.font_family)
}

/// Node style lookup keyed by entity kind, with a guaranteed default entry.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
	styles: HashMap<EntityKind, NodeRenderStyle>,
	default: NodeRenderStyle,
}

impl Default for StyleRegistry {
	fn default() -> Self {
		Self {
			styles: HashMap::new(),
			default: NodeRenderStyle::Rectangle,
		}
	}
}

impl StyleRegistry {
	/// Register (or replace) the style used for an entity kind.
	pub fn register(&mut self, kind: EntityKind, style: NodeRenderStyle) {
		self.styles.insert(kind, style);
	}

	pub fn default_style(&self) -> &NodeRenderStyle {
		&self.default
	}

	/// Pick the style for a node.
	///
	/// Precedence: the node's own icon, the node's image URL, a registered style
	/// for its entity kind, the legend's icon for its label, then the default.
	pub fn resolve(&self, d: &Node, legend: &Legend) -> NodeRenderStyle {
		if let Some(icon) = &d.icon {
			return NodeRenderStyle::Icon {
				code: icon.code.clone(),
				font_family: icon.face.clone(),
				size: icon.size.unwrap_or(ICON_SIZE),
				color: icon.color.clone(),
			};
		}
		if let Some(url) = d.style.as_ref().and_then(|s| s.image_url.clone()) {
			return NodeRenderStyle::Image { url };
		}
		if let Some(style) = self.styles.get(&EntityKind::from_label(&d.label)) {
			return style.clone();
		}
		if let Some(code) = legend.get(&d.label).and_then(|s| s.icon_code.clone()) {
			return NodeRenderStyle::Icon {
				code,
				font_family: None,
				size: ICON_SIZE,
				color: None,
			};
		}
		self.default.clone()
	}
}

/// Default edge appearance, overridable per edge through [`Edge::style`].
#[derive(Clone, Debug)]
pub struct EdgeRenderStyle {
	pub font_size_scale: f64,
	pub stroke_color: Option<String>,
	pub line_type: LineType,
	pub line_width: f64,
	pub line_width_scale: f64,
	pub source_end_type: TerminatorKind,
	pub target_end_type: TerminatorKind,
}

impl Default for EdgeRenderStyle {
	fn default() -> Self {
		Self {
			font_size_scale: 1.0,
			stroke_color: None,
			line_type: LineType::Solid,
			line_width: 1.5,
			line_width_scale: 1.0,
			source_end_type: TerminatorKind::None,
			target_end_type: TerminatorKind::Arrow,
		}
	}
}

impl EdgeRenderStyle {
	/// Place an edge between two already placed nodes.
	#[allow(clippy::too_many_arguments)]
	pub fn place(
		&self,
		d: &Edge,
		from: &Node,
		to: &Node,
		placed_from: &PlacedNode,
		placed_to: &PlacedNode,
		measure: &dyn TextMeasure,
		theme: &Theme,
		options: PlacementOptions,
	) -> PlacedEdge {
		let style = d.style.clone().unwrap_or_default();
		let font_size_scale = style.font_size_scale.unwrap_or(self.font_size_scale);
		let stroke_color = style
			.stroke_color
			.or_else(|| self.stroke_color.clone())
			.unwrap_or_else(|| theme.border.to_css());
		let line_type = style.line_type.unwrap_or(self.line_type);
		let line_width_scale = style.line_width_scale.unwrap_or(self.line_width_scale);
		let line_width =
			self.line_width * line_width_scale * if options.highlighted { 1.5 } else { 1.0 };
		let source_end = style.source_end_type.unwrap_or(self.source_end_type);
		let target_end = style.target_end_type.unwrap_or(self.target_end_type);

		let end = placed_to.line_intersection_point(from.data.x, from.data.y);
		let start = placed_from.line_intersection_point(to.data.x, to.data.y);

		let label = d.label.as_deref().filter(|l| !l.is_empty()).map(|text| {
			let font = format!(
				"{}{}px {}",
				if options.highlighted { "bold " } else { "" },
				BASE_FONT_SIZE * font_size_scale,
				theme.font_family
			);
			let metrics = measure.measure_text(&font, text);
			PlacedText {
				text: text.to_string(),
				font,
				metrics,
			}
		});
		let mid = start.midpoint(end);
		let label_origin = label
			.as_ref()
			.map(|l| Point::new(mid.x - l.metrics.width / 2.0, mid.y + l.metrics.height() / 2.0))
			.unwrap_or(mid);

		PlacedEdge {
			from_center: Point::new(from.data.x, from.data.y),
			to_center: Point::new(to.data.x, to.data.y),
			start,
			end,
			source_terminator: LineTerminator::for_kind(source_end, line_width),
			target_terminator: LineTerminator::for_kind(target_end, line_width),
			stroke_color,
			line_width,
			dashed: line_type == LineType::Dashed,
			label,
			label_origin,
			label_color: theme.edge_label.to_css(),
			label_halo: theme.edge_label_halo.to_css(),
			options,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::scale::{ScaleConfig, ScaledValues};
	use super::super::test_support::{ASCENT, CHAR_WIDTH, DESCENT, DrawCommand, RecordingContext};
	use super::super::types::{EdgeStyle, NodeIcon, NodeStyle};
	use super::*;

	fn place(d: &Node, options: PlacementOptions) -> PlacedNode {
		let legend = Legend::default();
		StyleRegistry::default().resolve(d, &legend).place(
			d,
			&RecordingContext::new(),
			&legend,
			&Theme::default(),
			options,
		)
	}

	fn place_edge(edge: &Edge, a: &Node, b: &Node, options: PlacementOptions) -> PlacedEdge {
		let pa = place(a, PlacementOptions::default());
		let pb = place(b, PlacementOptions::default());
		EdgeRenderStyle::default().place(
			edge,
			a,
			b,
			&pa,
			&pb,
			&RecordingContext::new(),
			&Theme::default(),
			options,
		)
	}

	#[test]
	fn rectangle_is_sized_from_text_plus_padding() {
		let node = Node::new("a", "BRCA1", "gene", 10.0, 20.0);
		let bbox = place(&node, PlacementOptions::default()).bounding_box();
		let width = 5.0 * CHAR_WIDTH + RECTANGLE_PADDING;
		let height = ASCENT + DESCENT + RECTANGLE_PADDING;
		assert_eq!(bbox, BoundingBox::centered(10.0, 20.0, width, height));
	}

	#[test]
	fn explicit_size_overrides_measurement() {
		let node = Node::new("a", "a very long display name", "gene", 0.0, 0.0).with_size(100.0, 40.0);
		let placed = place(&node, PlacementOptions::default());
		assert_eq!(placed.bounding_box(), BoundingBox::new(-50.0, -20.0, 50.0, 20.0));
		assert!(placed.is_point_intersecting(50.0, 20.0));
		assert!(!placed.is_point_intersecting(50.1, 0.0));
	}

	#[test]
	fn unknown_label_degrades_to_default_rectangle() {
		let node = Node::new("a", "thing", "not-a-real-type", 0.0, 0.0);
		assert!(matches!(
			place(&node, PlacementOptions::default()),
			PlacedNode::Rectangle(_)
		));
	}

	#[test]
	fn icon_style_chosen_from_node_override_then_legend() {
		let mut node = Node::new("a", "Note", "note", 0.0, 0.0);
		assert!(matches!(place(&node, PlacementOptions::default()), PlacedNode::Icon(_)));

		node.label = "gene".into();
		node.icon = Some(NodeIcon {
			code: "\u{f0c3}".into(),
			face: Some("Custom".into()),
			size: Some(30.0),
			color: None,
		});
		let PlacedNode::Icon(icon) = place(&node, PlacementOptions::default()) else {
			panic!("expected icon node");
		};
		assert_eq!(icon.icon.font, "30px Custom");
		assert_eq!(icon.icon_size, 30.0);
	}

	#[test]
	fn registry_entry_beats_legend() {
		let mut registry = StyleRegistry::default();
		registry.register(EntityKind::Note, NodeRenderStyle::Rectangle);
		let node = Node::new("a", "Note", "Note", 0.0, 0.0);
		assert_eq!(registry.resolve(&node, &Legend::default()), NodeRenderStyle::Rectangle);
	}

	#[test]
	fn icon_hit_test_uses_two_regions() {
		// Label "abcdefghij" is 80 wide, icon glyph is 8 wide (clickable 50).
		let mut node = Node::new("a", "abcdefghij", "gene", 0.0, 0.0);
		node.icon = Some(NodeIcon {
			code: "x".into(),
			face: None,
			size: None,
			color: None,
		});
		let PlacedNode::Icon(icon) = place(&node, PlacementOptions::default()) else {
			panic!("expected icon node");
		};
		let placed = PlacedNode::Icon(icon.clone());
		let icon_mid_y = icon.min_y + 2.0;
		let label_mid_y = icon.label_top() + 2.0;

		// Icon column: narrow but full height.
		assert!(placed.is_point_intersecting(20.0, icon_mid_y));
		// Outside the icon column at icon height, even though inside the bounding box.
		assert!(!placed.is_point_intersecting(35.0, icon_mid_y));
		assert!(placed.bounding_box().contains(35.0, icon_mid_y));
		// Label row is wider than the icon column.
		assert!(placed.is_point_intersecting(35.0, label_mid_y));
	}

	#[test]
	fn image_style_from_node_style() {
		let mut node = Node::new("a", "figure", "image", 0.0, 0.0);
		node.style = Some(NodeStyle {
			image_url: Some("https://example.org/figure.png".into()),
			..NodeStyle::default()
		});
		let placed = place(&node, PlacementOptions::default());
		assert!(matches!(placed, PlacedNode::Image(_)));
		assert_eq!(placed.bounding_box(), BoundingBox::new(-50.0, -50.0, 50.0, 50.0));
	}

	#[test]
	fn edge_endpoints_snap_to_node_borders() {
		let a = Node::new("a", "A", "gene", 0.0, 0.0).with_size(100.0, 40.0);
		let b = Node::new("b", "B", "gene", 300.0, 0.0).with_size(100.0, 40.0);
		let edge = place_edge(&Edge::new("a", "b", None), &a, &b, PlacementOptions::default());
		assert!((edge.start.x - 50.0).abs() < 1e-9);
		assert!((edge.end.x - 250.0).abs() < 1e-9);
		assert!(edge.start.y.abs() < 1e-9 && edge.end.y.abs() < 1e-9);
	}

	#[test]
	fn edge_label_centered_between_borders() {
		let a = Node::new("a", "A", "gene", 0.0, 0.0).with_size(100.0, 40.0);
		let b = Node::new("b", "B", "gene", 300.0, 0.0).with_size(100.0, 40.0);
		let edge = place_edge(&Edge::new("a", "b", Some("binds")), &a, &b, PlacementOptions::default());
		let label_box = edge.label_box().unwrap();
		assert!((label_box.center().x - 150.0).abs() < 1e-9);
		assert!(edge.is_point_intersecting(150.0, 1.9));
		assert!(!edge.is_point_intersecting(100.0, 30.0));
	}

	#[test]
	fn edge_style_overrides_apply() {
		let a = Node::new("a", "A", "gene", 0.0, 0.0);
		let b = Node::new("b", "B", "gene", 300.0, 0.0);
		let mut edge = Edge::new("a", "b", None);
		edge.style = Some(EdgeStyle {
			stroke_color: Some("#ff0000".into()),
			line_type: Some(LineType::Dashed),
			line_width_scale: Some(2.0),
			target_end_type: Some(TerminatorKind::Diamond),
			..EdgeStyle::default()
		});
		let placed = place_edge(
			&edge,
			&a,
			&b,
			PlacementOptions {
				selected: false,
				highlighted: true,
			},
		);
		assert_eq!(placed.stroke_color, "#ff0000");
		assert!(placed.dashed);
		assert_eq!(placed.line_width, 4.5);
		assert!(matches!(placed.target_terminator, LineTerminator::Diamond { .. }));
		assert_eq!(placed.source_terminator, LineTerminator::None);
	}

	#[test]
	fn low_detail_hides_text_unless_selected() {
		let node = Node::new("a", "BRCA1", "gene", 0.0, 0.0);
		let zoomed_out = ScaledValues::new(&ScaleConfig::default(), 0.2);

		let mut ctx = RecordingContext::new();
		place(&node, PlacementOptions::default()).render(&mut ctx, &zoomed_out);
		assert!(ctx.filled_texts().is_empty());

		let mut ctx = RecordingContext::new();
		let selected = PlacementOptions {
			selected: true,
			highlighted: false,
		};
		place(&node, selected).render(&mut ctx, &zoomed_out);
		assert_eq!(ctx.filled_texts(), vec!["BRCA1".to_string()]);
	}

	#[test]
	fn edge_label_suppressed_when_zoomed_out() {
		let a = Node::new("a", "A", "gene", 0.0, 0.0);
		let b = Node::new("b", "B", "gene", 300.0, 0.0);
		let edge = place_edge(&Edge::new("a", "b", Some("binds")), &a, &b, PlacementOptions::default());

		let mut ctx = RecordingContext::new();
		edge.render_label(&mut ctx, &ScaledValues::new(&ScaleConfig::default(), 0.2));
		assert!(ctx.commands().is_empty());

		edge.render_label(&mut ctx, &ScaledValues::new(&ScaleConfig::default(), 1.0));
		assert!(ctx.commands().contains(&DrawCommand::FillText(
			"binds".into(),
			edge.label_origin.x,
			edge.label_origin.y
		)));
	}
}
