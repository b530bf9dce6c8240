//! Graph data structures exchanged with the caller.
//!
//! These mirror the knowledge-map JSON the editor loads and saves: nodes keyed by
//! a stable `hash`, edges referencing node hashes, and optional style overrides.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mutable per-node payload: position, optional explicit size and arbitrary
/// domain data that the viewer carries through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
	/// Center X in graph coordinates.
	#[serde(default)]
	pub x: f64,
	/// Center Y in graph coordinates.
	#[serde(default)]
	pub y: f64,
	/// Explicit width. Measured from the label when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<f64>,
	/// Explicit height. Measured from the label when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<f64>,
	/// Domain payload (sources, hyperlinks, detail text, ...).
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Font icon override for a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeIcon {
	/// Glyph to render (usually a single private-use code point).
	pub code: String,
	/// Font face holding the glyph.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub face: Option<String>,
	/// Glyph size in pixels.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<f64>,
	/// CSS color override for the glyph.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

/// Per-node presentation overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub font_size_scale: Option<f64>,
	/// Text color.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fill_color: Option<String>,
	/// Border color.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stroke_color: Option<String>,
	/// Box background color.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bg_color: Option<String>,
	/// Render the node as a picture loaded from this URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}

/// A vertex of the knowledge map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Stable unique identity. Never reused within a graph.
	pub hash: String,
	pub display_name: String,
	/// Semantic entity type (gene, chemical, ...). Drives style and color.
	pub label: String,
	#[serde(default)]
	pub sub_labels: Vec<String>,
	#[serde(default)]
	pub data: NodeData,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<NodeIcon>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<NodeStyle>,
}

impl Node {
	/// Convenience constructor for a plain node at a position.
	pub fn new(
		hash: impl Into<String>,
		display_name: impl Into<String>,
		label: impl Into<String>,
		x: f64,
		y: f64,
	) -> Self {
		Self {
			hash: hash.into(),
			display_name: display_name.into(),
			label: label.into(),
			sub_labels: Vec::new(),
			data: NodeData {
				x,
				y,
				..NodeData::default()
			},
			icon: None,
			style: None,
		}
	}

	/// Builder-style explicit size.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.data.width = Some(width);
		self.data.height = Some(height);
		self
	}
}

/// Stroke pattern for an edge line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
	#[default]
	Solid,
	Dashed,
}

/// Shape drawn at an edge end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminatorKind {
	Arrow,
	Diamond,
	None,
}

/// Per-edge presentation overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub font_size_scale: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stroke_color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line_type: Option<LineType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line_width_scale: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_end_type: Option<TerminatorKind>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_end_type: Option<TerminatorKind>,
}

/// A directed connection between two nodes, referenced by hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Identity in the newer map format. Legacy edges have none.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub from: String,
	pub to: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub data: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<EdgeStyle>,
}

impl Edge {
	/// A plain edge with an optional label.
	pub fn new(from: impl Into<String>, to: impl Into<String>, label: Option<&str>) -> Self {
		Self {
			id: None,
			from: from.into(),
			to: to.into(),
			label: label.map(str::to_string),
			data: Value::Null,
			style: None,
		}
	}

	/// Whether either end of this edge is the given node.
	pub fn touches(&self, hash: &str) -> bool {
		self.from == hash || self.to == hash
	}
}

/// Complete graph snapshot: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

/// Named, colored cluster of nodes kept together by the automatic layout and drawn
/// as a translucent box behind its members. Cosmetic only; not part of [`Graph`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutGroup {
	pub name: String,
	/// CSS color. Picked from the theme's group palette when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Hashes of member nodes.
	#[serde(default)]
	pub leaves: Vec<String>,
}

/// Something on the canvas the user can point at.
///
/// Nodes are identified by hash. Edges carry their full value and compare by
/// equality, so two identical edges between the same nodes are indistinguishable
/// (they also render identically).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "entity", rename_all = "lowercase")]
pub enum GraphEntity {
	Node(String),
	Edge(Edge),
}

impl GraphEntity {
	/// Hash of the node, if this entity is one.
	pub fn node_hash(&self) -> Option<&str> {
		match self {
			GraphEntity::Node(hash) => Some(hash),
			GraphEntity::Edge(_) => None,
		}
	}
}

/// Reference used when checking selection/highlight of several entities at once.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
	Node(&'a str),
	Edge(&'a Edge),
}

impl EntityRef<'_> {
	pub(crate) fn matches(&self, entity: &GraphEntity) -> bool {
		match (self, entity) {
			(EntityRef::Node(a), GraphEntity::Node(b)) => *a == b.as_str(),
			(EntityRef::Edge(a), GraphEntity::Edge(b)) => *a == b,
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_json_keeps_domain_payload() {
		let json = r#"{
			"hash": "n1",
			"display_name": "BRCA1",
			"label": "gene",
			"sub_labels": [],
			"data": { "x": 10, "y": -4, "hyperlink": "https://example.org" }
		}"#;
		let node: Node = serde_json::from_str(json).unwrap();
		assert_eq!(node.data.x, 10.0);
		assert_eq!(node.data.width, None);
		assert_eq!(
			node.data.extra.get("hyperlink"),
			Some(&Value::String("https://example.org".into()))
		);

		let back = serde_json::to_value(&node).unwrap();
		assert_eq!(back["data"]["hyperlink"], "https://example.org");
		assert!(back.get("icon").is_none());
	}

	#[test]
	fn edge_style_uses_camel_case() {
		let json = r#"{
			"from": "a", "to": "b", "label": null,
			"style": { "lineType": "dashed", "targetEndType": "diamond", "lineWidthScale": 2 }
		}"#;
		let edge: Edge = serde_json::from_str(json).unwrap();
		let style = edge.style.unwrap();
		assert_eq!(style.line_type, Some(LineType::Dashed));
		assert_eq!(style.target_end_type, Some(TerminatorKind::Diamond));
		assert_eq!(style.line_width_scale, Some(2.0));
		assert_eq!(edge.label, None);
	}

	#[test]
	fn entity_serializes_with_type_tag() {
		let value = serde_json::to_value(GraphEntity::Node("a".into())).unwrap();
		assert_eq!(value["type"], "node");
		assert_eq!(value["entity"], "a");
	}
}
