//! The graph view: node/edge collections, hash index, selection and highlight,
//! undo history and layout orchestration.
//!
//! Rendering is decoupled from mutation through a request flag. Every state change
//! calls [`GraphView::request_render`]; the frame loop drains it with
//! [`GraphView::take_render_request`] and draws at most once per frame.

use std::collections::HashMap;

use log::{debug, info};

use super::canvas::TextMeasure;
use super::config::ViewerConfig;
use super::error::GraphError;
use super::geometry::BoundingBox;
use super::history::{GraphAction, History};
use super::layout::{LayoutAdapter, LayoutStatus};
use super::placed::{PlacedEdge, PlacedGroup, PlacedNode, PlacementOptions};
use super::styles::{EdgeRenderStyle, StyleRegistry};
use super::theme::{Legend, Theme};
use super::types::{Edge, EntityRef, Graph, GraphEntity, LayoutGroup, Node};

/// Handle returned by [`GraphView::subscribe_selection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type SelectionListener = Box<dyn FnMut(&[GraphEntity])>;

/// Borrowed view of the current graph contents.
#[derive(Clone, Copy, Debug)]
pub struct GraphRef<'a> {
	pub nodes: &'a [Node],
	pub edges: &'a [Edge],
}

/// A node taken out of the graph together with the edges that were cascaded away,
/// each with its former position, so it can be put back exactly.
#[derive(Clone, Debug)]
pub struct RemovedNode {
	pub(crate) index: usize,
	pub(crate) node: Node,
	/// Ascending by former index.
	pub(crate) edges: Vec<(usize, Edge)>,
}

/// Center and size of a node in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

/// In-memory graph model with presentation state.
pub struct GraphView {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	node_index: HashMap<String, usize>,
	/// Pinned positions: nodes being dragged, fixed during layout.
	position_overrides: HashMap<String, (f64, f64)>,
	layout_groups: Vec<LayoutGroup>,

	selected: Vec<GraphEntity>,
	highlighted: Option<GraphEntity>,
	selection_listeners: Vec<(SubscriptionId, SelectionListener)>,
	next_subscription: usize,

	history: History,
	rendering_requested: bool,
	layout: Option<LayoutAdapter>,
	/// Nodes, edges or groups changed under the running layout.
	layout_stale: bool,
	automatic_layout_enabled: bool,

	measure: Box<dyn TextMeasure>,
	styles: StyleRegistry,
	edge_style: EdgeRenderStyle,
	legend: Legend,
	theme: Theme,
	config: ViewerConfig,
}

impl GraphView {
	pub fn new(measure: Box<dyn TextMeasure>, config: ViewerConfig) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			node_index: HashMap::new(),
			position_overrides: HashMap::new(),
			layout_groups: Vec::new(),
			selected: Vec::new(),
			highlighted: None,
			selection_listeners: Vec::new(),
			next_subscription: 0,
			history: History::new(config.history_limit),
			rendering_requested: true,
			layout: None,
			layout_stale: false,
			automatic_layout_enabled: false,
			measure,
			styles: StyleRegistry::default(),
			edge_style: EdgeRenderStyle::default(),
			legend: Legend::default(),
			theme: Theme::default(),
			config,
		}
	}

	#[cfg(test)]
	pub(crate) fn headless() -> Self {
		Self::new(
			Box::new(super::test_support::RecordingContext::new()),
			ViewerConfig::default(),
		)
	}

	// ========================================================================
	// Presentation
	// ========================================================================

	pub fn config(&self) -> &ViewerConfig {
		&self.config
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn set_theme(&mut self, theme: Theme) {
		info!("theme set to {}", theme.name);
		self.theme = theme;
		self.request_render();
	}

	pub fn legend(&self) -> &Legend {
		&self.legend
	}

	pub fn set_legend(&mut self, legend: Legend) {
		self.legend = legend;
		self.request_render();
	}

	pub fn styles_mut(&mut self) -> &mut StyleRegistry {
		self.request_render();
		&mut self.styles
	}

	pub fn measure(&self) -> &dyn TextMeasure {
		self.measure.as_ref()
	}

	// ========================================================================
	// Graph contents
	// ========================================================================

	/// Replace the whole graph. The input is checked first: duplicate hashes and
	/// dangling edges are rejected and leave the view untouched.
	///
	/// Clears selection, highlight, position overrides and history, and stops any
	/// running layout.
	pub fn set_graph(&mut self, graph: Graph) -> Result<(), GraphError> {
		let index = build_index(&graph.nodes)?;
		for edge in &graph.edges {
			for hash in [&edge.from, &edge.to] {
				if !index.contains_key(hash) {
					return Err(GraphError::MissingNodeLink { hash: hash.clone() });
				}
			}
		}

		let mut unknown: Vec<&str> = graph
			.nodes
			.iter()
			.map(|n| n.label.as_str())
			.filter(|label| self.legend.get(label).is_none())
			.collect();
		unknown.sort_unstable();
		unknown.dedup();
		if !unknown.is_empty() {
			debug!("no legend entry for labels {unknown:?}; using default style");
		}

		info!(
			"graph loaded: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);

		self.stop_graph_layout();
		self.nodes = graph.nodes;
		self.edges = graph.edges;
		self.node_index = index;
		self.position_overrides.clear();
		self.layout_groups.clear();
		self.history = History::new(self.config.history_limit);
		self.highlighted = None;
		self.replace_selection(Vec::new());
		self.request_render();
		Ok(())
	}

	/// The current contents, borrowed.
	pub fn graph(&self) -> GraphRef<'_> {
		GraphRef {
			nodes: &self.nodes,
			edges: &self.edges,
		}
	}

	/// An owned copy suitable for persistence.
	pub fn snapshot(&self) -> Graph {
		Graph {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
		let at = self.nodes.len();
		self.insert_node_at(at, node)
	}

	pub(crate) fn insert_node_at(&mut self, index: usize, node: Node) -> Result<(), GraphError> {
		if self.node_index.contains_key(&node.hash) {
			return Err(GraphError::DuplicateNode { hash: node.hash });
		}
		let index = index.min(self.nodes.len());
		self.nodes.insert(index, node);
		self.reindex_from(index);
		self.mark_layout_stale();
		self.request_render();
		Ok(())
	}

	/// Remove a node and every edge touching it. Returns whether the node was found.
	pub fn remove_node(&mut self, hash: &str) -> Result<bool, GraphError> {
		Ok(self.take_node(hash)?.is_some())
	}

	/// Remove a node and its edges, returning what was removed.
	///
	/// Every edge is checked for dangling endpoints before anything is touched.
	pub(crate) fn take_node(&mut self, hash: &str) -> Result<Option<RemovedNode>, GraphError> {
		let Some(&index) = self.node_index.get(hash) else {
			return Ok(None);
		};
		for edge in &self.edges {
			self.expect_node_by_hash(&edge.from)?;
			self.expect_node_by_hash(&edge.to)?;
		}

		let node = self.nodes.remove(index);
		self.node_index.remove(hash);
		self.reindex_from(index);

		let mut edges = Vec::new();
		let mut j = self.edges.len();
		while j > 0 {
			j -= 1;
			if self.edges[j].touches(hash) {
				edges.push((j, self.edges.remove(j)));
			}
		}
		edges.reverse();

		self.position_overrides.remove(hash);
		for group in &mut self.layout_groups {
			group.leaves.retain(|leaf| leaf != hash);
		}
		self.forget_entities(|e| match e {
			GraphEntity::Node(h) => h == hash,
			GraphEntity::Edge(edge) => edge.touches(hash),
		});
		self.mark_layout_stale();
		self.request_render();

		Ok(Some(RemovedNode { index, node, edges }))
	}

	/// Put back a node removed by [`GraphView::take_node`].
	pub(crate) fn restore_node(&mut self, removed: RemovedNode) -> Result<(), GraphError> {
		self.insert_node_at(removed.index, removed.node)?;
		for (index, edge) in removed.edges {
			self.insert_edge_at(index, edge)?;
		}
		Ok(())
	}

	pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
		let at = self.edges.len();
		self.insert_edge_at(at, edge)
	}

	pub(crate) fn insert_edge_at(&mut self, index: usize, edge: Edge) -> Result<(), GraphError> {
		self.expect_node_by_hash(&edge.from)?;
		self.expect_node_by_hash(&edge.to)?;
		let index = index.min(self.edges.len());
		self.edges.insert(index, edge);
		self.mark_layout_stale();
		self.request_render();
		Ok(())
	}

	/// Remove the first edge equal to `edge`. Returns whether one was found.
	pub fn remove_edge(&mut self, edge: &Edge) -> Result<bool, GraphError> {
		Ok(self.take_edge(edge)?.is_some())
	}

	/// Remove the first edge equal to `edge`, returning its former index.
	pub(crate) fn take_edge(&mut self, edge: &Edge) -> Result<Option<usize>, GraphError> {
		self.expect_node_by_hash(&edge.from)?;
		self.expect_node_by_hash(&edge.to)?;
		let Some(index) = self.edges.iter().position(|e| e == edge) else {
			return Ok(None);
		};
		self.edges.remove(index);
		self.forget_entities(|e| matches!(e, GraphEntity::Edge(other) if other == edge));
		self.mark_layout_stale();
		self.request_render();
		Ok(Some(index))
	}

	pub fn update_node_position(&mut self, hash: &str, x: f64, y: f64) -> Result<(), GraphError> {
		let node = self.node_mut(hash)?;
		node.data.x = x;
		node.data.y = y;
		self.request_render();
		Ok(())
	}

	pub fn node_position(&self, hash: &str) -> Option<(f64, f64)> {
		self.get_node_by_hash(hash).map(|n| (n.data.x, n.data.y))
	}

	/// Position and size of a node. Nodes without an explicit size report the
	/// size they are drawn at.
	pub fn node_geometry(&self, hash: &str) -> Option<NodeGeometry> {
		let node = self.get_node_by_hash(hash)?;
		let (width, height) = match (node.data.width, node.data.height) {
			(Some(w), Some(h)) => (w, h),
			(w, h) => {
				let bbox = self.place_node(node).bounding_box();
				(w.unwrap_or(bbox.width()), h.unwrap_or(bbox.height()))
			}
		};
		Some(NodeGeometry {
			x: node.data.x,
			y: node.data.y,
			width,
			height,
		})
	}

	/// Move and resize a node in one step.
	pub fn set_node_geometry(&mut self, hash: &str, geometry: NodeGeometry) -> Result<(), GraphError> {
		let node = self.node_mut(hash)?;
		node.data.x = geometry.x;
		node.data.y = geometry.y;
		node.data.width = Some(geometry.width);
		node.data.height = Some(geometry.height);
		self.request_render();
		Ok(())
	}

	pub fn get_node_by_hash(&self, hash: &str) -> Option<&Node> {
		self.node_index.get(hash).and_then(|&i| self.nodes.get(i))
	}

	/// Like [`GraphView::get_node_by_hash`], but a missing node is a broken link.
	pub fn expect_node_by_hash(&self, hash: &str) -> Result<&Node, GraphError> {
		self.get_node_by_hash(hash)
			.ok_or_else(|| GraphError::MissingNodeLink {
				hash: hash.to_string(),
			})
	}

	fn node_mut(&mut self, hash: &str) -> Result<&mut Node, GraphError> {
		let index = self
			.node_index
			.get(hash)
			.copied()
			.ok_or_else(|| GraphError::UnknownNode {
				hash: hash.to_string(),
			})?;
		self.nodes
			.get_mut(index)
			.ok_or_else(|| GraphError::UnknownNode {
				hash: hash.to_string(),
			})
	}

	fn reindex_from(&mut self, start: usize) {
		for (i, node) in self.nodes.iter().enumerate().skip(start) {
			self.node_index.insert(node.hash.clone(), i);
		}
	}

	// ========================================================================
	// Position overrides and groups
	// ========================================================================

	pub fn position_overrides(&self) -> &HashMap<String, (f64, f64)> {
		&self.position_overrides
	}

	pub fn set_position_override(&mut self, hash: &str, x: f64, y: f64) {
		self.position_overrides.insert(hash.to_string(), (x, y));
	}

	pub fn clear_position_overrides(&mut self) {
		self.position_overrides.clear();
	}

	pub fn layout_groups(&self) -> &[LayoutGroup] {
		&self.layout_groups
	}

	pub fn set_layout_groups(&mut self, groups: Vec<LayoutGroup>) {
		self.layout_groups = groups;
		self.mark_layout_stale();
		self.request_render();
	}

	// ========================================================================
	// Placement and hit-testing
	// ========================================================================

	fn options_for(&self, entity: EntityRef<'_>) -> PlacementOptions {
		PlacementOptions {
			selected: self.is_any_selected(&[entity]),
			highlighted: self.is_any_highlighted(&[entity]),
		}
	}

	pub fn place_node(&self, node: &Node) -> PlacedNode {
		let options = self.options_for(EntityRef::Node(&node.hash));
		self.styles.resolve(node, &self.legend).place(
			node,
			self.measure.as_ref(),
			&self.legend,
			&self.theme,
			options,
		)
	}

	pub fn place_edge(&self, edge: &Edge) -> Result<PlacedEdge, GraphError> {
		let from = self.expect_node_by_hash(&edge.from)?;
		let to = self.expect_node_by_hash(&edge.to)?;
		Ok(self.edge_style.place(
			edge,
			from,
			to,
			&self.place_node(from),
			&self.place_node(to),
			self.measure.as_ref(),
			&self.theme,
			self.options_for(EntityRef::Edge(edge)),
		))
	}

	/// Layout groups as drawable boxes around their members.
	pub fn place_groups(&self) -> Vec<PlacedGroup> {
		let padding = self.config.scale.group_padding;
		self.layout_groups
			.iter()
			.enumerate()
			.filter_map(|(i, group)| {
				let members = group
					.leaves
					.iter()
					.filter_map(|hash| self.get_node_by_hash(hash))
					.map(|n| self.place_node(n).bounding_box());
				let bbox = BoundingBox::enclosing(members)?.padded(padding);
				let color = group
					.color
					.clone()
					.unwrap_or_else(|| self.theme.group_palette.get(i).to_css());
				Some(PlacedGroup { bbox, color })
			})
			.collect()
	}

	/// Topmost node under a point. Later nodes are drawn on top, so the scan runs
	/// backwards.
	pub fn get_node_at_position<'a>(&self, nodes: &'a [Node], x: f64, y: f64) -> Option<&'a Node> {
		nodes
			.iter()
			.rev()
			.find(|n| self.place_node(n).is_point_intersecting(x, y))
	}

	/// First edge under a point.
	pub fn get_edge_at_position<'a>(
		&self,
		edges: &'a [Edge],
		x: f64,
		y: f64,
	) -> Result<Option<&'a Edge>, GraphError> {
		for edge in edges {
			if self.place_edge(edge)?.is_point_intersecting(x, y) {
				return Ok(Some(edge));
			}
		}
		Ok(None)
	}

	/// Node under a point, else edge under it.
	pub fn get_entity_at_position(&self, x: f64, y: f64) -> Result<Option<GraphEntity>, GraphError> {
		if let Some(node) = self.get_node_at_position(&self.nodes, x, y) {
			return Ok(Some(GraphEntity::Node(node.hash.clone())));
		}
		Ok(self
			.get_edge_at_position(&self.edges, x, y)?
			.map(|edge| GraphEntity::Edge(edge.clone())))
	}

	/// Union of the nodes' placed boxes grown by `padding`, or `None` for no nodes.
	pub fn bounding_box(&self, nodes: &[Node], padding: f64) -> Option<BoundingBox> {
		BoundingBox::enclosing(nodes.iter().map(|n| self.place_node(n).bounding_box()))
			.map(|b| b.padded(padding))
	}

	// ========================================================================
	// Selection and highlight
	// ========================================================================

	pub fn selection(&self) -> &[GraphEntity] {
		&self.selected
	}

	pub fn highlighted(&self) -> Option<&GraphEntity> {
		self.highlighted.as_ref()
	}

	/// Replace the selection. Pass an empty list to select nothing.
	pub fn select(&mut self, entities: Vec<GraphEntity>) {
		self.replace_selection(entities);
		self.request_render();
	}

	pub fn is_any_selected(&self, entities: &[EntityRef<'_>]) -> bool {
		entities
			.iter()
			.any(|e| self.selected.iter().any(|s| e.matches(s)))
	}

	pub fn is_any_highlighted(&self, entities: &[EntityRef<'_>]) -> bool {
		let Some(highlighted) = &self.highlighted else {
			return false;
		};
		entities.iter().any(|e| e.matches(highlighted))
	}

	pub fn set_highlighted(&mut self, entity: Option<GraphEntity>) {
		if self.highlighted != entity {
			self.highlighted = entity;
			self.request_render();
		}
	}

	/// Register a callback invoked with the new selection whenever it changes.
	pub fn subscribe_selection(
		&mut self,
		listener: impl FnMut(&[GraphEntity]) + 'static,
	) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription);
		self.next_subscription += 1;
		self.selection_listeners.push((id, Box::new(listener)));
		id
	}

	pub fn unsubscribe_selection(&mut self, id: SubscriptionId) -> bool {
		let before = self.selection_listeners.len();
		self.selection_listeners.retain(|(other, _)| *other != id);
		self.selection_listeners.len() != before
	}

	fn replace_selection(&mut self, entities: Vec<GraphEntity>) {
		self.selected = entities;
		for (_, listener) in &mut self.selection_listeners {
			listener(&self.selected);
		}
	}

	/// Drop matching entities from selection and highlight.
	fn forget_entities(&mut self, gone: impl Fn(&GraphEntity) -> bool) {
		if self.highlighted.as_ref().is_some_and(&gone) {
			self.highlighted = None;
		}
		if self.selected.iter().any(&gone) {
			let kept = self.selected.iter().filter(|e| !gone(e)).cloned().collect();
			self.replace_selection(kept);
		}
	}

	// ========================================================================
	// History
	// ========================================================================

	/// Apply an action and record it, dropping any redo tail.
	pub fn execute(&mut self, mut action: Box<dyn GraphAction>) -> Result<(), GraphError> {
		debug!("execute: {}", action.description());
		action.apply(self)?;
		self.history.record(action);
		self.request_render();
		Ok(())
	}

	/// Roll back the action before the cursor. Returns `false` if there is none.
	pub fn undo(&mut self) -> Result<bool, GraphError> {
		let mut history = std::mem::take(&mut self.history);
		let result = history.undo(self);
		self.history = history;
		if matches!(result, Ok(true)) {
			self.request_render();
		}
		result
	}

	/// Re-apply the action after the cursor. Returns `false` if there is none.
	pub fn redo(&mut self) -> Result<bool, GraphError> {
		let mut history = std::mem::take(&mut self.history);
		let result = history.redo(self);
		self.history = history;
		if matches!(result, Ok(true)) {
			self.request_render();
		}
		result
	}

	pub fn can_undo(&self) -> bool {
		self.history.can_undo()
	}

	pub fn can_redo(&self) -> bool {
		self.history.can_redo()
	}

	pub fn history(&self) -> &History {
		&self.history
	}

	// ========================================================================
	// Layout
	// ========================================================================

	pub fn automatic_layout_enabled(&self) -> bool {
		self.automatic_layout_enabled
	}

	/// Start the automatic layout. Overridden nodes stay pinned. The initial
	/// relaxation runs synchronously; [`GraphView::tick_layout`] continues it.
	pub fn start_graph_layout(&mut self) -> Result<(), GraphError> {
		let mut layout = LayoutAdapter::new(
			&self.nodes,
			&self.edges,
			&self.position_overrides,
			&self.layout_groups,
			&self.config.layout,
		)?;
		info!("layout started ({} nodes)", self.nodes.len());
		if layout.is_empty() {
			self.finish_layout();
			return Ok(());
		}
		layout.relax();
		layout.write_back(&mut self.nodes, &self.node_index);
		self.layout = Some(layout);
		self.layout_stale = false;
		self.automatic_layout_enabled = true;
		self.request_render();
		Ok(())
	}

	/// Cancel the layout. The next tick does nothing.
	pub fn stop_graph_layout(&mut self) {
		if self.layout.take().is_some() || self.automatic_layout_enabled {
			info!("layout stopped");
		}
		self.layout_stale = false;
		self.automatic_layout_enabled = false;
	}

	/// The running simulation, if any.
	pub fn layout(&self) -> Option<&LayoutAdapter> {
		self.layout.as_ref()
	}

	/// Advance the layout by one tick.
	///
	/// Position overrides set since the last tick are pinned first, so a node being
	/// dragged is never moved by the solver. If the graph changed structurally the
	/// simulation is rebuilt from the current nodes and keeps its tick budget.
	pub fn tick_layout(&mut self) -> Result<LayoutStatus, GraphError> {
		if self.layout.is_none() {
			return Ok(LayoutStatus::Finished);
		}
		if self.layout_stale {
			self.rebuild_layout()?;
		}
		let Some(layout) = self.layout.as_mut() else {
			return Ok(LayoutStatus::Finished);
		};
		layout.sync_overrides(&self.position_overrides);
		let status = layout.tick();
		layout.write_back(&mut self.nodes, &self.node_index);
		self.request_render();
		if status == LayoutStatus::Finished {
			self.finish_layout();
		}
		Ok(status)
	}

	fn rebuild_layout(&mut self) -> Result<(), GraphError> {
		self.layout_stale = false;
		let Some(previous) = self.layout.take() else {
			return Ok(());
		};
		let layout = match LayoutAdapter::new(
			&self.nodes,
			&self.edges,
			&self.position_overrides,
			&self.layout_groups,
			&self.config.layout,
		) {
			Ok(layout) => layout.resume_from(&previous),
			Err(err) => {
				self.finish_layout();
				return Err(err);
			}
		};
		debug!("layout rebuilt ({} nodes)", layout.nodes().len());
		self.layout = Some(layout);
		Ok(())
	}

	fn mark_layout_stale(&mut self) {
		if self.layout.is_some() {
			self.layout_stale = true;
		}
	}

	fn finish_layout(&mut self) {
		self.layout = None;
		self.layout_stale = false;
		self.automatic_layout_enabled = false;
		info!("layout finished");
	}

	// ========================================================================
	// Rendering requests
	// ========================================================================

	pub fn request_render(&mut self) {
		self.rendering_requested = true;
	}

	pub fn is_render_requested(&self) -> bool {
		self.rendering_requested
	}

	/// Clear the render request, returning whether one was pending.
	pub fn take_render_request(&mut self) -> bool {
		std::mem::take(&mut self.rendering_requested)
	}
}

fn build_index(nodes: &[Node]) -> Result<HashMap<String, usize>, GraphError> {
	let mut index = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		if index.insert(node.hash.clone(), i).is_some() {
			return Err(GraphError::DuplicateNode {
				hash: node.hash.clone(),
			});
		}
	}
	Ok(index)
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use proptest::prelude::*;

	use super::super::config::LayoutConfig;
	use super::super::history::{EdgeCreation, EdgeDeletion, NodeCreation, NodeDeletion, NodeMove};
	use super::*;

	fn node(hash: &str, x: f64, y: f64) -> Node {
		Node::new(hash, hash.to_uppercase(), "gene", x, y).with_size(100.0, 40.0)
	}

	fn view_with(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphView {
		let mut view = GraphView::headless();
		view.set_graph(Graph { nodes, edges }).unwrap();
		view
	}

	#[test]
	fn set_graph_rejects_bad_input_and_keeps_state() {
		let mut view = view_with(vec![node("a", 0.0, 0.0)], vec![]);
		let err = view.set_graph(Graph {
			nodes: vec![node("x", 0.0, 0.0), node("x", 1.0, 1.0)],
			edges: vec![],
		});
		assert_eq!(err, Err(GraphError::DuplicateNode { hash: "x".into() }));

		let err = view.set_graph(Graph {
			nodes: vec![node("x", 0.0, 0.0)],
			edges: vec![Edge::new("x", "y", None)],
		});
		assert_eq!(err, Err(GraphError::MissingNodeLink { hash: "y".into() }));
		assert!(view.get_node_by_hash("a").is_some());
	}

	#[test]
	fn add_node_rejects_duplicate_hash() {
		let mut view = view_with(vec![node("a", 0.0, 0.0)], vec![]);
		assert_eq!(
			view.add_node(node("a", 5.0, 5.0)),
			Err(GraphError::DuplicateNode { hash: "a".into() })
		);
		assert_eq!(view.nodes().len(), 1);
	}

	#[test]
	fn expect_node_reports_missing_link() {
		let view = GraphView::headless();
		assert_eq!(
			view.expect_node_by_hash("ghost").err(),
			Some(GraphError::MissingNodeLink { hash: "ghost".into() })
		);
	}

	#[test]
	fn add_edge_requires_both_endpoints() {
		let mut view = view_with(vec![node("a", 0.0, 0.0)], vec![]);
		assert_eq!(
			view.add_edge(Edge::new("a", "b", None)),
			Err(GraphError::MissingNodeLink { hash: "b".into() })
		);
		assert!(view.edges().is_empty());
	}

	#[test]
	fn remove_node_cascades_and_cleans_up() {
		let ab = Edge::new("a", "b", Some("binds"));
		let bc = Edge::new("b", "c", None);
		let ac = Edge::new("a", "c", None);
		let mut view = view_with(
			vec![node("a", 0.0, 0.0), node("b", 200.0, 0.0), node("c", 400.0, 0.0)],
			vec![ab.clone(), bc.clone(), ac.clone()],
		);
		view.select(vec![GraphEntity::Node("b".into()), GraphEntity::Edge(ac.clone())]);
		view.set_highlighted(Some(GraphEntity::Edge(bc.clone())));
		view.set_position_override("b", 1.0, 1.0);

		assert!(view.remove_node("b").unwrap());
		assert!(view.get_node_by_hash("b").is_none());
		assert_eq!(view.edges(), &[ac.clone()]);
		assert_eq!(view.selection(), &[GraphEntity::Edge(ac)]);
		assert_eq!(view.highlighted(), None);
		assert!(view.position_overrides().is_empty());
		assert_eq!(view.get_node_by_hash("c").map(|n| n.hash.as_str()), Some("c"));

		assert!(!view.remove_node("b").unwrap());
	}

	#[test]
	fn last_added_node_wins_hit_test() {
		let view = view_with(vec![node("a", 0.0, 0.0), node("b", 10.0, 0.0)], vec![]);
		let hit = view.get_node_at_position(view.nodes(), 5.0, 0.0);
		assert_eq!(hit.map(|n| n.hash.as_str()), Some("b"));
	}

	#[test]
	fn edges_hit_near_the_center_line() {
		let edge = Edge::new("a", "b", None);
		let view = view_with(
			vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)],
			vec![edge.clone()],
		);
		assert_eq!(
			view.get_entity_at_position(150.0, 1.5).unwrap(),
			Some(GraphEntity::Edge(edge))
		);
		assert_eq!(view.get_entity_at_position(150.0, 10.0).unwrap(), None);
		assert_eq!(
			view.get_entity_at_position(40.0, 0.0).unwrap(),
			Some(GraphEntity::Node("a".into()))
		);
	}

	#[test]
	fn bounding_box_covers_placed_nodes() {
		let view = view_with(vec![node("a", 0.0, 0.0), node("b", 300.0, 100.0)], vec![]);
		assert_eq!(
			view.bounding_box(view.nodes(), 5.0),
			Some(BoundingBox::new(-55.0, -25.0, 355.0, 125.0))
		);
		assert_eq!(view.bounding_box(&[], 5.0), None);
	}

	#[test]
	fn selection_listeners_see_changes() {
		let mut view = view_with(vec![node("a", 0.0, 0.0)], vec![]);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let id = view.subscribe_selection(move |sel| sink.borrow_mut().push(sel.len()));

		view.select(vec![GraphEntity::Node("a".into())]);
		view.select(Vec::new());
		assert!(view.unsubscribe_selection(id));
		view.select(vec![GraphEntity::Node("a".into())]);

		assert_eq!(*seen.borrow(), vec![1, 0]);
		assert!(view.is_any_selected(&[EntityRef::Node("a")]));
		assert!(!view.is_any_highlighted(&[EntityRef::Node("a")]));
	}

	#[test]
	fn undo_redo_boundaries_are_no_ops() {
		let mut view = view_with(vec![node("a", 0.0, 0.0)], vec![]);
		let before = view.snapshot();
		assert!(!view.undo().unwrap());
		assert_eq!(view.snapshot(), before);

		view.execute(Box::new(NodeMove::new("a", (0.0, 0.0), (5.0, 6.0))))
			.unwrap();
		let after = view.snapshot();
		assert!(!view.redo().unwrap());
		assert_eq!(view.snapshot(), after);

		assert!(view.undo().unwrap());
		assert_eq!(view.snapshot(), before);
		assert!(!view.undo().unwrap());
	}

	#[test]
	fn node_deletion_restores_edges_in_place() {
		let ab = Edge::new("a", "b", None);
		let cb = Edge::new("c", "b", None);
		let ca = Edge::new("c", "a", None);
		let mut view = view_with(
			vec![node("a", 0.0, 0.0), node("b", 200.0, 0.0), node("c", 400.0, 0.0)],
			vec![ab, cb, ca],
		);
		let before = view.snapshot();
		view.execute(Box::new(NodeDeletion::new("b"))).unwrap();
		assert_eq!(view.edges().len(), 1);
		view.undo().unwrap();
		assert_eq!(view.snapshot(), before);
	}

	#[test]
	fn failed_action_is_not_recorded() {
		let mut view = GraphView::headless();
		let result = view.execute(Box::new(EdgeCreation::new(Edge::new("a", "b", None))));
		assert!(result.is_err());
		assert!(!view.can_undo());
	}

	#[test]
	fn layout_on_empty_graph_finishes_immediately() {
		let mut view = GraphView::headless();
		view.start_graph_layout().unwrap();
		assert!(!view.automatic_layout_enabled());
		assert_eq!(view.tick_layout(), Ok(LayoutStatus::Finished));
	}

	#[test]
	fn stopped_layout_does_not_tick() {
		let mut view = view_with(
			vec![node("a", 0.0, 0.0), node("b", 50.0, 0.0)],
			vec![Edge::new("a", "b", None)],
		);
		view.start_graph_layout().unwrap();
		assert!(view.automatic_layout_enabled());
		view.stop_graph_layout();
		assert!(!view.automatic_layout_enabled());
		let frozen = view.snapshot();
		assert_eq!(view.tick_layout(), Ok(LayoutStatus::Finished));
		assert_eq!(view.snapshot(), frozen);
	}

	#[test]
	fn layout_runs_until_budget_and_clears_flag() {
		let mut view = view_with(
			vec![node("a", 0.0, 0.0), node("b", 50.0, 0.0), node("c", 0.0, 50.0)],
			vec![Edge::new("a", "b", None)],
		);
		view.start_graph_layout().unwrap();
		let mut ticks = 0;
		while view.tick_layout() == Ok(LayoutStatus::Running) {
			ticks += 1;
			assert!(ticks <= view.config().layout.max_ticks);
		}
		assert!(!view.automatic_layout_enabled());
		assert!(view.take_render_request());
		assert!(!view.take_render_request());
	}

	fn running_layout_view(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphView {
		let config = ViewerConfig {
			layout: LayoutConfig {
				settle_distance: 0.0,
				..LayoutConfig::default()
			},
			..ViewerConfig::default()
		};
		let mut view = GraphView::new(Box::new(super::super::test_support::RecordingContext::new()), config);
		view.set_graph(Graph { nodes, edges }).unwrap();
		view.start_graph_layout().unwrap();
		view
	}

	#[test]
	fn deleting_a_node_during_layout_rebuilds_the_simulation() {
		let mut view = running_layout_view(
			vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0), node("c", 0.0, 300.0)],
			vec![
				Edge::new("a", "b", None),
				Edge::new("b", "c", None),
				Edge::new("c", "a", None),
			],
		);
		for _ in 0..3 {
			view.tick_layout().unwrap();
		}

		view.execute(Box::new(NodeDeletion::new("a"))).unwrap();
		let before = (view.node_position("b"), view.node_position("c"));
		for _ in 0..5 {
			assert_eq!(view.tick_layout(), Ok(LayoutStatus::Running));
		}

		assert!(view.automatic_layout_enabled());
		let hashes: Vec<&str> = view
			.layout()
			.unwrap()
			.nodes()
			.iter()
			.map(|n| n.hash.as_str())
			.collect();
		assert_eq!(hashes, vec!["b", "c"]);
		assert_ne!(view.node_position("b"), before.0);
		assert_ne!(view.node_position("c"), before.1);
	}

	#[test]
	fn nodes_added_during_layout_join_the_simulation() {
		let mut view = running_layout_view(
			vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)],
			vec![Edge::new("a", "b", None)],
		);
		view.execute(Box::new(NodeCreation::new(node("c", 50.0, 400.0))))
			.unwrap();
		view.add_edge(Edge::new("c", "a", None)).unwrap();
		view.tick_layout().unwrap();
		view.tick_layout().unwrap();

		assert_eq!(view.layout().unwrap().nodes().len(), 3);
		assert_ne!(view.node_position("c"), Some((50.0, 400.0)));
	}

	#[test]
	fn override_set_during_layout_holds_the_node() {
		let mut view = running_layout_view(
			vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)],
			vec![Edge::new("a", "b", None)],
		);
		view.set_position_override("a", -120.0, 90.0);
		view.update_node_position("a", -120.0, 90.0).unwrap();
		for _ in 0..5 {
			view.tick_layout().unwrap();
		}
		assert_eq!(view.node_position("a"), Some((-120.0, 90.0)));
	}

	#[test]
	fn node_geometry_falls_back_to_drawn_size() {
		let mut view = view_with(
			vec![node("a", 10.0, 20.0), Node::new("b", "B", "gene", 0.0, 0.0)],
			vec![],
		);
		assert_eq!(
			view.node_geometry("a"),
			Some(NodeGeometry { x: 10.0, y: 20.0, width: 100.0, height: 40.0 })
		);
		let b = view.node_geometry("b").unwrap();
		let drawn = view.place_node(view.get_node_by_hash("b").unwrap()).bounding_box();
		assert_eq!((b.width, b.height), (drawn.width(), drawn.height()));

		let resized = NodeGeometry { x: 5.0, y: 5.0, width: 60.0, height: 30.0 };
		view.set_node_geometry("b", resized).unwrap();
		assert_eq!(view.node_geometry("b"), Some(resized));
		assert_eq!(
			view.set_node_geometry("zz", resized),
			Err(GraphError::UnknownNode { hash: "zz".into() })
		);
	}

	#[derive(Clone, Debug)]
	enum Op {
		AddNode(u8),
		RemoveNode(u8),
		AddEdge(u8, u8),
		RemoveEdge(u8),
		Move(u8, i16, i16),
	}

	fn op() -> impl Strategy<Value = Op> {
		prop_oneof![
			(0u8..8).prop_map(Op::AddNode),
			(0u8..8).prop_map(Op::RemoveNode),
			(0u8..8, 0u8..8).prop_map(|(a, b)| Op::AddEdge(a, b)),
			(0u8..16).prop_map(Op::RemoveEdge),
			(0u8..8, -500i16..500, -500i16..500).prop_map(|(n, x, y)| Op::Move(n, x, y)),
		]
	}

	fn boxed(action: impl GraphAction + 'static) -> Box<dyn GraphAction> {
		Box::new(action)
	}

	/// Turn an op into an action that is valid for the current state, if any.
	fn action_for(view: &GraphView, op: &Op) -> Option<Box<dyn GraphAction>> {
		let hash = |n: u8| format!("n{n}");
		let exists = |n: u8| view.get_node_by_hash(&hash(n)).is_some();
		match *op {
			Op::AddNode(n) if !exists(n) => {
				Some(boxed(NodeCreation::new(node(&hash(n), n as f64 * 10.0, 0.0))))
			}
			Op::RemoveNode(n) if exists(n) => Some(boxed(NodeDeletion::new(hash(n)))),
			Op::AddEdge(a, b) if exists(a) && exists(b) => {
				Some(boxed(EdgeCreation::new(Edge::new(hash(a), hash(b), None))))
			}
			Op::RemoveEdge(i) if !view.edges().is_empty() => {
				let edges = view.edges();
				Some(boxed(EdgeDeletion::new(edges[i as usize % edges.len()].clone())))
			}
			Op::Move(n, x, y) => view
				.node_position(&hash(n))
				.map(|from| boxed(NodeMove::new(hash(n), from, (x as f64, y as f64)))),
			_ => None,
		}
	}

	proptest! {
		#[test]
		fn undo_then_redo_restores_state(ops in prop::collection::vec(op(), 1..40)) {
			let mut view = GraphView::headless();
			let initial = view.snapshot();
			let mut executed = 0;
			for op in &ops {
				if let Some(action) = action_for(&view, op) {
					view.execute(action).unwrap();
					executed += 1;
				}
			}
			let after = view.snapshot();

			for _ in 0..executed {
				prop_assert!(view.undo().unwrap());
			}
			prop_assert_eq!(view.snapshot(), initial);
			prop_assert!(!view.undo().unwrap());

			for _ in 0..executed {
				prop_assert!(view.redo().unwrap());
			}
			prop_assert_eq!(view.snapshot(), after);
			prop_assert!(!view.redo().unwrap());
		}

		#[test]
		fn hashes_stay_unique(hashes in prop::collection::vec("[a-e]", 1..20)) {
			let mut view = GraphView::headless();
			let mut seen = std::collections::HashSet::new();
			for h in &hashes {
				let result = view.add_node(node(h, 0.0, 0.0));
				prop_assert_eq!(result.is_ok(), seen.insert(h.clone()));
			}
			for h in &seen {
				prop_assert!(view.remove_node(h).unwrap());
				prop_assert!(view.get_node_by_hash(h).is_none());
			}
			prop_assert!(view.nodes().is_empty());
		}

		#[test]
		fn removing_a_node_removes_its_edges(
			pairs in prop::collection::vec((0u8..6, 0u8..6), 0..30),
			victim in 0u8..6,
		) {
			let nodes = (0..6).map(|i| node(&format!("n{i}"), i as f64 * 150.0, 0.0)).collect();
			let edges = pairs
				.iter()
				.map(|(a, b)| Edge::new(format!("n{a}"), format!("n{b}"), None))
				.collect::<Vec<_>>();
			let mut view = view_with(nodes, edges.clone());
			let victim = format!("n{victim}");

			prop_assert!(view.remove_node(&victim).unwrap());
			prop_assert!(view.edges().iter().all(|e| !e.touches(&victim)));
			let survivors = edges.iter().filter(|e| !e.touches(&victim)).count();
			prop_assert_eq!(view.edges().len(), survivors);
		}
	}
}
