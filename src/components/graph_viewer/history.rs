//! Undoable graph edits.
//!
//! Every user-level change to the graph goes through a [`GraphAction`] so it can be
//! rolled back. [`History`] is a linear stack with a cursor: actions before the
//! cursor are applied, actions after it are the redo tail.

use log::debug;

use super::error::GraphError;
use super::types::{Edge, Node};
use super::view::{GraphView, NodeGeometry, RemovedNode};

/// Default number of actions kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// A reversible change to a [`GraphView`].
pub trait GraphAction {
	/// Short human-readable summary, e.g. for an undo menu.
	fn description(&self) -> String;

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError>;

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError>;
}

/// Adds a node.
pub struct NodeCreation {
	node: Node,
}

impl NodeCreation {
	pub fn new(node: Node) -> Self {
		Self { node }
	}
}

impl GraphAction for NodeCreation {
	fn description(&self) -> String {
		format!("Create node '{}'", self.node.display_name)
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		view.add_node(self.node.clone())
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		if view.remove_node(&self.node.hash)? {
			Ok(())
		} else {
			Err(GraphError::UnknownNode {
				hash: self.node.hash.clone(),
			})
		}
	}
}

/// Removes a node and every edge touching it. Rolling back restores the node and
/// its edges at their original positions.
pub struct NodeDeletion {
	hash: String,
	removed: Option<RemovedNode>,
}

impl NodeDeletion {
	pub fn new(hash: impl Into<String>) -> Self {
		Self {
			hash: hash.into(),
			removed: None,
		}
	}
}

impl GraphAction for NodeDeletion {
	fn description(&self) -> String {
		match &self.removed {
			Some(removed) => format!("Delete node '{}'", removed.node.display_name),
			None => format!("Delete node {}", self.hash),
		}
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		let removed = view
			.take_node(&self.hash)?
			.ok_or_else(|| GraphError::UnknownNode {
				hash: self.hash.clone(),
			})?;
		self.removed = Some(removed);
		Ok(())
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		let removed = self.removed.take().ok_or_else(|| GraphError::UnknownNode {
			hash: self.hash.clone(),
		})?;
		view.restore_node(removed)
	}
}

/// Adds an edge.
pub struct EdgeCreation {
	edge: Edge,
}

impl EdgeCreation {
	pub fn new(edge: Edge) -> Self {
		Self { edge }
	}
}

impl GraphAction for EdgeCreation {
	fn description(&self) -> String {
		match &self.edge.label {
			Some(label) => format!("Create edge '{label}'"),
			None => format!("Create edge {} -> {}", self.edge.from, self.edge.to),
		}
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		view.add_edge(self.edge.clone())
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		if view.remove_edge(&self.edge)? {
			Ok(())
		} else {
			Err(unknown_edge(&self.edge))
		}
	}
}

/// Removes an edge.
pub struct EdgeDeletion {
	edge: Edge,
	index: Option<usize>,
}

impl EdgeDeletion {
	pub fn new(edge: Edge) -> Self {
		Self { edge, index: None }
	}
}

impl GraphAction for EdgeDeletion {
	fn description(&self) -> String {
		format!("Delete edge {} -> {}", self.edge.from, self.edge.to)
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		let index = view
			.take_edge(&self.edge)?
			.ok_or_else(|| unknown_edge(&self.edge))?;
		self.index = Some(index);
		Ok(())
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		let index = self.index.take().ok_or_else(|| unknown_edge(&self.edge))?;
		view.insert_edge_at(index, self.edge.clone())
	}
}

/// Moves a node between two recorded positions.
pub struct NodeMove {
	hash: String,
	from: (f64, f64),
	to: (f64, f64),
}

impl NodeMove {
	pub fn new(hash: impl Into<String>, from: (f64, f64), to: (f64, f64)) -> Self {
		Self {
			hash: hash.into(),
			from,
			to,
		}
	}
}

impl GraphAction for NodeMove {
	fn description(&self) -> String {
		format!("Move node {}", self.hash)
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		view.update_node_position(&self.hash, self.to.0, self.to.1)
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		view.update_node_position(&self.hash, self.from.0, self.from.1)
	}
}

/// Changes a node's size, and its center with it, between two recorded geometries.
pub struct NodeResize {
	hash: String,
	from: NodeGeometry,
	to: NodeGeometry,
}

impl NodeResize {
	pub fn new(hash: impl Into<String>, from: NodeGeometry, to: NodeGeometry) -> Self {
		Self {
			hash: hash.into(),
			from,
			to,
		}
	}
}

impl GraphAction for NodeResize {
	fn description(&self) -> String {
		"Resize node".to_string()
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		view.set_node_geometry(&self.hash, self.to)
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		view.set_node_geometry(&self.hash, self.from)
	}
}

/// Several actions treated as one history entry. Applied in order, rolled back
/// in reverse.
pub struct CompoundAction {
	description: String,
	actions: Vec<Box<dyn GraphAction>>,
}

impl CompoundAction {
	pub fn new(description: impl Into<String>, actions: Vec<Box<dyn GraphAction>>) -> Self {
		Self {
			description: description.into(),
			actions,
		}
	}
}

impl GraphAction for CompoundAction {
	fn description(&self) -> String {
		self.description.clone()
	}

	fn apply(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		for i in 0..self.actions.len() {
			if let Err(err) = self.actions[i].apply(view) {
				for applied in self.actions[..i].iter_mut().rev() {
					applied.rollback(view)?;
				}
				return Err(err);
			}
		}
		Ok(())
	}

	fn rollback(&mut self, view: &mut GraphView) -> Result<(), GraphError> {
		for action in self.actions.iter_mut().rev() {
			action.rollback(view)?;
		}
		Ok(())
	}
}

fn unknown_edge(edge: &Edge) -> GraphError {
	GraphError::UnknownEdge {
		from: edge.from.clone(),
		to: edge.to.clone(),
	}
}

/// Linear undo stack with a cursor.
///
/// Invariant: `next_index <= actions.len()`. Entries at `next_index..` form the redo
/// tail and are dropped when a new action is recorded.
pub struct History {
	actions: Vec<Box<dyn GraphAction>>,
	next_index: usize,
	limit: usize,
}

impl Default for History {
	fn default() -> Self {
		Self::new(DEFAULT_HISTORY_LIMIT)
	}
}

impl History {
	/// An empty history keeping at most `limit` actions (at least one).
	pub fn new(limit: usize) -> Self {
		Self {
			actions: Vec::new(),
			next_index: 0,
			limit: limit.max(1),
		}
	}

	pub fn len(&self) -> usize {
		self.actions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}

	pub fn next_index(&self) -> usize {
		self.next_index
	}

	pub fn can_undo(&self) -> bool {
		self.next_index > 0
	}

	pub fn can_redo(&self) -> bool {
		self.next_index < self.actions.len()
	}

	/// Descriptions of every entry, oldest first.
	pub fn descriptions(&self) -> Vec<String> {
		self.actions.iter().map(|a| a.description()).collect()
	}

	/// Append an already applied action, dropping the redo tail and, past the
	/// limit, the oldest entries.
	pub(crate) fn record(&mut self, action: Box<dyn GraphAction>) {
		self.actions.truncate(self.next_index);
		self.actions.push(action);
		self.next_index = self.actions.len();

		if self.actions.len() > self.limit {
			let excess = self.actions.len() - self.limit;
			self.actions.drain(..excess);
			self.next_index -= excess;
			debug!("history: dropped {excess} oldest action(s)");
		}
	}

	pub(crate) fn undo(&mut self, view: &mut GraphView) -> Result<bool, GraphError> {
		if !self.can_undo() {
			return Ok(false);
		}
		self.actions[self.next_index - 1].rollback(view)?;
		self.next_index -= 1;
		Ok(true)
	}

	pub(crate) fn redo(&mut self, view: &mut GraphView) -> Result<bool, GraphError> {
		if !self.can_redo() {
			return Ok(false);
		}
		self.actions[self.next_index].apply(view)?;
		self.next_index += 1;
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Noop(&'static str);

	impl GraphAction for Noop {
		fn description(&self) -> String {
			self.0.to_string()
		}
		fn apply(&mut self, _view: &mut GraphView) -> Result<(), GraphError> {
			Ok(())
		}
		fn rollback(&mut self, _view: &mut GraphView) -> Result<(), GraphError> {
			Ok(())
		}
	}

	#[test]
	fn record_truncates_redo_tail() {
		let mut view = GraphView::headless();
		let mut history = History::new(10);
		history.record(Box::new(Noop("a")));
		history.record(Box::new(Noop("b")));
		assert!(history.undo(&mut view).unwrap());
		assert!(history.can_redo());

		history.record(Box::new(Noop("c")));
		assert_eq!(history.descriptions(), vec!["a", "c"]);
		assert!(!history.can_redo());
		assert_eq!(history.next_index(), 2);
	}

	#[test]
	fn limit_drops_oldest_and_keeps_cursor_valid() {
		let mut view = GraphView::headless();
		let mut history = History::new(2);
		for name in ["a", "b", "c"] {
			history.record(Box::new(Noop(name)));
		}
		assert_eq!(history.descriptions(), vec!["b", "c"]);
		assert_eq!(history.next_index(), 2);
		assert!(history.undo(&mut view).unwrap());
		assert!(history.undo(&mut view).unwrap());
		assert!(!history.undo(&mut view).unwrap());
	}

	#[test]
	fn failed_rollback_leaves_cursor_in_place() {
		let mut view = GraphView::headless();
		let mut history = History::new(10);
		// Recorded without being applied, so the rollback cannot find the node.
		history.record(Box::new(NodeCreation::new(Node::new("a", "A", "gene", 0.0, 0.0))));
		assert_eq!(
			history.undo(&mut view),
			Err(GraphError::UnknownNode { hash: "a".into() })
		);
		assert_eq!(history.next_index(), 1);
	}

	#[test]
	fn resize_round_trips_geometry() {
		let mut view = GraphView::headless();
		view.add_node(Node::new("a", "A", "gene", 0.0, 0.0).with_size(100.0, 40.0))
			.unwrap();
		let from = view.node_geometry("a").unwrap();
		let to = NodeGeometry {
			x: 10.0,
			width: 120.0,
			..from
		};
		let mut history = History::new(10);
		let mut action = NodeResize::new("a", from, to);
		action.apply(&mut view).unwrap();
		history.record(Box::new(action));
		assert_eq!(view.node_geometry("a"), Some(to));

		assert!(history.undo(&mut view).unwrap());
		assert_eq!(view.node_geometry("a"), Some(from));
		assert!(history.redo(&mut view).unwrap());
		assert_eq!(view.node_geometry("a"), Some(to));
		assert_eq!(history.descriptions(), vec!["Resize node"]);
	}
}
