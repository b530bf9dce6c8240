//! Copy and paste.
//!
//! Ctrl+C serializes the selected nodes and edges into
//! [`InteractionState::clipboard`]; the browser glue hands that text to the system
//! clipboard. A paste of our own format recreates the copied nodes under fresh
//! hashes around the pointer, together with every copied edge whose ends were both
//! copied. Any other text becomes a note node. Repeated pastes at the same spot
//! cascade diagonally so they do not stack.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::behaviors::{BehaviorResult, CanvasBehavior, Handled, InteractionState, KeyPress, PasteEvent};
use super::geometry::Point;
use super::history::{CompoundAction, EdgeCreation, GraphAction, NodeCreation};
use super::types::{Edge, GraphEntity, Node};
use super::view::GraphView;

/// Marks clipboard text as ours.
pub const CLIPBOARD_FORMAT: &str = "LifelikeKnowledgeMap/1";
/// Offset between cascaded pastes, and the pointer travel below which a paste
/// continues the cascade.
pub const CASCADE_OFFSET: f64 = 50.0;
/// Longest note title taken from pasted text, in characters.
const NOTE_TITLE_LENGTH: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "entity", rename_all = "lowercase")]
enum ClipboardEntity {
	Node(Node),
	Edge(Edge),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct ClipboardData {
	#[serde(rename = "type")]
	format: String,
	selection: Vec<ClipboardEntity>,
}

/// Copy on Ctrl+C, paste on the platform's paste event.
#[derive(Clone, Debug, Default)]
pub struct ClipboardShortcut {
	burst: Option<Point>,
	burst_iteration: u32,
	next_id: u64,
}

impl ClipboardShortcut {
	pub const KEY: &'static str = "clipboard-keyboard-shortcut";
	pub const PRIORITY: i32 = 0;

	/// Where the next paste lands. Pasting again near the previous burst steps
	/// diagonally away from it.
	fn paste_position(&mut self, pointer: Point) -> Point {
		if let Some(burst) = self.burst {
			let travel = (pointer.x - burst.x).abs() + (pointer.y - burst.y).abs();
			if travel <= CASCADE_OFFSET {
				self.burst_iteration += 1;
				let step = self.burst_iteration as f64 * CASCADE_OFFSET;
				return Point::new(burst.x + step, burst.y + step);
			}
		}
		self.burst = Some(pointer);
		self.burst_iteration = 0;
		pointer
	}

	fn fresh_hash(&mut self, view: &GraphView) -> String {
		loop {
			self.next_id += 1;
			let hash = format!("pasted-{}", self.next_id);
			if view.get_node_by_hash(&hash).is_none() {
				return hash;
			}
		}
	}

	fn copy(view: &GraphView) -> Result<Option<String>, serde_json::Error> {
		let selection: Vec<ClipboardEntity> = view
			.selection()
			.iter()
			.filter_map(|entity| match entity {
				GraphEntity::Node(hash) => view.get_node_by_hash(hash).cloned().map(ClipboardEntity::Node),
				GraphEntity::Edge(edge) => Some(ClipboardEntity::Edge(edge.clone())),
			})
			.collect();
		if selection.is_empty() {
			return Ok(None);
		}
		let data = ClipboardData {
			format: CLIPBOARD_FORMAT.to_string(),
			selection,
		};
		serde_json::to_string(&data).map(Some)
	}

	/// Actions recreating copied entities centered on `at`, or `None` when the
	/// text is not a copy of ours with at least one node.
	fn paste_copied(
		&mut self,
		view: &GraphView,
		content: &str,
		at: Point,
	) -> Option<Vec<Box<dyn GraphAction>>> {
		let data: ClipboardData = serde_json::from_str(content).ok()?;
		if data.format != CLIPBOARD_FORMAT {
			return None;
		}
		let (nodes, edges): (Vec<_>, Vec<_>) = data
			.selection
			.into_iter()
			.partition(|e| matches!(e, ClipboardEntity::Node(_)));
		let nodes: Vec<Node> = nodes
			.into_iter()
			.filter_map(|e| match e {
				ClipboardEntity::Node(n) => Some(n),
				ClipboardEntity::Edge(_) => None,
			})
			.collect();
		if nodes.is_empty() {
			return None;
		}

		let count = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), n| (sx + n.data.x, sy + n.data.y));
		let (cx, cy) = (sx / count, sy / count);

		let mut renamed = HashMap::new();
		let mut actions: Vec<Box<dyn GraphAction>> = Vec::new();
		for mut node in nodes {
			if renamed.contains_key(&node.hash) {
				continue;
			}
			let copied_hash = std::mem::replace(&mut node.hash, self.fresh_hash(view));
			renamed.insert(copied_hash, node.hash.clone());
			node.data.x += at.x - cx;
			node.data.y += at.y - cy;
			actions.push(Box::new(NodeCreation::new(node)));
		}

		let mut seen = HashSet::new();
		for entity in edges {
			let ClipboardEntity::Edge(edge) = entity else {
				continue;
			};
			let (Some(from), Some(to)) = (renamed.get(&edge.from), renamed.get(&edge.to)) else {
				continue;
			};
			let edge = Edge {
				id: None,
				from: from.clone(),
				to: to.clone(),
				..edge
			};
			if seen.insert((edge.from.clone(), edge.to.clone(), edge.label.clone())) {
				actions.push(Box::new(EdgeCreation::new(edge)));
			}
		}
		Some(actions)
	}

	/// A note holding arbitrary pasted text.
	fn note(&mut self, view: &GraphView, content: &str, at: Point) -> Node {
		let title = truncate(content, NOTE_TITLE_LENGTH);
		let mut note = Node::new(self.fresh_hash(view), title, "note", at.x, at.y);
		note.data
			.extra
			.insert("detail".to_string(), Value::String(content.to_string()));
		note
	}
}

/// At most `max` characters, ending in an ellipsis when shortened.
fn truncate(text: &str, max: usize) -> String {
	let text = text.trim();
	if text.chars().count() <= max {
		return text.to_string();
	}
	let kept: String = text.chars().take(max.saturating_sub(1)).collect();
	format!("{}\u{2026}", kept.trim_end())
}

impl CanvasBehavior for ClipboardShortcut {
	fn key_down(&mut self, view: &mut GraphView, state: &mut InteractionState, key: KeyPress<'_>) -> Handled {
		if !(key.ctrl && key.key.eq_ignore_ascii_case("c")) {
			return Ok(BehaviorResult::Continue);
		}
		match Self::copy(view) {
			Ok(Some(text)) => {
				debug!("copied {} selected item(s)", view.selection().len());
				state.clipboard = Some(text);
				Ok(BehaviorResult::Stop)
			}
			Ok(None) => Ok(BehaviorResult::Continue),
			Err(err) => {
				warn!("could not serialize selection: {err}");
				Ok(BehaviorResult::Continue)
			}
		}
	}

	fn paste(&mut self, view: &mut GraphView, state: &mut InteractionState, event: &PasteEvent) -> Handled {
		let content = event
			.text
			.clone()
			.filter(|t| !t.trim().is_empty())
			.or_else(|| state.clipboard.clone());
		let (Some(content), Some(pointer)) = (content, event.position) else {
			return Ok(BehaviorResult::Continue);
		};
		let at = self.paste_position(pointer);

		let action: Box<dyn GraphAction> = match self.paste_copied(view, &content, at) {
			Some(actions) => Box::new(CompoundAction::new("Paste content", actions)),
			None => Box::new(NodeCreation::new(self.note(view, &content, at))),
		};
		view.select(Vec::new());
		view.execute(action)?;
		Ok(BehaviorResult::Stop)
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::Graph;
	use super::*;

	fn view() -> GraphView {
		let mut view = GraphView::headless();
		view.set_graph(Graph {
			nodes: vec![
				Node::new("a", "A", "gene", 0.0, 0.0),
				Node::new("b", "B", "gene", 200.0, 0.0),
				Node::new("c", "C", "gene", 0.0, 200.0),
			],
			edges: vec![Edge::new("a", "b", Some("binds")), Edge::new("b", "c", None)],
		})
		.unwrap();
		view
	}

	fn ctrl_c() -> KeyPress<'static> {
		KeyPress { key: "c", ctrl: true }
	}

	fn paste_at(text: Option<&str>, x: f64, y: f64) -> PasteEvent {
		PasteEvent {
			text: text.map(str::to_string),
			position: Some(Point::new(x, y)),
		}
	}

	#[test]
	fn copy_needs_a_selection() {
		let mut view = view();
		let mut state = InteractionState::default();
		let mut clipboard = ClipboardShortcut::default();
		let result = clipboard.key_down(&mut view, &mut state, ctrl_c()).unwrap();
		assert_eq!(result, BehaviorResult::Continue);
		assert!(state.clipboard.is_none());

		let plain_c = KeyPress { key: "c", ctrl: false };
		view.select(vec![GraphEntity::Node("a".into())]);
		clipboard.key_down(&mut view, &mut state, plain_c).unwrap();
		assert!(state.clipboard.is_none());
	}

	#[test]
	fn pasted_copy_gets_fresh_hashes_and_keeps_inner_edges() {
		let mut view = view();
		let mut state = InteractionState::default();
		let mut clipboard = ClipboardShortcut::default();
		view.select(vec![
			GraphEntity::Node("a".into()),
			GraphEntity::Node("b".into()),
			GraphEntity::Edge(Edge::new("a", "b", Some("binds"))),
			GraphEntity::Edge(Edge::new("b", "c", None)),
		]);
		assert_eq!(
			clipboard.key_down(&mut view, &mut state, ctrl_c()).unwrap(),
			BehaviorResult::Stop
		);
		let copied = state.clipboard.clone().unwrap();
		assert!(copied.contains(CLIPBOARD_FORMAT));

		let result = clipboard
			.paste(&mut view, &mut state, &paste_at(Some(&copied), 500.0, 500.0))
			.unwrap();
		assert_eq!(result, BehaviorResult::Stop);

		assert_eq!(view.nodes().len(), 5);
		assert_eq!(view.node_position("pasted-1"), Some((400.0, 500.0)));
		assert_eq!(view.node_position("pasted-2"), Some((600.0, 500.0)));
		// b -> c is dropped: c was not copied.
		let pasted: Vec<&Edge> = view.edges().iter().filter(|e| e.from.starts_with("pasted")).collect();
		assert_eq!(pasted.len(), 1);
		assert_eq!((pasted[0].from.as_str(), pasted[0].to.as_str()), ("pasted-1", "pasted-2"));
		assert_eq!(pasted[0].label.as_deref(), Some("binds"));
		assert!(view.selection().is_empty());

		assert_eq!(view.history().len(), 1);
		assert!(view.undo().unwrap());
		assert_eq!(view.nodes().len(), 3);
		assert_eq!(view.edges().len(), 2);
	}

	#[test]
	fn repeated_pastes_cascade_until_the_pointer_moves_away() {
		let mut view = view();
		let mut state = InteractionState {
			clipboard: Some("reminder".into()),
			..InteractionState::default()
		};
		let mut clipboard = ClipboardShortcut::default();
		for _ in 0..3 {
			clipboard.paste(&mut view, &mut state, &paste_at(None, 10.0, 10.0)).unwrap();
		}
		assert_eq!(view.node_position("pasted-1"), Some((10.0, 10.0)));
		assert_eq!(view.node_position("pasted-2"), Some((60.0, 60.0)));
		assert_eq!(view.node_position("pasted-3"), Some((110.0, 110.0)));

		clipboard.paste(&mut view, &mut state, &paste_at(None, 400.0, 10.0)).unwrap();
		assert_eq!(view.node_position("pasted-4"), Some((400.0, 10.0)));
	}

	#[test]
	fn plain_text_becomes_a_note() {
		let mut view = view();
		let mut state = InteractionState::default();
		let mut clipboard = ClipboardShortcut::default();
		let text = "BRCA1 variants raise breast cancer risk";
		clipboard
			.paste(&mut view, &mut state, &paste_at(Some(text), 5.0, 5.0))
			.unwrap();

		let note = view.get_node_by_hash("pasted-1").unwrap();
		assert_eq!(note.label, "note");
		assert_eq!(note.display_name, "BRCA1 variants rais\u{2026}");
		assert_eq!(note.display_name.chars().count(), 20);
		assert_eq!(note.data.extra.get("detail"), Some(&Value::String(text.into())));
	}

	#[test]
	fn paste_without_pointer_or_content_is_ignored() {
		let mut view = view();
		let mut state = InteractionState::default();
		let mut clipboard = ClipboardShortcut::default();
		let no_pointer = PasteEvent {
			text: Some("x".into()),
			position: None,
		};
		assert_eq!(
			clipboard.paste(&mut view, &mut state, &no_pointer).unwrap(),
			BehaviorResult::Continue
		);
		assert_eq!(
			clipboard.paste(&mut view, &mut state, &paste_at(Some("  "), 0.0, 0.0)).unwrap(),
			BehaviorResult::Continue
		);
		assert_eq!(view.nodes().len(), 3);
	}

	#[test]
	fn fresh_hashes_skip_existing_nodes() {
		let mut view = view();
		view.add_node(Node::new("pasted-1", "Old", "gene", 0.0, 0.0)).unwrap();
		let mut clipboard = ClipboardShortcut::default();
		assert_eq!(clipboard.fresh_hash(&view), "pasted-2");
	}

	#[test]
	fn short_text_is_kept_whole() {
		assert_eq!(truncate("  TP53  ", 20), "TP53");
		assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
	}
}
