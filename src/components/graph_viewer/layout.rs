//! Automatic layout adapter.
//!
//! Mirrors the graph into a `force_graph` simulation through plain
//! [`LayoutNode`] records. Solver positions are copied into the records after every
//! step and from there back into the real nodes by [`LayoutAdapter::write_back`],
//! matched by hash; nothing is shared by reference between the simulation and the
//! graph. Overrides set while the layout runs are pushed in with
//! [`LayoutAdapter::sync_overrides`].

use std::collections::{HashMap, HashSet};

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::config::LayoutConfig;
use super::error::GraphError;
use super::types::{Edge, LayoutGroup, Node};

/// Angle between successive seeds when spreading out coincident nodes.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
/// Radial step for spreading out coincident nodes.
const SEED_SPACING: f64 = 10.0;

/// Index of a [`LayoutNode`] carried as simulation user data.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutNodeRef(usize);

/// Solver-side view of one graph node.
#[derive(Clone, Debug)]
pub struct LayoutNode {
	pub hash: String,
	pub x: f64,
	pub y: f64,
	/// Pinned at its override coordinate; the solver never moves it.
	pub fixed: bool,
}

/// Whether the layout wants more ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStatus {
	Running,
	Finished,
}

/// A running force simulation over a snapshot of the graph.
pub struct LayoutAdapter {
	sim: ForceGraph<LayoutNodeRef, ()>,
	nodes: Vec<LayoutNode>,
	groups: Vec<Vec<usize>>,
	config: LayoutConfig,
	ticks: usize,
}

impl LayoutAdapter {
	/// Build the simulation. Nodes with a position override become anchors at the
	/// override coordinate. Edges must reference nodes in `nodes`.
	pub fn new(
		nodes: &[Node],
		edges: &[Edge],
		overrides: &HashMap<String, (f64, f64)>,
		groups: &[LayoutGroup],
		config: &LayoutConfig,
	) -> Result<Self, GraphError> {
		let mut sim = ForceGraph::new(SimulationParameters {
			force_charge: config.force_charge,
			force_spring: config.force_spring,
			force_max: config.force_max,
			node_speed: config.node_speed,
			damping_factor: config.damping_factor,
		});

		let mut by_hash = HashMap::new();
		let mut occupied: HashMap<(i64, i64), usize> = HashMap::new();
		let mut layout_nodes = Vec::with_capacity(nodes.len());

		for node in nodes {
			let pinned = overrides.get(&node.hash).copied();
			let (mut x, mut y) = pinned.unwrap_or((node.data.x, node.data.y));

			// Coincident nodes would exert no direction on each other.
			if pinned.is_none() {
				let key = (x.round() as i64, y.round() as i64);
				let seen = occupied.entry(key).or_insert(0);
				if *seen > 0 {
					let n = *seen as f64;
					let r = SEED_SPACING * n.sqrt();
					x += r * (n * GOLDEN_ANGLE).cos();
					y += r * (n * GOLDEN_ANGLE).sin();
				}
				*seen += 1;
			}

			let sim_idx = sim.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: config.node_mass,
				is_anchor: pinned.is_some(),
				user_data: LayoutNodeRef(layout_nodes.len()),
			});
			by_hash.insert(node.hash.as_str(), (layout_nodes.len(), sim_idx));
			layout_nodes.push(LayoutNode {
				hash: node.hash.clone(),
				x,
				y,
				fixed: pinned.is_some(),
			});
		}

		let resolve = |hash: &str| {
			by_hash
				.get(hash)
				.copied()
				.ok_or_else(|| GraphError::MissingNodeLink {
					hash: hash.to_string(),
				})
		};
		for edge in edges {
			let (_, source) = resolve(&edge.from)?;
			let (_, target) = resolve(&edge.to)?;
			sim.add_edge(source, target, EdgeData::default());
		}

		let groups = groups
			.iter()
			.map(|g| {
				let mut seen = HashSet::new();
				g.leaves
					.iter()
					.filter_map(|hash| by_hash.get(hash.as_str()).map(|&(i, _)| i))
					.filter(|i| seen.insert(*i))
					.collect::<Vec<_>>()
			})
			.filter(|members| members.len() > 1)
			.collect();

		Ok(Self {
			sim,
			nodes: layout_nodes,
			groups,
			config: config.clone(),
			ticks: 0,
		})
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn ticks(&self) -> usize {
		self.ticks
	}

	/// Continue the tick budget of a layout this one replaces.
	pub fn resume_from(mut self, previous: &LayoutAdapter) -> Self {
		self.ticks = previous.ticks;
		self
	}

	/// Pin nodes that have an override at that coordinate and release the ones
	/// whose override is gone.
	pub fn sync_overrides(&mut self, overrides: &HashMap<String, (f64, f64)>) {
		for n in &mut self.nodes {
			match overrides.get(&n.hash) {
				Some(&(x, y)) => {
					n.x = x;
					n.y = y;
					n.fixed = true;
				}
				None => n.fixed = false,
			}
		}
		let nodes = &self.nodes;
		self.sim.visit_nodes_mut(|node| {
			let LayoutNodeRef(i) = node.data.user_data;
			if let Some(n) = nodes.get(i) {
				node.data.x = n.x as f32;
				node.data.y = n.y as f32;
				node.data.is_anchor = n.fixed;
			}
		});
	}

	/// Run the synchronous relaxation that precedes animated ticks.
	pub fn relax(&mut self) {
		for _ in 0..self.config.initial_iterations {
			self.step();
		}
	}

	/// Advance one animated tick.
	pub fn tick(&mut self) -> LayoutStatus {
		if self.nodes.is_empty() || self.ticks >= self.config.max_ticks {
			return LayoutStatus::Finished;
		}
		self.ticks += 1;
		let moved = self.step();
		if moved < self.config.settle_distance || self.ticks >= self.config.max_ticks {
			LayoutStatus::Finished
		} else {
			LayoutStatus::Running
		}
	}

	/// One solver step plus group cohesion. Returns the largest distance any node
	/// moved.
	fn step(&mut self) -> f64 {
		let before: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();

		self.sim.update(self.config.step);
		self.pull_from_sim();
		if self.apply_group_cohesion() {
			self.push_to_sim();
		}

		self.nodes
			.iter()
			.zip(before)
			.map(|(n, (x, y))| (n.x - x).hypot(n.y - y))
			.fold(0.0, f64::max)
	}

	fn pull_from_sim(&mut self) {
		let nodes = &mut self.nodes;
		self.sim.visit_nodes(|node| {
			let LayoutNodeRef(i) = node.data.user_data;
			if let Some(n) = nodes.get_mut(i) {
				if !n.fixed {
					n.x = node.x() as f64;
					n.y = node.y() as f64;
				}
			}
		});
	}

	fn push_to_sim(&mut self) {
		let nodes = &self.nodes;
		self.sim.visit_nodes_mut(|node| {
			let LayoutNodeRef(i) = node.data.user_data;
			if let Some(n) = nodes.get(i) {
				node.data.x = n.x as f32;
				node.data.y = n.y as f32;
			}
		});
	}

	/// Nudge free group members toward their group's centroid.
	fn apply_group_cohesion(&mut self) -> bool {
		let strength = self.config.group_cohesion;
		if strength <= 0.0 || self.groups.is_empty() {
			return false;
		}
		for members in &self.groups {
			let count = members.len() as f64;
			let (sx, sy) = members
				.iter()
				.fold((0.0, 0.0), |(sx, sy), &i| (sx + self.nodes[i].x, sy + self.nodes[i].y));
			let (cx, cy) = (sx / count, sy / count);
			for &i in members {
				let n = &mut self.nodes[i];
				if !n.fixed {
					n.x += (cx - n.x) * strength;
					n.y += (cy - n.y) * strength;
				}
			}
		}
		true
	}

	/// Copy positions into the graph's nodes. `index` maps hashes to positions in
	/// `nodes`; simulated nodes that are no longer in the graph are skipped.
	pub fn write_back(&self, nodes: &mut [Node], index: &HashMap<String, usize>) {
		for n in &self.nodes {
			let Some(node) = index.get(&n.hash).and_then(|&i| nodes.get_mut(i)) else {
				continue;
			};
			if node.hash == n.hash {
				node.data.x = n.x;
				node.data.y = n.y;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn index_of(nodes: &[Node]) -> HashMap<String, usize> {
		nodes.iter().enumerate().map(|(i, n)| (n.hash.clone(), i)).collect()
	}

	fn triangle() -> (Vec<Node>, Vec<Edge>) {
		let nodes = vec![
			Node::new("a", "A", "gene", 0.0, 0.0),
			Node::new("b", "B", "gene", 40.0, 0.0),
			Node::new("c", "C", "gene", 0.0, 40.0),
		];
		let edges = vec![Edge::new("a", "b", None), Edge::new("b", "c", None)];
		(nodes, edges)
	}

	#[test]
	fn dangling_edge_is_rejected() {
		let (nodes, _) = triangle();
		let edges = vec![Edge::new("a", "zzz", None)];
		let err = LayoutAdapter::new(&nodes, &edges, &HashMap::new(), &[], &LayoutConfig::default())
			.err()
			.unwrap();
		assert_eq!(err, GraphError::MissingNodeLink { hash: "zzz".into() });
	}

	#[test]
	fn pinned_nodes_stay_at_override() {
		let (mut nodes, edges) = triangle();
		let overrides = HashMap::from([("a".to_string(), (-30.0, 15.0))]);
		let mut layout =
			LayoutAdapter::new(&nodes, &edges, &overrides, &[], &LayoutConfig::default()).unwrap();
		layout.relax();
		for _ in 0..20 {
			layout.tick();
		}
		let index = index_of(&nodes);
		layout.write_back(&mut nodes, &index);
		assert_eq!((nodes[0].data.x, nodes[0].data.y), (-30.0, 15.0));
		assert!(layout.nodes()[0].fixed);
		assert!(!layout.nodes()[1].fixed);
	}

	#[test]
	fn overrides_set_after_start_pin_and_release() {
		let (nodes, edges) = triangle();
		let config = LayoutConfig {
			settle_distance: 0.0,
			..LayoutConfig::default()
		};
		let mut layout = LayoutAdapter::new(&nodes, &edges, &HashMap::new(), &[], &config).unwrap();
		layout.tick();

		let held = HashMap::from([("b".to_string(), (250.0, -80.0))]);
		for _ in 0..10 {
			layout.sync_overrides(&held);
			layout.tick();
		}
		let b = &layout.nodes()[1];
		assert!(b.fixed);
		assert_eq!((b.x, b.y), (250.0, -80.0));

		layout.sync_overrides(&HashMap::new());
		layout.tick();
		let b = &layout.nodes()[1];
		assert!(!b.fixed);
		assert_ne!((b.x, b.y), (250.0, -80.0));
	}

	#[test]
	fn write_back_matches_by_hash() {
		let (nodes, edges) = triangle();
		let mut layout =
			LayoutAdapter::new(&nodes, &edges, &HashMap::new(), &[], &LayoutConfig::default()).unwrap();
		layout.relax();
		let expected_c = (layout.nodes()[2].x, layout.nodes()[2].y);

		// "a" was removed from the graph after the simulation was built.
		let mut remaining = vec![nodes[2].clone(), nodes[1].clone()];
		let index = index_of(&remaining);
		layout.write_back(&mut remaining, &index);
		assert_eq!((remaining[0].data.x, remaining[0].data.y), expected_c);
		assert_eq!(remaining.len(), 2);
	}

	#[test]
	fn resumed_layout_keeps_its_tick_budget() {
		let (nodes, edges) = triangle();
		let config = LayoutConfig {
			max_ticks: 4,
			settle_distance: 0.0,
			..LayoutConfig::default()
		};
		let mut first = LayoutAdapter::new(&nodes, &edges, &HashMap::new(), &[], &config).unwrap();
		first.tick();
		first.tick();
		let mut second = LayoutAdapter::new(&nodes[..2], &edges[..1], &HashMap::new(), &[], &config)
			.unwrap()
			.resume_from(&first);
		assert_eq!(second.ticks(), 2);
		assert_eq!(second.tick(), LayoutStatus::Running);
		assert_eq!(second.tick(), LayoutStatus::Finished);
	}

	#[test]
	fn coincident_nodes_are_spread_apart() {
		let nodes = vec![
			Node::new("a", "A", "gene", 0.0, 0.0),
			Node::new("b", "B", "gene", 0.0, 0.0),
		];
		let layout =
			LayoutAdapter::new(&nodes, &[], &HashMap::new(), &[], &LayoutConfig::default()).unwrap();
		let (a, b) = (&layout.nodes()[0], &layout.nodes()[1]);
		assert!((a.x - b.x).hypot(a.y - b.y) > 1.0);
	}

	#[test]
	fn tick_budget_is_bounded() {
		let (nodes, edges) = triangle();
		let config = LayoutConfig {
			max_ticks: 3,
			settle_distance: 0.0,
			..LayoutConfig::default()
		};
		let mut layout = LayoutAdapter::new(&nodes, &edges, &HashMap::new(), &[], &config).unwrap();
		assert_eq!(layout.tick(), LayoutStatus::Running);
		assert_eq!(layout.tick(), LayoutStatus::Running);
		assert_eq!(layout.tick(), LayoutStatus::Finished);
		assert_eq!(layout.tick(), LayoutStatus::Finished);
	}

	#[test]
	fn empty_graph_finishes_immediately() {
		let mut layout =
			LayoutAdapter::new(&[], &[], &HashMap::new(), &[], &LayoutConfig::default()).unwrap();
		assert!(layout.is_empty());
		layout.relax();
		assert_eq!(layout.tick(), LayoutStatus::Finished);
	}

	#[test]
	fn groups_with_unknown_or_single_members_are_ignored() {
		let (nodes, edges) = triangle();
		let groups = vec![
			LayoutGroup {
				name: "solo".into(),
				color: None,
				leaves: vec!["a".into(), "missing".into()],
			},
			LayoutGroup {
				name: "pair".into(),
				color: None,
				leaves: vec!["b".into(), "c".into()],
			},
		];
		let layout =
			LayoutAdapter::new(&nodes, &edges, &HashMap::new(), &groups, &LayoutConfig::default())
				.unwrap();
		assert_eq!(layout.groups, vec![vec![1, 2]]);
	}
}
