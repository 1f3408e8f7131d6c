use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::layout::{LayoutKind, positions};
use crate::graph::GraphElement;

/// Small nodes stay clickable even when their radius shrinks below this.
pub const MIN_HIT_RADIUS: f64 = 12.0;
/// Opacity everything outside the hovered neighborhood fades towards.
pub const DIM_ALPHA: f64 = 0.1;

/// Per-node payload carried through the force graph.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label_lines: Vec<String>,
	pub radius: f64,
	pub url: String,
}

/// One drawable edge. `lane` is a signed slot separating parallel edges
/// between the same pair of nodes.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
	pub color: String,
	pub lane: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Everything the render loop needs. Rebuilt wholesale whenever elements,
/// colors or the layout change; dropping the old instance is the teardown.
pub struct GraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl GraphState {
	pub fn new(
		elements: &[GraphElement],
		colors: &HashMap<String, String>,
		layout: LayoutKind,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let nodes: Vec<(&str, &str, f64, &str)> = elements
			.iter()
			.filter_map(|element| match element {
				GraphElement::Node {
					id, label, size, url,
				} => Some((id.as_str(), label.as_str(), *size, url.as_str())),
				GraphElement::Edge { .. } => None,
			})
			.collect();

		let mut slot_of: HashMap<&str, usize> = HashMap::new();
		let radii: Vec<f64> = nodes
			.iter()
			.enumerate()
			.map(|(i, (id, _, size, _))| {
				slot_of.insert(*id, i);
				size / 2.0
			})
			.collect();

		let mut edge_slots = Vec::new();
		let mut raw_edges = Vec::new();
		for element in elements {
			if let GraphElement::Edge {
				source,
				target,
				label,
				style_class,
				..
			} = element
			{
				let (Some(&a), Some(&b)) = (slot_of.get(source.as_str()), slot_of.get(target.as_str()))
				else {
					continue;
				};
				edge_slots.push((a, b));
				raw_edges.push((a, b, label.as_str(), style_class.as_str()));
			}
		}

		let points = positions(layout, &radii, &edge_slots, width, height);
		let anchored = layout.is_anchored();

		let mut indices = Vec::with_capacity(nodes.len());
		for (i, (_, label, size, url)) in nodes.iter().enumerate() {
			let radius = size / 2.0;
			let idx = graph.add_node(NodeData {
				x: points[i].0 as f32,
				y: points[i].1 as f32,
				mass: (radius as f32).max(5.0),
				is_anchor: anchored,
				user_data: NodeInfo {
					label_lines: label.split('\n').map(str::to_owned).collect(),
					radius,
					url: (*url).to_owned(),
				},
			});
			indices.push(idx);
		}

		// Lane assignment: edges sharing an unordered node pair fan out into
		// adjacent lanes so they render as separate bezier bows.
		let mut pair_totals: HashMap<(usize, usize), usize> = HashMap::new();
		for &(a, b, _, _) in &raw_edges {
			*pair_totals.entry(pair_key(a, b)).or_insert(0) += 1;
		}
		let mut pair_seen: HashMap<(usize, usize), usize> = HashMap::new();
		let mut edges = Vec::with_capacity(raw_edges.len());
		for (a, b, label, style_class) in raw_edges {
			graph.add_edge(indices[a], indices[b], EdgeData::default());
			let key = pair_key(a, b);
			let slot = pair_seen.entry(key).or_insert(0);
			let total = pair_totals[&key];
			let lane = *slot as f64 - (total as f64 - 1.0) / 2.0;
			*slot += 1;
			edges.push(EdgeInfo {
				source: indices[a],
				target: indices[b],
				label: label.to_owned(),
				color: colors
					.get(style_class)
					.cloned()
					.unwrap_or_else(|| "#dddddd".to_owned()),
				lane,
			});
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit = node.data.user_data.radius.max(MIN_HIT_RADIUS);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	/// URL of the node under the cursor, if any. Empty URLs are treated as
	/// absent so activation on them is a no-op.
	pub fn url_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let idx = self.node_at_position(sx, sy)?;
		let mut url = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx && !node.data.user_data.url.is_empty() {
				url = Some(node.data.user_data.url.clone());
			}
		});
		url
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	/// Only edges touching the hovered node itself stay bright; an edge
	/// between two neighbors dims with the rest.
	pub fn is_edge_highlighted(&self, edge: &EdgeInfo) -> bool {
		self.is_hovered(edge.source) || self.is_hovered(edge.target)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
	if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, size: f64, url: &str) -> GraphElement {
		GraphElement::Node {
			id: id.to_owned(),
			label: format!("{id}\n\nCommits: 1\nNr. of languages: 1"),
			size,
			url: url.to_owned(),
		}
	}

	fn edge(a: &str, b: &str, language: &str) -> GraphElement {
		GraphElement::Edge {
			id: format!("{a}-{b}-{language}"),
			source: a.to_owned(),
			target: b.to_owned(),
			label: language.to_owned(),
			style_class: language.to_owned(),
		}
	}

	fn node_indices(state: &GraphState) -> Vec<DefaultNodeIdx> {
		let mut indices = Vec::new();
		state.graph.visit_nodes(|node| indices.push(node.index()));
		indices
	}

	#[test]
	fn parallel_edges_fan_into_distinct_lanes() {
		let elements = vec![
			node("a", 40.0, ""),
			node("b", 40.0, ""),
			edge("a", "b", "Go"),
			edge("a", "b", "Rust"),
		];
		let colors = HashMap::from([("Go".to_owned(), "#112233".to_owned())]);
		let state = GraphState::new(&elements, &colors, LayoutKind::Grid, 800.0, 600.0);

		assert_eq!(state.edges.len(), 2);
		assert!((state.edges[0].lane + 0.5).abs() < 1e-9);
		assert!((state.edges[1].lane - 0.5).abs() < 1e-9);
		assert_eq!(state.edges[0].color, "#112233");
		// A language missing from the mapping falls back to the neutral color.
		assert_eq!(state.edges[1].color, "#dddddd");
	}

	#[test]
	fn hover_highlights_the_node_its_edges_and_neighbors_only() {
		let elements = vec![
			node("a", 40.0, ""),
			node("b", 40.0, ""),
			node("c", 40.0, ""),
			edge("a", "b", "Go"),
		];
		let mut state =
			GraphState::new(&elements, &HashMap::new(), LayoutKind::Circle, 800.0, 600.0);
		let indices = node_indices(&state);
		let (a, b, c) = (indices[0], indices[1], indices[2]);

		state.set_hover(Some(a));
		assert!(state.is_highlighted(a));
		assert!(state.is_highlighted(b), "neighbor across the edge");
		assert!(!state.is_highlighted(c), "disconnected node dims");
		assert!(state.is_edge_highlighted(&state.edges[0]));

		// Leaving keeps the previous neighborhood only until the fade runs out.
		state.set_hover(None);
		for _ in 0..400 {
			state.tick(0.016);
		}
		assert!(!state.is_highlighted(a));
		assert!(!state.is_highlighted(b));
	}

	#[test]
	fn edges_between_two_neighbors_do_not_stay_bright() {
		let elements = vec![
			node("a", 40.0, ""),
			node("b", 40.0, ""),
			node("c", 40.0, ""),
			edge("a", "b", "Go"),
			edge("b", "c", "Go"),
		];
		let mut state =
			GraphState::new(&elements, &HashMap::new(), LayoutKind::Grid, 800.0, 600.0);
		let indices = node_indices(&state);

		state.set_hover(Some(indices[0]));
		assert!(state.is_edge_highlighted(&state.edges[0]));
		assert!(!state.is_edge_highlighted(&state.edges[1]));
	}
}
