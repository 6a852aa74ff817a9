use std::collections::HashSet;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;

pub const NODE_RADIUS: f64 = 8.0;
pub const HIT_RADIUS: f64 = 12.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: Vec<String>,
	pub color: String,
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	// identity: graph coordinates are page coordinates
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
enum Gesture {
	#[default]
	Idle,
	Drag {
		node: DefaultNodeIdx,
		grab_dx: f64,
		grab_dy: f64,
	},
	Pan {
		start_x: f64,
		start_y: f64,
		origin_x: f64,
		origin_y: f64,
	},
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	gesture: Gesture,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 60.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let indices: Vec<DefaultNodeIdx> = data
			.nodes
			.iter()
			.map(|node| {
				graph.add_node(NodeData {
					x: node.x as f32,
					y: node.y as f32,
					mass: 10.0,
					is_anchor: node.pinned,
					user_data: NodeInfo {
						label: node.label.clone(),
						color: node.color.clone(),
					},
				})
			})
			.collect();

		let mut edges = Vec::with_capacity(data.links.len());
		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (indices.get(link.source), indices.get(link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			transform: ViewTransform::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			gesture: Gesture::Idle,
			edges,
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
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Grab the node under the pointer, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.gesture = match self.node_at_position(sx, sy) {
			Some(idx) => {
				let mut grab = (0.0, 0.0);
				self.graph.visit_nodes(|node| {
					if node.index() == idx {
						grab = (node.x() as f64 - gx, node.y() as f64 - gy);
					}
				});
				Gesture::Drag {
					node: idx,
					grab_dx: grab.0,
					grab_dy: grab.1,
				}
			}
			None => Gesture::Pan {
				start_x: sx,
				start_y: sy,
				origin_x: self.transform.x,
				origin_y: self.transform.y,
			},
		};
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.gesture {
			Gesture::Idle => {
				let hovered = self.node_at_position(sx, sy);
				self.set_hover(hovered);
			}
			Gesture::Drag {
				node,
				grab_dx,
				grab_dy,
			} => {
				let (gx, gy) = self.screen_to_graph(sx, sy);
				let (nx, ny) = ((gx + grab_dx) as f32, (gy + grab_dy) as f32);
				self.graph.visit_nodes_mut(|n| {
					if n.index() == node {
						n.data.x = nx;
						n.data.y = ny;
						n.data.is_anchor = true;
					}
				});
			}
			Gesture::Pan {
				start_x,
				start_y,
				origin_x,
				origin_y,
			} => {
				self.transform.x = origin_x + (sx - start_x);
				self.transform.y = origin_y + (sy - start_y);
			}
		}
	}

	/// A dropped node stays where it was released.
	pub fn pointer_up(&mut self) {
		self.gesture = Gesture::Idle;
	}

	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.set_hover(None);
	}

	/// Zoom around the pointer, clamped to 0.1x..10x.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() && self.hover.highlight_t > 0.01
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 1.5 * dt as f64;
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn data() -> GraphData {
		let node = |x, y, pinned| GraphNode {
			label: if pinned { vec![".p".into()] } else { Vec::new() },
			color: "#1f77b4".into(),
			x,
			y,
			pinned,
		};
		GraphData {
			nodes: vec![node(400.0, 150.0, false), node(20.0, 20.0, true)],
			links: vec![
				GraphLink {
					source: 1,
					target: 0,
				},
				GraphLink {
					source: 1,
					target: 9,
				},
			],
		}
	}

	#[test]
	fn pinned_hubs_keep_their_slot_and_dangling_links_are_dropped() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		assert_eq!(state.edges.len(), 1);
		for _ in 0..10 {
			state.tick(0.016);
		}
		let hub = state.node_at_position(20.0, 20.0);
		assert!(hub.is_some());
	}

	#[test]
	fn hovering_a_hub_highlights_its_targets() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		state.pointer_move(21.0, 19.0);
		let hub = state.hover.node.unwrap();
		assert_eq!(state.hover.neighbors.len(), 1);
		assert!(state.is_highlighted(hub));
		state.pointer_leave();
		assert!(state.hover.node.is_none());
	}

	#[test]
	fn zoom_is_clamped_around_the_pointer() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		for _ in 0..100 {
			state.zoom_at(100.0, 100.0, -1.0);
		}
		assert_eq!(state.transform.k, 10.0);
		let (gx, gy) = state.screen_to_graph(100.0, 100.0);
		assert!((gx - 100.0).abs() < 1e-6 && (gy - 100.0).abs() < 1e-6);
	}
}
