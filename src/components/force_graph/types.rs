use super::render::LABEL_ROW;
use crate::extract::{Category, Node, StyleGraph};

const FONT_COLOR: &str = "#1f77b4";
const BOX_COLOR: &str = "#ff7f0e";
// advance of the 14px monospace label font, plus the box padding
const LABEL_CHAR: f64 = 8.5;
const LABEL_PAD: f64 = 8.0;
// room left for target circles and the label box border
const EDGE_MARGIN: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Label rows; empty for target nodes.
	pub label: Vec<String>,
	pub color: String,
	pub x: f64,
	pub y: f64,
	/// Hubs stay where the label planner put them; targets float.
	pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: usize,
	pub target: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Bottom-right corner of everything drawn at the initial positions,
	/// label boxes included.
	pub fn extent(&self) -> (f64, f64) {
		self.nodes.iter().fold((0.0_f64, 0.0_f64), |(w, h), node| {
			let chars = node.label.iter().map(|l| l.chars().count()).max().unwrap_or(0);
			let right = node.x + chars as f64 * LABEL_CHAR + LABEL_PAD + EDGE_MARGIN;
			let bottom = node.y + node.label.len() as f64 * LABEL_ROW + EDGE_MARGIN;
			(w.max(right), h.max(bottom))
		})
	}
}

impl From<&StyleGraph> for GraphData {
	fn from(graph: &StyleGraph) -> Self {
		let nodes = graph
			.nodes
			.iter()
			.map(|node| {
				let (x, y) = node.position();
				let color = match node.category() {
					Category::Font => FONT_COLOR,
					Category::Box => BOX_COLOR,
				};
				let label = match node {
					Node::Font(hub) | Node::Box(hub) => hub
						.text
						.lines()
						.map(str::trim)
						.map(String::from)
						.chain(std::iter::once(hub.selector.clone()))
						.collect(),
					_ => Vec::new(),
				};
				GraphNode {
					label,
					color: color.into(),
					x,
					y,
					pinned: node.is_hub(),
				}
			})
			.collect();
		let links = graph
			.links
			.iter()
			.map(|link| GraphLink {
				source: link.source,
				target: link.target,
			})
			.collect();
		Self { nodes, links }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::extract::{HubNode, Link, TargetNode};

	#[test]
	fn hubs_are_pinned_and_labelled() {
		let graph = StyleGraph {
			nodes: vec![
				Node::FontTarget(TargetNode {
					fx: 400.0,
					fy: 150.0,
					width: 10.0,
					height: 10.0,
					selector: ".p".into(),
				}),
				Node::Font(HubNode {
					fx: 20.0,
					fy: 20.0,
					selector: ".p".into(),
					text: "  font-size: 12px;\n  font-weight: bold;".into(),
				}),
			],
			links: vec![Link {
				source: 1,
				target: 0,
			}],
			..StyleGraph::default()
		};
		let data = GraphData::from(&graph);
		assert!(!data.nodes[0].pinned && data.nodes[0].label.is_empty());
		assert_eq!((data.nodes[0].x, data.nodes[0].y), (400.0, 150.0));
		assert!(data.nodes[1].pinned);
		assert_eq!(
			data.nodes[1].label,
			vec!["font-size: 12px;", "font-weight: bold;", ".p"]
		);
		assert_eq!(data.links, vec![GraphLink {
			source: 1,
			target: 0
		}]);
	}

	#[test]
	fn extent_covers_the_box_lane_labels() {
		let options = crate::extract::ExtractOptions::default();
		let graph = StyleGraph {
			nodes: vec![
				Node::BoxTarget(TargetNode {
					fx: 310.0,
					fy: 110.0,
					width: 10.0,
					height: 10.0,
					selector: ".b".into(),
				}),
				Node::Box(HubNode {
					fx: options.box_lane_x,
					fy: options.label_top,
					selector: ".b".into(),
					text: "  padding: 10px;".into(),
				}),
			],
			links: vec![Link {
				source: 1,
				target: 0,
			}],
			..StyleGraph::default()
		};
		let (width, height) = GraphData::from(&graph).extent();
		let label = "padding: 10px;".len() as f64 * LABEL_CHAR;
		assert!(width >= options.box_lane_x + label, "{width} clips the box lane");
		assert!(width > crate::host::Viewport::default().width);
		assert!(height >= options.label_top + 2.0 * LABEL_ROW);
		assert_eq!(GraphData::default().extent(), (0.0, 0.0));
	}
}
