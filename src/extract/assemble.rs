use serde::{Deserialize, Serialize};

use super::error::ExtractError;
use super::filter::Category;

/// A hub: one unique declaration signature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HubNode {
	/// Label slot x.
	pub fx: f64,
	/// Label slot y.
	pub fy: f64,
	/// Selector of the rule that first produced the signature.
	pub selector: String,
	/// The signature itself, one `  name: value;` line per property.
	pub text: String,
}

/// One in-viewport element instance matched by a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetNode {
	/// Anchor x.
	pub fx: f64,
	/// Anchor y.
	pub fy: f64,
	/// Element width.
	pub width: f64,
	/// Element height.
	pub height: f64,
	/// Selector the element was matched by.
	pub selector: String,
}

/// A graph node, serialized with a `type` tag (`font`, `box`, `font-target`,
/// `box-target`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
	/// Font declaration hub.
	Font(HubNode),
	/// Box-model declaration hub.
	Box(HubNode),
	/// Element using a font hub.
	FontTarget(TargetNode),
	/// Element using a box hub.
	BoxTarget(TargetNode),
}

impl Node {
	/// Wrap `hub` in the variant for `category`.
	pub fn hub(category: Category, hub: HubNode) -> Self {
		match category {
			Category::Font => Node::Font(hub),
			Category::Box => Node::Box(hub),
		}
	}

	/// Wrap `target` in the variant for `category`.
	pub fn target(category: Category, target: TargetNode) -> Self {
		match category {
			Category::Font => Node::FontTarget(target),
			Category::Box => Node::BoxTarget(target),
		}
	}

	/// Which sub-graph the node belongs to.
	pub fn category(&self) -> Category {
		match self {
			Node::Font(_) | Node::FontTarget(_) => Category::Font,
			Node::Box(_) | Node::BoxTarget(_) => Category::Box,
		}
	}

	/// True for `font` and `box` nodes.
	pub fn is_hub(&self) -> bool {
		matches!(self, Node::Font(_) | Node::Box(_))
	}

	/// Selector carried by either node kind.
	pub fn selector(&self) -> &str {
		match self {
			Node::Font(hub) | Node::Box(hub) => &hub.selector,
			Node::FontTarget(target) | Node::BoxTarget(target) => &target.selector,
		}
	}

	/// Declaration text; only hubs carry one.
	pub fn text(&self) -> Option<&str> {
		match self {
			Node::Font(hub) | Node::Box(hub) => Some(&hub.text),
			_ => None,
		}
	}

	/// Fixed coordinates supplied by the core.
	pub fn position(&self) -> (f64, f64) {
		match self {
			Node::Font(hub) | Node::Box(hub) => (hub.fx, hub.fy),
			Node::FontTarget(target) | Node::BoxTarget(target) => (target.fx, target.fy),
		}
	}
}

/// "This element instance uses this declaration set".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
	/// Hub index.
	pub source: usize,
	/// Target index.
	pub target: usize,
}

/// Nodes and links of one category with indices local to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubGraph {
	/// Hubs and targets in creation order.
	pub nodes: Vec<Node>,
	/// Links in hub order.
	pub links: Vec<Link>,
}

/// The payload handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleGraph {
	/// Font nodes, then box nodes.
	pub nodes: Vec<Node>,
	/// Hub-to-target links indexing `nodes`.
	pub links: Vec<Link>,
	/// Every `@media` condition, duplicates kept.
	pub medias: Vec<String>,
	/// `url @ timestamp` of the run.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

/// Per-category counts for logging and the overlay header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphSummary {
	/// Distinct font signatures.
	pub font_hubs: usize,
	/// Font target instances.
	pub font_targets: usize,
	/// Distinct box signatures.
	pub box_hubs: usize,
	/// Box target instances.
	pub box_targets: usize,
	/// Total links.
	pub links: usize,
	/// Recorded media conditions, duplicates included.
	pub medias: usize,
}

/// Merge the font and box sub-graphs, font first.
///
/// Box indices are shifted past the font nodes; internal order is kept.
pub fn assemble(font: SubGraph, boxed: SubGraph, medias: Vec<String>) -> StyleGraph {
	let shift = font.nodes.len();
	let mut nodes = font.nodes;
	nodes.extend(boxed.nodes);
	let mut links = font.links;
	links.extend(boxed.links.into_iter().map(|link| Link {
		source: link.source + shift,
		target: link.target + shift,
	}));
	StyleGraph {
		nodes,
		links,
		medias,
		title: None,
	}
}

impl StyleGraph {
	/// Attach informational run metadata.
	pub fn with_title(mut self, url: &str, timestamp: &str) -> Self {
		self.title = Some(format!("{url} @ {timestamp}"));
		self
	}

	/// Count nodes per kind.
	pub fn summary(&self) -> GraphSummary {
		let mut summary = GraphSummary {
			links: self.links.len(),
			medias: self.medias.len(),
			..GraphSummary::default()
		};
		for node in &self.nodes {
			match node {
				Node::Font(_) => summary.font_hubs += 1,
				Node::Box(_) => summary.box_hubs += 1,
				Node::FontTarget(_) => summary.font_targets += 1,
				Node::BoxTarget(_) => summary.box_targets += 1,
			}
		}
		summary
	}

	/// Pretty-printed JSON payload.
	pub fn to_json(&self) -> Result<String, ExtractError> {
		serde_json::to_string_pretty(self).map_err(ExtractError::Serialize)
	}
}
