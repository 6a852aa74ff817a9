use std::collections::HashMap;

use super::assemble::{HubNode, Link, Node, SubGraph, TargetNode};
use super::config::SignatureOrder;
use super::filter::{Category, DeclarationSet};
use super::layout::LabelPlanner;

/// Canonical text of a declaration set, also used as the hub label.
///
/// One indented `name: value;` line per property, without enclosing braces.
pub fn signature(set: &DeclarationSet, order: SignatureOrder) -> String {
	let mut pairs: Vec<(&str, &str)> = set.iter().collect();
	if order == SignatureOrder::Sorted {
		// stable, so repeated names keep their declared order
		pairs.sort_by(|a, b| a.0.cmp(b.0));
	}
	pairs
		.iter()
		.map(|(name, value)| format!("  {name}: {value};"))
		.collect::<Vec<_>>()
		.join("\n")
}

#[derive(Clone, Debug)]
struct Entry {
	hub: usize,
	targets: Vec<usize>,
}

/// One category's sub-graph under construction.
///
/// Owns the signature map for a single extraction call; hubs are created
/// lazily on the first target that uses their signature.
#[derive(Clone, Debug)]
pub struct FingerprintIndex {
	category: Category,
	by_signature: HashMap<String, usize>,
	entries: Vec<Entry>,
	nodes: Vec<Node>,
}

impl FingerprintIndex {
	/// Empty index for one category.
	pub fn new(category: Category) -> Self {
		Self {
			category,
			by_signature: HashMap::new(),
			entries: Vec::new(),
			nodes: Vec::new(),
		}
	}

	/// Append `target`, linking it to the hub for `signature`.
	///
	/// Returns the hub's index within this sub-graph.
	pub fn record(
		&mut self,
		signature: &str,
		selector: &str,
		target: TargetNode,
		planner: &mut LabelPlanner,
	) -> usize {
		let target_idx = self.nodes.len();
		self.nodes.push(Node::target(self.category, target));

		if let Some(&entry) = self.by_signature.get(signature) {
			let entry = &mut self.entries[entry];
			entry.targets.push(target_idx);
			return entry.hub;
		}

		let (fx, fy) = planner.place(self.category, signature, selector);
		let hub = self.nodes.len();
		self.nodes.push(Node::hub(
			self.category,
			HubNode {
				fx,
				fy,
				selector: selector.to_string(),
				text: signature.to_string(),
			},
		));
		self.by_signature
			.insert(signature.to_string(), self.entries.len());
		self.entries.push(Entry {
			hub,
			targets: vec![target_idx],
		});
		hub
	}

	/// Distinct signatures seen so far.
	pub fn hub_count(&self) -> usize {
		self.entries.len()
	}

	/// Flatten into nodes plus links grouped by hub creation order.
	pub fn into_subgraph(self) -> SubGraph {
		let links = self
			.entries
			.iter()
			.flat_map(|entry| {
				entry.targets.iter().map(|&target| Link {
					source: entry.hub,
					target,
				})
			})
			.collect();
		SubGraph {
			nodes: self.nodes,
			links,
		}
	}
}
