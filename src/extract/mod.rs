//! Style-graph extraction.
//!
//! One synchronous pass over a [`StyleHost`]: stylesheets are scanned, each
//! style rule's declarations are split into font and box groups, the rule's
//! selector is matched against on-screen elements, and every element becomes
//! a target node linked to the hub for its declaration signature.

mod assemble;
mod config;
mod error;
mod filter;
mod fingerprint;
mod layout;
mod matcher;
mod media;
mod scanner;

use log::{debug, info, warn};

pub use assemble::{GraphSummary, HubNode, Link, Node, StyleGraph, SubGraph, TargetNode, assemble};
pub use config::{ExtractOptions, SignatureOrder};
pub use error::ExtractError;
pub use filter::{Category, DeclarationSet, Split, split};
pub use fingerprint::{FingerprintIndex, signature};
pub use layout::LabelPlanner;
pub use matcher::{anchor, in_viewport, visible_matches};
pub use media::MediaCollector;
pub use scanner::RuleScanner;

use crate::host::{RuleEntry, StyleHost};

const CATEGORIES: [Category; 2] = [Category::Font, Category::Box];

/// Build the style graph for the page behind `host`.
///
/// Only an unavailable page or invalid options fail; unreadable sheets,
/// unresolvable selectors and off-screen elements are skipped.
pub fn extract<H: StyleHost>(host: &H, options: &ExtractOptions) -> Result<StyleGraph, ExtractError> {
	options.validate()?;
	let viewport = host.viewport()?;
	let mut scanner = RuleScanner::new(host.style_sheets()?);

	if options.signature_order == SignatureOrder::Declared {
		warn!("signatures follow declaration order; reordered blocks will not share hubs");
	}

	let mut planner = LabelPlanner::new(options);
	let mut font = FingerprintIndex::new(Category::Font);
	let mut boxed = FingerprintIndex::new(Category::Box);
	let mut medias = MediaCollector::default();

	for rule in scanner.by_ref() {
		let (selector, declarations) = match rule {
			RuleEntry::Media { condition } => {
				medias.push(&condition);
				continue;
			}
			RuleEntry::Style {
				selector,
				declarations,
			} => (selector, declarations),
		};

		let groups = split(&declarations);
		if groups.font.is_empty() && groups.box_model.is_empty() {
			continue;
		}

		let rects = visible_matches(host, &selector, &viewport);
		if rects.is_empty() {
			continue;
		}

		for category in CATEGORIES {
			let set = groups.get(category);
			if set.is_empty() {
				continue;
			}
			let text = signature(set, options.signature_order);
			let index = match category {
				Category::Font => &mut font,
				Category::Box => &mut boxed,
			};
			for rect in &rects {
				let (fx, fy) = anchor(category, rect, options);
				index.record(
					&text,
					&selector,
					TargetNode {
						fx,
						fy,
						width: rect.width,
						height: rect.height,
						selector: selector.clone(),
					},
					&mut planner,
				);
			}
		}
		debug!("{selector}: {} visible matches", rects.len());
	}

	let distinct_medias = medias.distinct().len();
	let graph = assemble(font.into_subgraph(), boxed.into_subgraph(), medias.into_inner());
	let summary = graph.summary();
	info!(
		"style graph: {} font hubs / {} targets, {} box hubs / {} targets, {} links, {} @media ({} distinct), {} sheets skipped",
		summary.font_hubs,
		summary.font_targets,
		summary.box_hubs,
		summary.box_targets,
		summary.links,
		summary.medias,
		distinct_medias,
		scanner.skipped(),
	);
	Ok(graph)
}
