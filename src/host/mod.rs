//! The document contract an extraction pass reads from.
//!
//! A host exposes the page's stylesheets, a selector query, per-element
//! geometry and the viewport. [`DomHost`] reads a live `web_sys` document;
//! [`PageSnapshot`] replays a captured page.

mod declarations;
mod dom;
mod selector;
mod snapshot;

use serde::{Deserialize, Serialize};

pub use dom::DomHost;
pub use selector::SelectorList;
pub use snapshot::{PageSnapshot, SnapshotElement, SnapshotRule, SnapshotSheet};

/// Errors raised by a host adapter.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HostError {
	/// No document or window to read from. Fatal for the run.
	#[error("document is not available: {0}")]
	SnapshotUnavailable(String),
	/// A stylesheet whose rules cannot be enumerated, usually cross-origin.
	#[error("stylesheet cannot be read: {0}")]
	UnreadableSheet(String),
	/// A selector the host cannot resolve.
	#[error("selector `{selector}` cannot be resolved: {reason}")]
	InvalidSelector {
		/// Selector text as written in the sheet.
		selector: String,
		/// Parser or browser message.
		reason: String,
	},
	/// Any other exception thrown by a browser API.
	#[error("javascript error: {0}")]
	Js(String),
}

/// Element geometry in viewport pixels, as `getBoundingClientRect` reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectSpec")]
pub struct Rect {
	/// Origin x.
	pub x: f64,
	/// Origin y.
	pub y: f64,
	/// Width, possibly negative.
	pub width: f64,
	/// Height, possibly negative.
	pub height: f64,
	/// Smallest y.
	pub top: f64,
	/// Smallest x.
	pub left: f64,
	/// Largest y.
	pub bottom: f64,
	/// Largest x.
	pub right: f64,
}

impl Rect {
	/// Build a rect from its origin and size, deriving the edges.
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
			top: y.min(y + height),
			left: x.min(x + width),
			bottom: y.max(y + height),
			right: x.max(x + width),
		}
	}
}

// Snapshots may omit the edges; they default to the ones implied by x/y/size.
#[derive(Deserialize)]
struct RectSpec {
	x: f64,
	y: f64,
	width: f64,
	height: f64,
	top: Option<f64>,
	left: Option<f64>,
	bottom: Option<f64>,
	right: Option<f64>,
}

impl From<RectSpec> for Rect {
	fn from(spec: RectSpec) -> Self {
		let derived = Rect::new(spec.x, spec.y, spec.width, spec.height);
		Rect {
			top: spec.top.unwrap_or(derived.top),
			left: spec.left.unwrap_or(derived.left),
			bottom: spec.bottom.unwrap_or(derived.bottom),
			right: spec.right.unwrap_or(derived.right),
			..derived
		}
	}
}

/// Visible area of the page in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
	/// `window.innerWidth`.
	pub width: f64,
	/// `window.innerHeight`.
	pub height: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			width: 1400.0,
			height: 1000.0,
		}
	}
}

/// A rule the scanner cares about.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleEntry {
	/// A style rule: selector text plus its declarations in host order.
	Style {
		/// Selector text, possibly a comma list.
		selector: String,
		/// Lowercase property names with their values.
		declarations: Vec<(String, String)>,
	},
	/// A media rule's condition text.
	Media {
		/// Condition as the host serializes it.
		condition: String,
	},
}

impl RuleEntry {
	/// Build a style rule from a `name: value; ...` declaration block.
	///
	/// Values keep quoted `;` and nested blocks intact and lose any
	/// `!important` flag.
	pub fn style_from_block(selector: impl Into<String>, block: &str) -> Self {
		RuleEntry::Style {
			selector: selector.into(),
			declarations: declarations::parse_block(block),
		}
	}
}

/// One stylesheet as the host sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetSource {
	/// Source URL, `None` for inline sheets.
	pub href: Option<String>,
	/// Flattened rules, or why the sheet could not be enumerated.
	pub rules: Result<Vec<RuleEntry>, HostError>,
}

/// Read access to one stable page snapshot.
pub trait StyleHost {
	/// Handle to a matched element.
	type Element;

	/// Current viewport size.
	fn viewport(&self) -> Result<Viewport, HostError>;

	/// Every stylesheet in document order. An `Err` means the page itself is
	/// unavailable; per-sheet failures live in [`SheetSource::rules`].
	fn style_sheets(&self) -> Result<Vec<SheetSource>, HostError>;

	/// Elements matching `selector`, in document order.
	fn select_all(&self, selector: &str) -> Result<Vec<Self::Element>, HostError>;

	/// Geometry of `element` relative to the viewport.
	fn bounding_rect(&self, element: &Self::Element) -> Rect;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn declaration_block_keeps_order_and_trims() {
		let rule = RuleEntry::style_from_block(".p", " Font-Weight : bold;padding:10px ; ;junk");
		assert_eq!(
			rule,
			RuleEntry::Style {
				selector: ".p".into(),
				declarations: vec![
					("font-weight".into(), "bold".into()),
					("padding".into(), "10px".into()),
				],
			}
		);
	}

	#[test]
	fn declaration_block_drops_priority_and_keeps_quoted_text() {
		let rule = RuleEntry::style_from_block("h1", r#"font-family: "A;B"; padding: 0 !important"#);
		assert_eq!(
			rule,
			RuleEntry::Style {
				selector: "h1".into(),
				declarations: vec![
					("font-family".into(), r#""A;B""#.into()),
					("padding".into(), "0".into()),
				],
			}
		);
	}

	#[test]
	fn rect_edges_default_from_origin_and_size() {
		let rect: Rect =
			serde_json::from_value(serde_json::json!({"x": 10, "y": 20, "width": 30, "height": 40}))
				.unwrap();
		assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (10.0, 20.0, 40.0, 60.0));

		let rect: Rect = serde_json::from_value(
			serde_json::json!({"x": 0, "y": 0, "width": 5, "height": 5, "right": 99}),
		)
		.unwrap();
		assert_eq!(rect.right, 99.0);
	}
}
