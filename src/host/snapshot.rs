use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::selector::SelectorList;
use super::{HostError, Rect, RuleEntry, SheetSource, StyleHost, Viewport};
use crate::extract::ExtractError;

/// A captured page: viewport, stylesheets and laid-out elements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
	/// Window size at capture time.
	pub viewport: Viewport,
	/// `document.styleSheets` in order.
	pub style_sheets: Vec<SnapshotSheet>,
	/// Every element in document order.
	pub elements: Vec<SnapshotElement>,
}

/// One stylesheet; `error` marks a sheet the browser refused to enumerate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSheet {
	/// Source URL, `None` for inline `<style>` blocks.
	pub href: Option<String>,
	/// The access error the capture hit instead of reading `rules`.
	pub error: Option<String>,
	/// Top-level rules in sheet order.
	pub rules: Vec<SnapshotRule>,
}

/// A captured rule; media rules carry their nested rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotRule {
	/// A style rule.
	Style {
		/// Selector text as written in the sheet.
		selector: String,
		/// Already-split `(name, value)` pairs.
		#[serde(default)]
		declarations: Vec<(String, String)>,
		/// Alternative `name: value; ...` text, appended after `declarations`.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		block: Option<String>,
	},
	/// An `@media` rule.
	Media {
		/// Media condition text.
		condition: String,
		/// Nested rules, scanned after the condition.
		#[serde(default)]
		rules: Vec<SnapshotRule>,
	},
	/// Any rule kind the scanner ignores (`@font-face`, `@keyframes`, ...).
	Other,
}

/// A laid-out element in document order.
///
/// `parent` indexes an earlier entry of [`PageSnapshot::elements`]; elements
/// without one are roots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotElement {
	/// Tag name, compared case-insensitively.
	pub tag: String,
	/// Index of the parent element.
	#[serde(default)]
	pub parent: Option<usize>,
	/// The `id` attribute.
	#[serde(default)]
	pub id: Option<String>,
	/// The class list.
	#[serde(default)]
	pub classes: Vec<String>,
	/// Remaining attributes, for attribute selectors.
	#[serde(default)]
	pub attributes: BTreeMap<String, String>,
	/// Bounding client rect at capture time.
	pub rect: Rect,
}

impl PageSnapshot {
	/// Parse a snapshot serialized as JSON.
	pub fn from_json(source: &str) -> Result<Self, ExtractError> {
		serde_json::from_str(source).map_err(ExtractError::Snapshot)
	}
}

fn flatten_rules(rules: &[SnapshotRule], out: &mut Vec<RuleEntry>) {
	for rule in rules {
		match rule {
			SnapshotRule::Style {
				selector,
				declarations,
				block,
			} => {
				let mut declarations = declarations.clone();
				if let Some(block) = block {
					if let RuleEntry::Style {
						declarations: parsed,
						..
					} = RuleEntry::style_from_block(selector.as_str(), block)
					{
						declarations.extend(parsed);
					}
				}
				out.push(RuleEntry::Style {
					selector: selector.clone(),
					declarations,
				});
			}
			SnapshotRule::Media { condition, rules } => {
				out.push(RuleEntry::Media {
					condition: condition.clone(),
				});
				flatten_rules(rules, out);
			}
			SnapshotRule::Other => {}
		}
	}
}

impl StyleHost for PageSnapshot {
	type Element = usize;

	fn viewport(&self) -> Result<Viewport, HostError> {
		Ok(self.viewport)
	}

	fn style_sheets(&self) -> Result<Vec<SheetSource>, HostError> {
		Ok(self
			.style_sheets
			.iter()
			.map(|sheet| {
				let rules = match &sheet.error {
					Some(err) => Err(HostError::UnreadableSheet(err.clone())),
					None => {
						let mut out = Vec::new();
						flatten_rules(&sheet.rules, &mut out);
						Ok(out)
					}
				};
				SheetSource {
					href: sheet.href.clone(),
					rules,
				}
			})
			.collect())
	}

	fn select_all(&self, selector: &str) -> Result<Vec<usize>, HostError> {
		let list = SelectorList::parse(selector)?;
		Ok((0..self.elements.len())
			.filter(|i| list.matches(&self.elements, *i))
			.collect())
	}

	fn bounding_rect(&self, element: &usize) -> Rect {
		self.elements
			.get(*element)
			.map(|e| e.rect)
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn nested_media_rules_flatten_after_their_condition() {
		let snapshot: PageSnapshot = serde_json::from_value(json!({
			"style_sheets": [{
				"rules": [
					{"kind": "other"},
					{"kind": "media", "condition": "(max-width: 600px)", "rules": [
						{"kind": "style", "selector": "h1", "block": "font-size: 20px"}
					]},
					{"kind": "style", "selector": "p", "declarations": [["margin", "4px"]]}
				]
			}]
		}))
		.unwrap();

		let sheets = snapshot.style_sheets().unwrap();
		assert_eq!(
			sheets[0].rules.as_ref().unwrap(),
			&vec![
				RuleEntry::Media {
					condition: "(max-width: 600px)".into()
				},
				RuleEntry::Style {
					selector: "h1".into(),
					declarations: vec![("font-size".into(), "20px".into())],
				},
				RuleEntry::Style {
					selector: "p".into(),
					declarations: vec![("margin".into(), "4px".into())],
				},
			]
		);
	}

	#[test]
	fn unreadable_sheet_reports_error_and_invalid_selector_fails() {
		let snapshot = PageSnapshot::from_json(
			r#"{"style_sheets": [{"href": "https://cdn.example/x.css", "error": "SecurityError"}]}"#,
		)
		.unwrap();
		let sheets = snapshot.style_sheets().unwrap();
		assert_eq!(
			sheets[0].rules,
			Err(HostError::UnreadableSheet("SecurityError".into()))
		);
		assert!(snapshot.select_all("a::before").is_err());
		assert_eq!(snapshot.select_all("a:hover"), Ok(vec![]));
	}

	#[test]
	fn select_all_walks_parent_links() {
		let snapshot: PageSnapshot = serde_json::from_value(json!({
			"elements": [
				{"tag": "main", "rect": {"x": 0, "y": 0, "width": 100, "height": 100}},
				{"tag": "p", "parent": 0, "rect": {"x": 0, "y": 0, "width": 10, "height": 10}},
				{"tag": "aside", "parent": 0, "rect": {"x": 0, "y": 0, "width": 10, "height": 10}},
				{"tag": "p", "parent": 2, "rect": {"x": 0, "y": 0, "width": 10, "height": 10}},
				{"tag": "p", "parent": 2, "rect": {"x": 0, "y": 0, "width": 10, "height": 10}}
			]
		}))
		.unwrap();
		assert_eq!(snapshot.select_all("main > p"), Ok(vec![1]));
		assert_eq!(snapshot.select_all("aside p:first-child"), Ok(vec![3]));
		assert_eq!(snapshot.select_all("p:first-child"), Ok(vec![1, 3]));
	}

	#[test]
	fn malformed_json_is_a_snapshot_error() {
		let err = PageSnapshot::from_json("{\"elements\": 3}").unwrap_err();
		assert!(matches!(err, ExtractError::Snapshot(_)));
	}
}
