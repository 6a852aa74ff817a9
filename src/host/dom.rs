use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
	CssMediaRule, CssRuleList, CssStyleDeclaration, CssStyleRule, CssStyleSheet, Document, Element,
	Window,
};

use super::{HostError, Rect, RuleEntry, SheetSource, StyleHost, Viewport};

fn js_error(err: JsValue) -> HostError {
	HostError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Host backed by the live document the crate is running in.
pub struct DomHost {
	window: Window,
	document: Document,
}

impl DomHost {
	/// Attach to the global window's document.
	pub fn from_window() -> Result<Self, HostError> {
		let window = web_sys::window()
			.ok_or_else(|| HostError::SnapshotUnavailable("no global window".into()))?;
		let document = window
			.document()
			.ok_or_else(|| HostError::SnapshotUnavailable("window has no document".into()))?;
		Ok(Self { window, document })
	}

	/// URL of the audited page, used for the graph title.
	pub fn location(&self) -> Option<String> {
		self.window.location().href().ok()
	}
}

fn declarations(style: &CssStyleDeclaration) -> Vec<(String, String)> {
	(0..style.length())
		.map(|i| style.item(i))
		.filter(|name| !name.is_empty())
		.map(|name| {
			let value = style.get_property_value(&name).unwrap_or_default();
			(name, value)
		})
		.collect()
}

fn collect_rules(list: &CssRuleList, out: &mut Vec<RuleEntry>) {
	for i in 0..list.length() {
		let Some(rule) = list.item(i) else {
			continue;
		};
		if let Some(style_rule) = rule.dyn_ref::<CssStyleRule>() {
			out.push(RuleEntry::Style {
				selector: style_rule.selector_text(),
				declarations: declarations(&style_rule.style()),
			});
		} else if let Some(media_rule) = rule.dyn_ref::<CssMediaRule>() {
			out.push(RuleEntry::Media {
				condition: media_rule.media().media_text(),
			});
			collect_rules(&media_rule.css_rules(), out);
		}
	}
}

impl StyleHost for DomHost {
	type Element = Element;

	fn viewport(&self) -> Result<Viewport, HostError> {
		let width = self.window.inner_width().map_err(js_error)?;
		let height = self.window.inner_height().map_err(js_error)?;
		match (width.as_f64(), height.as_f64()) {
			(Some(width), Some(height)) => Ok(Viewport { width, height }),
			_ => Err(HostError::SnapshotUnavailable(
				"viewport size is not a number".into(),
			)),
		}
	}

	fn style_sheets(&self) -> Result<Vec<SheetSource>, HostError> {
		let list = self.document.style_sheets();
		let mut sheets = Vec::with_capacity(list.length() as usize);
		for i in 0..list.length() {
			let Some(sheet) = list.item(i) else {
				continue;
			};
			let href = sheet.href().ok().flatten();
			let rules = match sheet.dyn_into::<CssStyleSheet>() {
				Ok(css) => css
					.css_rules()
					.map(|list| {
						let mut out = Vec::new();
						collect_rules(&list, &mut out);
						out
					})
					.map_err(|err| HostError::UnreadableSheet(js_error(err).to_string())),
				Err(_) => Err(HostError::UnreadableSheet("not a CSS stylesheet".into())),
			};
			sheets.push(SheetSource { href, rules });
		}
		Ok(sheets)
	}

	fn select_all(&self, selector: &str) -> Result<Vec<Element>, HostError> {
		let nodes = self
			.document
			.query_selector_all(selector)
			.map_err(|err| HostError::InvalidSelector {
				selector: selector.to_string(),
				reason: js_error(err).to_string(),
			})?;
		Ok((0..nodes.length())
			.filter_map(|i| nodes.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.collect())
	}

	fn bounding_rect(&self, element: &Element) -> Rect {
		let rect = element.get_bounding_client_rect();
		Rect {
			x: rect.x(),
			y: rect.y(),
			width: rect.width(),
			height: rect.height(),
			top: rect.top(),
			left: rect.left(),
			bottom: rect.bottom(),
			right: rect.right(),
		}
	}
}
