use log::debug;

use super::config::ExtractOptions;
use super::filter::Category;
use crate::host::{Rect, StyleHost, Viewport};

/// Whether an element may produce a target node.
///
/// The bottom edge is deliberately not checked, so elements that run below
/// the fold still count.
pub fn in_viewport(rect: &Rect, viewport: &Viewport) -> bool {
	rect.top >= 0.0 && rect.left >= 0.0 && rect.right <= viewport.width
}

/// Fixed position for a target node of `category`.
pub fn anchor(category: Category, rect: &Rect, options: &ExtractOptions) -> (f64, f64) {
	match category {
		Category::Font => (
			rect.x + rect.width / 2.0 + options.offset_x,
			rect.y + rect.height / 2.0 + options.offset_y,
		),
		Category::Box => (rect.x + options.offset_x, rect.y + options.offset_y),
	}
}

/// Geometry of every element matching `selector` that passes [`in_viewport`].
///
/// A selector the host rejects yields no elements.
pub fn visible_matches<H: StyleHost>(host: &H, selector: &str, viewport: &Viewport) -> Vec<Rect> {
	let elements = match host.select_all(selector) {
		Ok(elements) => elements,
		Err(err) => {
			debug!("skipping rule: {}", err);
			return Vec::new();
		}
	};
	let total = elements.len();
	let visible: Vec<Rect> = elements
		.iter()
		.map(|element| host.bounding_rect(element))
		.filter(|rect| in_viewport(rect, viewport))
		.collect();
	if visible.len() < total {
		debug!(
			"{selector}: {} of {total} matches outside the viewport",
			total - visible.len()
		);
	}
	visible
}

#[cfg(test)]
mod tests {
	use super::*;

	const VIEWPORT: Viewport = Viewport {
		width: 1400.0,
		height: 1000.0,
	};

	#[test]
	fn predicate_checks_top_left_right_only() {
		assert!(in_viewport(&Rect::new(0.0, 0.0, 1400.0, 50.0), &VIEWPORT));
		assert!(in_viewport(&Rect::new(10.0, 900.0, 100.0, 500.0), &VIEWPORT));
		assert!(!in_viewport(&Rect::new(-1.0, 10.0, 100.0, 10.0), &VIEWPORT));
		assert!(!in_viewport(&Rect::new(10.0, -0.5, 100.0, 10.0), &VIEWPORT));
		assert!(!in_viewport(&Rect::new(1350.0, 10.0, 100.0, 10.0), &VIEWPORT));
	}

	#[test]
	fn font_anchors_center_and_box_anchors_corner() {
		let options = ExtractOptions::default();
		let rect = Rect::new(100.0, 40.0, 200.0, 20.0);
		assert_eq!(anchor(Category::Font, &rect, &options), (500.0, 150.0));
		assert_eq!(anchor(Category::Box, &rect, &options), (400.0, 140.0));
	}
}
