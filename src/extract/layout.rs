use super::config::ExtractOptions;
use super::filter::Category;

/// Stacks hub labels in one vertical lane per category.
///
/// Slots only ever move down; a placed label is never revisited.
#[derive(Clone, Debug)]
pub struct LabelPlanner {
	font_cursor: f64,
	box_cursor: f64,
	font_lane_x: f64,
	box_lane_x: f64,
	wrap_width: usize,
	padding_lines: usize,
	row_height: f64,
}

impl LabelPlanner {
	/// Both lanes start at `options.label_top`.
	pub fn new(options: &ExtractOptions) -> Self {
		Self {
			font_cursor: options.label_top,
			box_cursor: options.label_top,
			font_lane_x: options.font_lane_x,
			box_lane_x: options.box_lane_x,
			wrap_width: options.wrap_width.max(1),
			padding_lines: options.label_padding_lines,
			row_height: options.row_height,
		}
	}

	/// Rows a label occupies once the renderer wraps it.
	pub fn estimated_lines(&self, text: &str, selector: &str) -> usize {
		text.lines()
			.chain(std::iter::once(selector))
			.map(|line| line.chars().count() / self.wrap_width + 1)
			.sum()
	}

	/// Fixed position for a new hub label, advancing that lane's cursor.
	pub fn place(&mut self, category: Category, text: &str, selector: &str) -> (f64, f64) {
		let advance =
			(self.estimated_lines(text, selector) + self.padding_lines) as f64 * self.row_height;
		let (lane_x, cursor) = match category {
			Category::Font => (self.font_lane_x, &mut self.font_cursor),
			Category::Box => (self.box_lane_x, &mut self.box_cursor),
		};
		let slot = (lane_x, *cursor);
		*cursor += advance;
		slot
	}
}
