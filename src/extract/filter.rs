//! Splits a rule's declarations into the font and box groups.

/// Which sub-graph a declaration set, hub or target belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	/// Typography: any property whose name contains `font`.
	Font,
	/// Box model: padding, margin, width and height properties.
	Box,
}

const BOX_KEYWORDS: &[&str] = &["padding", "margin", "width", "height"];

/// Ordered property/value pairs restricted to one category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclarationSet(Vec<(String, String)>);

impl DeclarationSet {
	/// True when no declaration survived the filter.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of declarations.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Declarations in host order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	fn push(&mut self, name: &str, value: &str) {
		self.0.push((name.to_string(), value.to_string()));
	}
}

impl FromIterator<(String, String)> for DeclarationSet {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Both groups produced from one rule; either may be empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Split {
	/// Typography declarations.
	pub font: DeclarationSet,
	/// Box-model declarations.
	pub box_model: DeclarationSet,
}

impl Split {
	/// The group for `category`.
	pub fn get(&self, category: Category) -> &DeclarationSet {
		match category {
			Category::Font => &self.font,
			Category::Box => &self.box_model,
		}
	}
}

fn is_font_property(name: &str, value: &str) -> bool {
	name.contains("font") && !value.is_empty() && value != "inherit"
}

fn is_box_property(name: &str, value: &str) -> bool {
	BOX_KEYWORDS.iter().any(|k| name.contains(k))
		&& !value.is_empty()
		&& value != "0"
		&& value != "0px"
}

/// Classify `declarations` into the two disjoint groups.
pub fn split(declarations: &[(String, String)]) -> Split {
	let mut out = Split::default();
	for (name, value) in declarations {
		let value = value.trim();
		if is_font_property(name, value) {
			out.font.push(name, value);
		} else if !name.contains("font") && is_box_property(name, value) {
			out.box_model.push(name, value);
		}
	}
	out
}
