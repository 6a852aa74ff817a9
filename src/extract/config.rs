use serde::{Deserialize, Serialize};

use super::error::ExtractError;

/// Order in which declarations are laid out when building a signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureOrder {
	/// Sort properties by name so reordered blocks share one hub.
	#[default]
	Sorted,
	/// Keep the host's declaration order (legacy, order-sensitive).
	Declared,
}

/// Tunables for one extraction pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
	/// Horizontal shift applied to every target anchor.
	pub offset_x: f64,
	/// Vertical shift applied to every target anchor.
	pub offset_y: f64,
	/// Lane holding font hub labels.
	pub font_lane_x: f64,
	/// Lane holding box hub labels.
	pub box_lane_x: f64,
	/// Starting cursor for both lanes.
	pub label_top: f64,
	/// Characters per rendered label line before wrapping.
	pub wrap_width: usize,
	/// Blank rows left under every label.
	pub label_padding_lines: usize,
	/// Height of one label row in px.
	pub row_height: f64,
	/// How declarations are ordered inside a signature.
	pub signature_order: SignatureOrder,
}

impl Default for ExtractOptions {
	fn default() -> Self {
		Self {
			offset_x: 300.0,
			offset_y: 100.0,
			font_lane_x: 20.0,
			box_lane_x: 1750.0,
			label_top: 20.0,
			wrap_width: 40,
			label_padding_lines: 2,
			row_height: 18.0,
			signature_order: SignatureOrder::Sorted,
		}
	}
}

impl ExtractOptions {
	/// Parse options from TOML; missing keys fall back to defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, ExtractError> {
		let options: Self = toml::from_str(source)?;
		options.validate()?;
		Ok(options)
	}

	/// Reject values the layout planner cannot work with.
	pub fn validate(&self) -> Result<(), ExtractError> {
		if self.wrap_width == 0 {
			return Err(ExtractError::Config("wrap_width must be positive".into()));
		}
		if !(self.row_height.is_finite() && self.row_height > 0.0) {
			return Err(ExtractError::Config(
				"row_height must be a positive number".into(),
			));
		}
		let coords = [
			("offset_x", self.offset_x),
			("offset_y", self.offset_y),
			("font_lane_x", self.font_lane_x),
			("box_lane_x", self.box_lane_x),
			("label_top", self.label_top),
		];
		for (name, value) in coords {
			if !value.is_finite() {
				return Err(ExtractError::Config(format!("{name} must be finite")));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_toml_keeps_defaults() {
		let options = ExtractOptions::from_toml_str(
			"wrap_width = 60\nsignature_order = \"declared\"\n",
		)
		.unwrap();
		assert_eq!(options.wrap_width, 60);
		assert_eq!(options.signature_order, SignatureOrder::Declared);
		assert_eq!(options.row_height, 18.0);
		assert_eq!(options.offset_x, 300.0);
	}

	#[test]
	fn zero_wrap_width_is_rejected() {
		let err = ExtractOptions::from_toml_str("wrap_width = 0").unwrap_err();
		assert!(matches!(err, ExtractError::Config(_)));
	}

	#[test]
	fn malformed_toml_is_a_config_error() {
		let err = ExtractOptions::from_toml_str("row_height = \"tall\"").unwrap_err();
		assert!(matches!(err, ExtractError::Config(_)));
		assert_eq!(err.public_message(), "invalid analysis settings");
	}
}
