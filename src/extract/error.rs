use crate::host::HostError;

/// Failures that abort an extraction run.
///
/// Everything recoverable (unreadable sheets, bad selectors, off-screen
/// elements) is absorbed inside the pass and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
	/// The host could not provide the page at all.
	#[error("page snapshot unavailable: {0}")]
	Host(#[from] HostError),
	/// Options failed to parse or validate.
	#[error("invalid extraction options: {0}")]
	Config(String),
	/// Snapshot JSON did not deserialize.
	#[error("malformed page snapshot: {0}")]
	Snapshot(#[source] serde_json::Error),
	/// The graph could not be written out as JSON.
	#[error("failed to serialize style graph: {0}")]
	Serialize(#[source] serde_json::Error),
}

impl ExtractError {
	/// Message safe to show to an end user; never includes internal detail.
	pub fn public_message(&self) -> &'static str {
		match self {
			ExtractError::Config(_) => "invalid analysis settings",
			_ => "failed to process request",
		}
	}
}

impl From<toml::de::Error> for ExtractError {
	fn from(err: toml::de::Error) -> Self {
		ExtractError::Config(err.to_string())
	}
}
