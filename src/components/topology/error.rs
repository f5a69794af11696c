/// Result alias for the topology entry points.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors surfaced by the JSON entry points. Graph building itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
	/// Malformed JSON, or JSON of the wrong shape.
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// The payload was valid JSON but not an object.
	#[error("Unrecognized topology payload: expected a JSON object, got {found}")]
	UnrecognizedPayload {
		/// JSON kind that was found instead.
		found: &'static str,
	},

	/// A config value is out of range.
	#[error("Invalid topology config: {message}")]
	InvalidConfig {
		/// Which value and why.
		message: String,
	},
}
