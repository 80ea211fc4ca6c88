use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Engine not initialized: call engine/initialize first")]
	NotInitialized,
	#[error("Unknown emotion label: {0}")]
	UnknownLabel(String),
	#[error("Empty signal: profile encodes to the zero vector")]
	EmptySignal,
	#[error("Invalid limit: result limit must be positive")]
	InvalidLimit,
	#[error("Malformed vector: {0}")]
	MalformedVector(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl EngineError {
	pub fn code(&self) -> &str {
		match self {
			Self::NotInitialized => "MOOD_NOT_INITIALIZED",
			Self::UnknownLabel(_) => "MOOD_UNKNOWN_LABEL",
			Self::EmptySignal => "MOOD_EMPTY_SIGNAL",
			Self::InvalidLimit => "MOOD_INVALID_LIMIT",
			Self::MalformedVector(_) => "MOOD_MALFORMED_VECTOR",
			Self::Io(_) => "MOOD_IO",
			Self::Serialization(_) => "MOOD_SERIALIZATION",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"engineCode": self.code(),
			"message": self.to_string(),
		})
	}
}
