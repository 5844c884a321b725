pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Construction(#[from] ConstructionError),
	#[error(transparent)]
	Fetch(#[from] FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
	#[error("Invalid URL {url:?}: {message}")]
	InvalidUrl { url: String, message: String },
	#[error("Host of {url:?} does not match the API base.")]
	UnrecognizedHost { url: String },
	#[error("Path of {url:?} does not name a known resource.")]
	UnrecognizedResource { url: String },
	#[error("Resource identifier {identifier:?} is not valid.")]
	InvalidIdentifier { identifier: String },
}

/// Failure of a single catalog call. Messages are captured eagerly so the error can be cloned
/// into listener notifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
	#[error("Transport error: {message}")]
	Transport { message: String },
	#[error("Invalid response: {message}")]
	InvalidResponse { status: Option<u16>, message: String },
	#[error("Decoding failed: {message}")]
	DecodingFailed { message: String },
}
impl From<reqwest::Error> for FetchError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			return Self::DecodingFailed { message: err.to_string() };
		}
		if let Some(status) = err.status() {
			return Self::InvalidResponse {
				status: Some(status.as_u16()),
				message: err.to_string(),
			};
		}

		Self::Transport { message: err.to_string() }
	}
}
impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		Self::DecodingFailed { message: err.to_string() }
	}
}
