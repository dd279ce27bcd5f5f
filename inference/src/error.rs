use std::sync::Arc;

use url::Url;

/// Errors talking to the inference API.
#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
	/// The request never got a response.
	#[error("http error: {0}")]
	Http(Arc<reqwest::Error>),

	/// The API answered with a non-success status.
	#[error("unexpected status: {0}")]
	Status(reqwest::StatusCode),

	/// The body was not the JSON we expected.
	#[error("json error: {0}")]
	Json(Arc<serde_json::Error>),

	/// The body was JSON, but a required field was missing.
	#[error("invalid response: missing {0}")]
	InvalidResponse(&'static str),

	/// The API origin couldn't be parsed.
	#[error("url error: {0}")]
	Url(#[from] url::ParseError),

	/// The configured API origin can't have paths joined onto it.
	#[error("invalid url: {0}")]
	InvalidUrl(Url),
}

pub type Result<T> = std::result::Result<T, Error>;

// Wrap in an Arc so it is Clone
impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Error::Http(Arc::new(err))
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Json(Arc::new(err))
	}
}
