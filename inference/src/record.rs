use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// The state of an inference job as reported by the backend.
///
/// Unknown values are kept verbatim so they can still be displayed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
	Started,
	Success,
	Failure,
	Other(String),
}

impl Status {
	pub fn as_str(&self) -> &str {
		match self {
			Status::Started => "STARTED",
			Status::Success => "SUCCESS",
			Status::Failure => "FAILURE",
			Status::Other(other) => other,
		}
	}

	pub fn badge(&self) -> Badge {
		match self {
			Status::Success => Badge::Success,
			Status::Started => Badge::Info,
			_ => Badge::Danger,
		}
	}
}

impl From<String> for Status {
	fn from(status: String) -> Self {
		match status.as_str() {
			"STARTED" => Status::Started,
			"SUCCESS" => Status::Success,
			"FAILURE" => Status::Failure,
			_ => Status::Other(status),
		}
	}
}

impl From<&str> for Status {
	fn from(status: &str) -> Self {
		Self::from(status.to_string())
	}
}

impl From<Status> for String {
	fn from(status: Status) -> Self {
		match status {
			Status::Other(other) => other,
			status => status.as_str().to_string(),
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The badge style shown next to a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
	Success,
	Info,
	Danger,
}

impl Badge {
	pub fn as_str(self) -> &'static str {
		match self {
			Badge::Success => "success",
			Badge::Info => "info",
			Badge::Danger => "danger",
		}
	}
}

/// A job as listed by `GET /v1/api/inference/all`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceRecord {
	pub inference_uuid: String,
	pub inference_datetime: String,
	pub status: Status,
}

/// A single job as returned by `GET /v1/api/inference?uuid=`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
	pub inference_uuid: String,
	pub status: Option<Status>,

	/// Whatever the model produced, if it has finished.
	#[serde(default)]
	pub inference: Option<serde_json::Value>,
}

/// The readout last published to `/v1/api/erp/update_data`.
///
/// The backend echoes query parameters back as strings, so numbers are accepted in either form.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erp {
	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	pub distance: i64,

	#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
	pub lane: u8,
}
