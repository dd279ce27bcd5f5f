use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Erp, Error, InferenceRecord, InferenceResult, Result};

/// The API origin used when none is configured.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Connection settings for the inference API.
#[serde_with::skip_serializing_none]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
	/// The origin of the inference API.
	/// Defaults to http://localhost:5000 if not provided.
	#[cfg_attr(feature = "cli", arg(long = "url", id = "url", env = "INFERENCE_URL"))]
	pub url: Option<Url>,

	/// Give up on a request after this many seconds.
	/// Ignored in the browser, where fetch has no timeout.
	#[cfg_attr(feature = "cli", arg(long = "timeout", id = "timeout", env = "INFERENCE_TIMEOUT"))]
	pub timeout: Option<u64>,
}

impl ClientConfig {
	pub fn init(self) -> Result<Client> {
		let url = match self.url {
			Some(url) => url,
			None => Url::parse(DEFAULT_URL)?,
		};

		#[allow(unused_mut)]
		let mut builder = reqwest::Client::builder();

		#[cfg(not(target_arch = "wasm32"))]
		{
			if let Some(timeout) = self.timeout {
				builder = builder.timeout(std::time::Duration::from_secs(timeout));
			}
		}

		Client::with_http(url, builder.build()?)
	}
}

/// Which rendition of a job's video to stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VideoKind {
	/// The uploaded video after preprocessing.
	#[default]
	Preprocessed,

	/// The video with the inference results drawn on it.
	Postprocessed,
}

impl VideoKind {
	fn path(self) -> &'static str {
		match self {
			VideoKind::Preprocessed => "/v1/api/video/preprocessed",
			VideoKind::Postprocessed => "/v1/api/video/postprocessed",
		}
	}
}

#[derive(Deserialize)]
struct ResultResponse {
	inference_result: Option<InferenceResult>,
}

#[derive(Deserialize)]
struct ErpResponse {
	result: Option<Erp>,
}

/// A handle to the inference API, cheap to clone.
#[derive(Clone, Debug)]
pub struct Client {
	http: reqwest::Client,
	origin: Url,
}

impl Client {
	pub fn new(origin: Url) -> Result<Self> {
		Self::with_http(origin, reqwest::Client::new())
	}

	pub fn with_http(origin: Url, http: reqwest::Client) -> Result<Self> {
		if origin.cannot_be_a_base() {
			return Err(Error::InvalidUrl(origin));
		}

		Ok(Self { http, origin })
	}

	pub fn origin(&self) -> &Url {
		&self.origin
	}

	fn endpoint(&self, path: &str) -> Url {
		let mut url = self.origin.clone();
		url.set_path(path);
		url.set_query(None);
		url.set_fragment(None);
		url
	}

	/// The URL the player should load to stream a job's video.
	pub fn video_url(&self, uuid: &str, kind: VideoKind) -> Url {
		let mut url = self.endpoint(kind.path());
		url.query_pairs_mut().append_pair("uuid", uuid);
		url
	}

	/// `GET /v1/api/inference/all`
	pub async fn list(&self) -> Result<Vec<InferenceRecord>> {
		let request = self.http.get(self.endpoint("/v1/api/inference/all"));
		let mut body: serde_json::Value = send(request).await?;

		let results = match body.get_mut("inference_results").map(serde_json::Value::take) {
			None | Some(serde_json::Value::Null) => return Err(Error::InvalidResponse("inference_results")),
			Some(results) => results,
		};

		Ok(serde_json::from_value(results)?)
	}

	/// `GET /v1/api/inference?uuid=`
	pub async fn get(&self, uuid: &str) -> Result<InferenceResult> {
		let request = self.http.get(self.endpoint("/v1/api/inference")).query(&[("uuid", uuid)]);
		let body: ResultResponse = send(request).await?;
		body.inference_result.ok_or(Error::InvalidResponse("inference_result"))
	}

	/// `GET /v1/api/inference/latest`
	pub async fn latest(&self) -> Result<serde_json::Value> {
		let request = self.http.get(self.endpoint("/v1/api/inference/latest"));
		let mut body: serde_json::Value = send(request).await?;

		body.get_mut("latest_inference_result")
			.map(serde_json::Value::take)
			.ok_or(Error::InvalidResponse("latest_inference_result"))
	}

	/// `POST /v1/api/inference`, sending the video as the `inference_data` form field.
	pub async fn upload(&self, name: &str, video: Vec<u8>) -> Result<serde_json::Value> {
		let part = reqwest::multipart::Part::bytes(video).file_name(name.to_string());
		let form = reqwest::multipart::Form::new().part("inference_data", part);

		let request = self.http.post(self.endpoint("/v1/api/inference")).multipart(form);
		send(request).await
	}

	/// `DELETE /v1/api/inference?uuid=`
	pub async fn delete(&self, uuid: &str) -> Result<serde_json::Value> {
		let request = self
			.http
			.delete(self.endpoint("/v1/api/inference"))
			.query(&[("uuid", uuid)]);
		send(request).await
	}

	/// `POST /v1/api/erp/update_data?distance=&lane=`
	pub async fn update_erp(&self, erp: Erp) -> Result<Erp> {
		let request = self
			.http
			.post(self.endpoint("/v1/api/erp/update_data"))
			.query(&[("distance", erp.distance.to_string()), ("lane", erp.lane.to_string())]);
		let body: ErpResponse = send(request).await?;
		body.result.ok_or(Error::InvalidResponse("result"))
	}

	/// `GET /v1/api/erp/update_data`
	pub async fn erp(&self) -> Result<Erp> {
		let request = self.http.get(self.endpoint("/v1/api/erp/update_data"));
		let body: ErpResponse = send(request).await?;
		body.result.ok_or(Error::InvalidResponse("result"))
	}
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
	let response = request.send().await?;

	let status = response.status();
	if !status.is_success() {
		return Err(Error::Status(status));
	}

	let body = response.bytes().await?;
	Ok(serde_json::from_slice(&body)?)
}
