//! An in-process stand-in for the inference API.
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::Client;

#[derive(Default)]
struct Inner {
	jobs: Vec<serde_json::Value>,
	uploads: Vec<(String, usize)>,
	erp: (String, String),
	broken: bool,
	next: u64,
}

#[derive(Clone)]
pub(crate) struct Mock {
	inner: Arc<Mutex<Inner>>,
}

#[derive(Deserialize)]
struct UuidQuery {
	uuid: String,
}

#[derive(Deserialize)]
struct ErpQuery {
	distance: String,
	lane: String,
}

impl Mock {
	pub fn new() -> Self {
		let inner = Inner {
			erp: ("500".to_string(), "1".to_string()),
			..Default::default()
		};

		Self {
			inner: Arc::new(Mutex::new(inner)),
		}
	}

	pub fn insert(&self, uuid: &str, datetime: &str, status: &str) {
		self.inner.lock().unwrap().jobs.push(json!({
			"inference_uuid": uuid,
			"inference_datetime": datetime,
			"status": status,
		}));
	}

	/// Answer the job list without `inference_results`.
	pub fn set_broken(&self, broken: bool) {
		self.inner.lock().unwrap().broken = broken;
	}

	pub fn uploads(&self) -> Vec<(String, usize)> {
		self.inner.lock().unwrap().uploads.clone()
	}

	pub fn job_count(&self) -> usize {
		self.inner.lock().unwrap().jobs.len()
	}

	/// Serve on an ephemeral port and return a client pointed at it.
	pub async fn serve(&self) -> Client {
		let app = Router::new()
			.route("/v1/api/inference/all", get(all))
			.route("/v1/api/inference/latest", get(latest))
			.route("/v1/api/inference", get(one).post(upload).delete(remove))
			.route("/v1/api/erp/update_data", get(erp).post(update_erp))
			.with_state(self.clone());

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();

		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});

		Client::new(format!("http://{addr}").parse().unwrap()).unwrap()
	}
}

async fn all(State(mock): State<Mock>) -> Json<serde_json::Value> {
	let inner = mock.inner.lock().unwrap();
	if inner.broken {
		return Json(json!({ "message": "something went wrong" }));
	}

	Json(json!({
		"message": "Latest inference result retrieved successfully",
		"inference_results": inner.jobs,
	}))
}

async fn latest(State(mock): State<Mock>) -> Json<serde_json::Value> {
	let inner = mock.inner.lock().unwrap();
	Json(json!({
		"message": "Latest inference result retrieved successfully",
		"latest_inference_result": inner.jobs.last(),
	}))
}

async fn one(State(mock): State<Mock>, Query(query): Query<UuidQuery>) -> Response {
	let inner = mock.inner.lock().unwrap();
	let Some(job) = inner.jobs.iter().find(|job| job["inference_uuid"] == query.uuid.as_str()) else {
		return (StatusCode::NOT_FOUND, Json(json!("Inference job not found"))).into_response();
	};

	Json(json!({
		"message": "Inference Results retrieved successfully",
		"inference_result": {
			"inference_uuid": query.uuid,
			"status": job["status"],
			"inference": null,
		},
	}))
	.into_response()
}

async fn upload(State(mock): State<Mock>, mut multipart: Multipart) -> Response {
	while let Ok(Some(field)) = multipart.next_field().await {
		if field.name() != Some("inference_data") {
			continue;
		}

		let name = field.file_name().unwrap_or_default().to_string();
		let Ok(data) = field.bytes().await else {
			break;
		};

		let mut inner = mock.inner.lock().unwrap();
		inner.next += 1;
		let uuid = format!("job-{}", inner.next);

		inner.uploads.push((name, data.len()));
		inner.jobs.push(json!({
			"inference_uuid": uuid,
			"inference_datetime": "2024-01-01T00:00:00Z",
			"status": "STARTED",
		}));

		return Json(json!({
			"message": "Inference job posted successfully",
			"body": { "uuid": uuid },
		}))
		.into_response();
	}

	(StatusCode::BAD_REQUEST, Json(json!({ "message": "No file provided" }))).into_response()
}

async fn remove(State(mock): State<Mock>, Query(query): Query<UuidQuery>) -> Response {
	let mut inner = mock.inner.lock().unwrap();
	let before = inner.jobs.len();
	inner.jobs.retain(|job| job["inference_uuid"] != query.uuid.as_str());

	if inner.jobs.len() == before {
		return (StatusCode::BAD_REQUEST, Json(json!("Inference job not found"))).into_response();
	}

	Json(json!({ "message": "Inference job deleted successfully", "body": null })).into_response()
}

async fn erp(State(mock): State<Mock>) -> Json<serde_json::Value> {
	let inner = mock.inner.lock().unwrap();
	Json(json!({
		"message": "Message Data retrieved successfully",
		"result": { "distance": inner.erp.0, "lane": inner.erp.1 },
	}))
}

async fn update_erp(State(mock): State<Mock>, Query(query): Query<ErpQuery>) -> Json<serde_json::Value> {
	let mut inner = mock.inner.lock().unwrap();
	inner.erp = (query.distance, query.lane);
	Json(json!({
		"message": "Message Data updated successfully",
		"result": { "distance": inner.erp.0, "lane": inner.erp.1 },
	}))
}
