use serde::{Deserialize, Serialize};
use url::Url;

use crate::{markup, Client, InferenceRecord, Result, Status, VideoKind};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
	/// After a refresh with nothing selected, select the first finished job.
	pub auto_select: bool,

	/// Which rendition the player streams.
	#[serde(skip)]
	pub video: VideoKind,
}

impl Default for ConsoleConfig {
	fn default() -> Self {
		Self {
			auto_select: true,
			video: VideoKind::Preprocessed,
		}
	}
}

/// What the video element is doing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Player {
	pub source: Option<Url>,

	/// Playback position in seconds.
	pub position: f64,
	pub playing: bool,

	/// How many times the source was (re)loaded.
	pub loads: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
	Success,
}

impl AlertKind {
	pub fn as_str(self) -> &'static str {
		match self {
			AlertKind::Success => "success",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
	pub message: String,
	pub kind: AlertKind,
}

impl Alert {
	pub fn html(&self) -> String {
		markup::alert(&self.message, self.kind.as_str())
	}
}

/// The job list, the selected job and the player, kept in sync with the API.
///
/// The `apply_*` methods take the result of a [`Client`] call, so a caller that can't
/// hold the console across an await (e.g. the browser) can fetch first and apply after.
#[derive(Clone, Debug)]
pub struct Console {
	client: Client,
	config: ConsoleConfig,
	jobs: Vec<InferenceRecord>,
	active: Option<String>,
	player: Player,
	alerts: Vec<Alert>,
}

impl Console {
	pub fn new(client: Client, config: ConsoleConfig) -> Self {
		Self {
			client,
			config,
			jobs: Vec::new(),
			active: None,
			player: Player::default(),
			alerts: Vec::new(),
		}
	}

	pub fn client(&self) -> &Client {
		&self.client
	}

	pub fn jobs(&self) -> &[InferenceRecord] {
		&self.jobs
	}

	/// The uuid of the selected job, if any.
	pub fn active(&self) -> Option<&str> {
		self.active.as_deref()
	}

	pub fn player(&self) -> &Player {
		&self.player
	}

	pub fn alerts(&self) -> &[Alert] {
		&self.alerts
	}

	/// The markup for every entry, in list order.
	pub fn html(&self) -> String {
		self.jobs
			.iter()
			.map(|job| markup::entry(job, self.active.as_deref() == Some(job.inference_uuid.as_str())))
			.collect()
	}

	/// Fetch the job list and apply it.
	pub async fn list_jobs(&mut self) -> Result<()> {
		let res = self.client.list().await;
		self.apply_list(res)
	}

	/// Replace the list with freshly fetched records.
	///
	/// On error nothing changes. The selection survives if its job is still listed.
	pub fn apply_list(&mut self, res: Result<Vec<InferenceRecord>>) -> Result<()> {
		let jobs = res.inspect_err(|err| tracing::error!(%err, "failed to fetch inference jobs"))?;

		tracing::info!(count = jobs.len(), "fetched inference jobs");
		self.jobs = jobs;

		if let Some(active) = &self.active {
			if !self.contains(active) {
				self.active = None;
			}
		}

		if self.active.is_none() && self.config.auto_select {
			let first = self
				.jobs
				.iter()
				.find(|job| job.status == Status::Success)
				.map(|job| job.inference_uuid.clone());

			if let Some(uuid) = first {
				tracing::debug!(%uuid, "selecting default video");
				self.select_job(&uuid);
			}
		}

		Ok(())
	}

	/// Point the player at the job's video, reload it and mark the entry active.
	pub fn select_job(&mut self, uuid: &str) -> &Url {
		let source = self.client.video_url(uuid, self.config.video);
		tracing::info!(%uuid, %source, "selected job");

		self.active = self.contains(uuid).then(|| uuid.to_string());
		self.player.position = 0.0;
		self.player.playing = false;
		self.player.loads += 1;

		self.player.source.insert(source)
	}

	/// Delete a job on the server, then drop it from the list.
	pub async fn delete_job(&mut self, uuid: &str) -> Result<bool> {
		let res = self.client.delete(uuid).await;
		self.apply_delete(uuid, res)
	}

	/// Returns true if an entry was removed. Deleting a job that isn't listed is a no-op.
	pub fn apply_delete(&mut self, uuid: &str, res: Result<serde_json::Value>) -> Result<bool> {
		res.inspect_err(|err| tracing::error!(%err, %uuid, "failed to delete video"))?;

		let before = self.jobs.len();
		self.jobs.retain(|job| job.inference_uuid != uuid);

		if self.active.as_deref() == Some(uuid) {
			self.active = None;
		}

		let removed = self.jobs.len() != before;
		tracing::info!(%uuid, removed, "deleted job");

		Ok(removed)
	}

	/// Upload a video, then refresh the list and show a notification.
	///
	/// The refresh only happens after the upload succeeded; a failed refresh is logged but
	/// still counts as a successful upload.
	pub async fn upload_job(&mut self, name: &str, video: Vec<u8>) -> Result<()> {
		let res = self.client.upload(name, video).await;
		self.apply_upload(res)?;

		// Already logged by apply_list; the upload itself succeeded.
		self.list_jobs().await.ok();
		self.uploaded();

		Ok(())
	}

	pub fn apply_upload(&mut self, res: Result<serde_json::Value>) -> Result<()> {
		let body = res.inspect_err(|err| tracing::error!(%err, "failed to upload file"))?;
		tracing::info!(%body, "file uploaded");
		Ok(())
	}

	/// Show the upload notification.
	pub fn uploaded(&mut self) {
		self.alerts.push(Alert {
			message: "File uploaded successfully".to_string(),
			kind: AlertKind::Success,
		});
	}

	pub fn dismiss(&mut self, index: usize) -> Option<Alert> {
		(index < self.alerts.len()).then(|| self.alerts.remove(index))
	}

	/// Jump to `time` seconds and resume playback.
	pub fn seek(&mut self, time: f64) {
		self.player.position = time.max(0.0);
		self.player.playing = true;
	}

	fn contains(&self, uuid: &str) -> bool {
		self.jobs.iter().any(|job| job.inference_uuid == uuid)
	}
}
