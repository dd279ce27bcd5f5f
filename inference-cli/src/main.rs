use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use inference::{Console, VideoKind};
use tokio::io::BufReader;

mod config;
mod game;
mod log;

pub use config::*;
pub use log::*;

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
	/// List every inference job.
	List,

	/// Show a single job.
	Get {
		/// The inference UUID.
		uuid: String,
	},

	/// Show the most recent job.
	Latest,

	/// Upload a video and start an inference job.
	Upload {
		/// The video file to upload.
		file: PathBuf,
	},

	/// Delete a job.
	Delete {
		/// The inference UUID.
		uuid: String,
	},

	/// Print the URL that streams a job's video.
	Video {
		/// The inference UUID.
		uuid: String,

		/// Use the annotated output instead of the preprocessed input.
		#[arg(long)]
		postprocessed: bool,
	},

	/// Show the readout last published to the backend.
	Erp,

	/// Replay pointer events against the collision overlay.
	Game {
		/// A TOML file describing the viewport and every element.
		#[arg(long)]
		scene: PathBuf,

		/// Newline-delimited JSON events; reads stdin if omitted.
		#[arg(long)]
		events: Option<PathBuf>,

		/// Post every changed readout to the backend.
		#[arg(long)]
		publish: bool,
	},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::load()?;
	cli.config.log.init()?;

	let client = cli.config.client.clone().init().context("invalid client configuration")?;
	tracing::debug!(origin = %client.origin(), "using inference api");

	match cli.command {
		Command::List => {
			let mut console = Console::new(client, cli.config.console);
			console.list_jobs().await.context("failed to list jobs")?;

			for job in console.jobs() {
				let marker = match console.active() == Some(job.inference_uuid.as_str()) {
					true => "*",
					false => " ",
				};
				println!(
					"{marker} {}  {}  {} ({})",
					job.inference_uuid,
					job.inference_datetime,
					job.status,
					job.status.badge().as_str()
				);
			}

			if let Some(source) = &console.player().source {
				println!("video: {source}");
			}
		}
		Command::Get { uuid } => {
			let result = client.get(&uuid).await.context("failed to get job")?;
			println!("{}", serde_json::to_string_pretty(&result)?);
		}
		Command::Latest => {
			let latest = client.latest().await.context("failed to get latest job")?;
			println!("{}", serde_json::to_string_pretty(&latest)?);
		}
		Command::Upload { file } => {
			let video = tokio::fs::read(&file)
				.await
				.with_context(|| format!("failed to read {}", file.display()))?;
			let name = file
				.file_name()
				.and_then(|name| name.to_str())
				.context("invalid file name")?
				.to_string();

			let mut console = Console::new(client, cli.config.console);
			console.upload_job(&name, video).await.context("failed to upload")?;

			for alert in console.alerts() {
				println!("{}", alert.message);
			}
			println!("{} jobs", console.jobs().len());
		}
		Command::Delete { uuid } => {
			client.delete(&uuid).await.context("failed to delete job")?;
			println!("deleted {uuid}");
		}
		Command::Video { uuid, postprocessed } => {
			let kind = match postprocessed {
				true => VideoKind::Postprocessed,
				false => VideoKind::Preprocessed,
			};
			println!("{}", client.video_url(&uuid, kind));
		}
		Command::Erp => {
			let erp = client.erp().await.context("failed to get readout")?;
			println!("lane={} distance={}m", erp.lane, erp.distance);
		}
		Command::Game {
			scene,
			events,
			publish,
		} => {
			let scene = game::SceneFile::load(&scene)?;
			let publish = publish.then_some(&client);

			let summary = match events {
				Some(path) => {
					let file = tokio::fs::File::open(&path)
						.await
						.with_context(|| format!("failed to open {}", path.display()))?;
					game::replay(scene, BufReader::new(file), publish).await?
				}
				None => game::replay(scene, BufReader::new(tokio::io::stdin()), publish).await?,
			};

			tracing::info!(readouts = summary.readouts.len(), published = summary.published, "done");
		}
	}

	Ok(())
}
