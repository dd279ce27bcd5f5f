use std::path::Path;

use anyhow::Context;
use overlay::kurbo::{Rect, Size};
use overlay::{Element, ElementId, Event, Game, Kind, Move, Readout, Scene, SceneConfig};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A scene described in TOML: the viewport, optional role overrides and every element's box.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
	pub viewport: Viewport,

	#[serde(default)]
	pub config: SceneConfig,

	pub elements: Vec<ElementSpec>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
	pub id: ElementId,

	#[serde(default = "default_kind")]
	pub kind: Kind,

	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

fn default_kind() -> Kind {
	Kind::Block
}

impl SceneFile {
	pub fn parse(contents: &str) -> anyhow::Result<Scene> {
		let file: SceneFile = toml::from_str(contents).context("failed to parse scene")?;

		let elements = file.elements.into_iter().map(|spec| {
			let rect = Rect::new(spec.x, spec.y, spec.x + spec.width, spec.y + spec.height);
			Element::new(spec.id, spec.kind, rect)
		});

		let viewport = Size::new(file.viewport.width, file.viewport.height);
		Ok(Scene::new(file.config, viewport, elements)?)
	}

	pub fn load(path: &Path) -> anyhow::Result<Scene> {
		let contents = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
		Self::parse(&contents)
	}
}

/// What a replay did.
#[derive(Debug, Default)]
pub struct Summary {
	pub events: usize,
	pub blocked: usize,
	pub readouts: Vec<Readout>,
	pub published: usize,
}

/// One line for a readout, as shown to the user.
pub fn describe(readout: &Readout) -> String {
	let lanes: String = readout
		.lane
		.indicators()
		.iter()
		.map(|&lit| if lit { '●' } else { '○' })
		.collect();

	format!(
		"lane={} {lanes} distance={} color={}",
		readout.lane,
		readout.label(),
		readout.tier.color()
	)
}

fn changed(last: Option<&Readout>, next: &Readout) -> bool {
	match last {
		Some(last) => last.lane != next.lane || last.meters() != next.meters(),
		None => true,
	}
}

/// Replay newline-delimited JSON pointer events against the scene.
///
/// Bad lines and rejected presses are logged and skipped. When `publish` is set, every
/// readout that differs from the last published one is posted to the ERP endpoint.
pub async fn replay<R: AsyncBufRead + Unpin>(
	scene: Scene,
	input: R,
	publish: Option<&inference::Client>,
) -> anyhow::Result<Summary> {
	let mut game = Game::new(scene);
	let mut summary = Summary::default();
	let mut published: Option<Readout> = None;

	let mut lines = input.lines();
	while let Some(line) = lines.next_line().await.context("failed to read events")? {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		let event: Event = match serde_json::from_str(line) {
			Ok(event) => event,
			Err(err) => {
				tracing::warn!(%err, line, "skipping invalid event");
				continue;
			}
		};

		summary.events += 1;

		let update = match game.handle(event) {
			Ok(update) => update,
			Err(err) => {
				tracing::warn!(%err, "ignoring event");
				continue;
			}
		};

		for moved in &update.moves {
			if let Move::Blocked { id, by } = moved {
				summary.blocked += 1;
				println!("{id} blocked by {by}");
			}
		}

		let Some(readout) = update.readout else {
			continue;
		};

		println!("{}", describe(&readout));
		summary.readouts.push(readout);

		if let Some(client) = publish {
			if changed(published.as_ref(), &readout) {
				let erp = inference::Erp {
					distance: readout.meters(),
					lane: readout.lane.number(),
				};

				match client.update_erp(erp).await {
					Ok(_) => {
						summary.published += 1;
						published = Some(readout);
					}
					Err(err) => tracing::error!(%err, "failed to publish readout"),
				}
			}
		}
	}

	let overlay = game.scene().overlay();
	tracing::info!(events = summary.events, blocked = summary.blocked, rect = ?overlay.rect, "replay finished");

	Ok(summary)
}
