use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::{layout, Dragger, ElementId, Readout, Result, Scene};

/// A pointer or window event fed to the [`Game`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
	/// Pointer-down on `target`.
	Down { target: ElementId, x: f64, y: f64 },

	/// Pointer-move anywhere in the page.
	Move { x: f64, y: f64 },

	/// Pointer-up anywhere in the page.
	Up,

	/// The viewport changed size.
	Resize { width: f64, height: f64 },
}

/// The outcome of moving one dragged element.
#[derive(Clone, Debug, PartialEq)]
pub enum Move {
	Committed { id: ElementId, rect: Rect },
	Blocked { id: ElementId, by: ElementId },
}

/// Everything that changed in response to a single event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Update {
	pub moves: Vec<Move>,

	/// Set when the overlay was dragged and the readout was recomputed.
	///
	/// Measured from the committed position, so a blocked move reports the unchanged lane and distance.
	pub readout: Option<Readout>,
}

/// The collision overlay: a scene, its drag state and the last readout.
#[derive(Clone, Debug)]
pub struct Game {
	scene: Scene,
	drag: Dragger,
	readout: Option<Readout>,
}

impl Game {
	/// Lays out the scene and starts with nothing being dragged.
	pub fn new(mut scene: Scene) -> Self {
		layout::apply(&mut scene);
		let drag = Dragger::new(&scene);

		Self {
			scene,
			drag,
			readout: None,
		}
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	pub fn dragger(&self) -> &Dragger {
		&self.drag
	}

	/// The readout from the last time the overlay was dragged.
	pub fn readout(&self) -> Option<&Readout> {
		self.readout.as_ref()
	}

	pub fn handle(&mut self, event: Event) -> Result<Update> {
		match event {
			Event::Down { target, x, y } => {
				self.press(&target, Point::new(x, y))?;
				Ok(Update::default())
			}
			Event::Move { x, y } => Ok(self.drag(Point::new(x, y))),
			Event::Up => {
				self.release();
				Ok(Update::default())
			}
			Event::Resize { width, height } => {
				self.resize(Size::new(width, height));
				Ok(Update::default())
			}
		}
	}

	pub fn press(&mut self, id: &ElementId, pointer: Point) -> Result<()> {
		self.drag.press(&self.scene, id, pointer)
	}

	pub fn release(&mut self) {
		self.drag.release();
	}

	/// Move every element being dragged so it keeps its grab offset from `pointer`.
	///
	/// A move that would overlap any other element is dropped entirely; there is no sliding along the free axis.
	pub fn drag(&mut self, pointer: Point) -> Update {
		let mut update = Update::default();

		let targets: Vec<(usize, Point)> = self
			.scene
			.elements()
			.iter()
			.enumerate()
			.filter_map(|(index, element)| Some((index, self.drag.target(&element.id, pointer)?)))
			.collect();

		let overlay = self.scene.roles_overlay();

		for (index, origin) in targets {
			let element = self.scene.element(index);
			let id = element.id.clone();
			let candidate = element.rect.with_origin(origin);

			match self.scene.collision(index, candidate).map(|other| other.id.clone()) {
				Some(by) => {
					tracing::debug!(%id, %by, "collision detected, movement blocked");
					update.moves.push(Move::Blocked { id, by });
				}
				None => {
					self.scene.move_to(index, origin);
					update.moves.push(Move::Committed { id, rect: candidate });
				}
			}

			if index == overlay {
				let readout = Readout::measure(&self.scene);
				tracing::debug!(lane = %readout.lane, distance = readout.distance, "readout");

				self.readout = Some(readout);
				update.readout = Some(readout);
			}
		}

		update
	}

	/// Record a new viewport size and recompute the layout from scratch.
	pub fn resize(&mut self, viewport: Size) {
		self.scene.set_viewport(viewport);
		layout::apply(&mut self.scene);
	}

	/// Feed back a box measured by the page, e.g. after CSS changed an element's size.
	pub fn measured(&mut self, id: &ElementId, rect: Rect) -> Result<()> {
		self.scene.set_rect(id, rect)
	}
}
