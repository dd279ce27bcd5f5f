use std::collections::HashMap;

use kurbo::{Point, Vec2};

use crate::{ElementId, Error, Kind, Result, Scene};

/// Press state for one draggable.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
	/// True between pointer-down on the element and the next pointer-up anywhere.
	pub down: bool,

	/// Element origin minus pointer position, captured at pointer-down.
	pub offset: Vec2,
}

/// Owns the drag state of every draggable in a scene.
///
/// Only a single pointer is assumed, but nothing stops two elements from being down at once.
#[derive(Clone, Debug, Default)]
pub struct Dragger {
	states: HashMap<ElementId, DragState>,
}

impl Dragger {
	pub fn new(scene: &Scene) -> Self {
		let states = scene
			.draggables()
			.map(|element| (element.id.clone(), DragState::default()))
			.collect();

		Self { states }
	}

	pub fn state(&self, id: &ElementId) -> Option<&DragState> {
		self.states.get(id)
	}

	/// Start dragging `id`, remembering where the pointer grabbed it.
	pub fn press(&mut self, scene: &Scene, id: &ElementId, pointer: Point) -> Result<()> {
		let element = scene.get(id).ok_or_else(|| Error::MissingElement(id.clone()))?;
		if element.kind != Kind::Draggable {
			return Err(Error::NotDraggable(id.clone()));
		}

		let state = self.states.entry(id.clone()).or_default();
		state.down = true;
		state.offset = element.rect.origin() - pointer;

		tracing::debug!(%id, offset = ?state.offset, "drag started");

		Ok(())
	}

	/// Pointer-up ends every drag, wherever it happens.
	pub fn release(&mut self) {
		for state in self.states.values_mut() {
			state.down = false;
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.states.values().any(|state| state.down)
	}

	/// Where `id` would go if the pointer is at `pointer`, or None when it isn't being dragged.
	pub fn target(&self, id: &ElementId, pointer: Point) -> Option<Point> {
		let state = self.states.get(id).filter(|state| state.down)?;
		Some(pointer + state.offset)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scene::tests::stock;

	#[test]
	fn press_release() {
		let scene = stock();
		let mut drag = Dragger::new(&scene);
		let overlay = ElementId::from("overlay");

		assert!(!drag.is_dragging());
		assert_eq!(drag.target(&overlay, Point::new(5.0, 5.0)), None);

		drag.press(&scene, &overlay, Point::new(20.0, 30.0)).unwrap();
		assert!(drag.is_dragging());
		assert_eq!(drag.state(&overlay).unwrap().offset, Vec2::new(-20.0, -30.0));

		// The element keeps its grab point instead of centering under the pointer.
		assert_eq!(drag.target(&overlay, Point::new(320.0, 430.0)), Some(Point::new(300.0, 400.0)));

		drag.release();
		assert!(!drag.is_dragging());
		assert_eq!(drag.target(&overlay, Point::new(320.0, 430.0)), None);
	}

	#[test]
	fn press_block() {
		let scene = stock();
		let mut drag = Dragger::new(&scene);

		let err = drag.press(&scene, &"block1".into(), Point::ZERO).unwrap_err();
		assert_eq!(err, Error::NotDraggable("block1".into()));

		let err = drag.press(&scene, &"ghost".into(), Point::ZERO).unwrap_err();
		assert_eq!(err, Error::MissingElement("ghost".into()));

		assert!(!drag.is_dragging());
	}
}
