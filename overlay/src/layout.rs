//! Positions derived from the current measured layout.
//!
//! Everything here is recomputed from scratch on load and on every resize.
use kurbo::{Point, Rect, Size};

use crate::{Satellite, Scene, Side};

/// Center the overlay horizontally between the anchors and vertically in the viewport.
pub fn center(viewport: Size, left: Rect, right: Rect, overlay: Size) -> Point {
	let gap = right.x0 - left.x1;
	let x = left.x1 + gap / 2.0 - overlay.width / 2.0;
	let y = viewport.height / 2.0 - overlay.height / 2.0;
	Point::new(x, y)
}

/// Where a satellite goes relative to the overlay's box.
pub fn satellite(viewport: Size, overlay: Rect, satellite: &Satellite, size: Size) -> Point {
	let vw = viewport.width / 100.0;

	match satellite.side {
		Side::Right => Point::new(overlay.x1 + satellite.gap * vw, overlay.y0 + satellite.drop * vw),
		Side::Left => Point::new(
			overlay.x0 - size.width - satellite.gap * vw,
			overlay.y0 - size.width - satellite.drop * vw,
		),
	}
}

/// Re-center the overlay, then place every satellite around it.
pub fn apply(scene: &mut Scene) {
	let viewport = scene.viewport();
	let (left, right) = scene.anchors();
	let overlay = scene.overlay().rect;
	let index = scene.roles_overlay();

	let origin = center(viewport, left, right, overlay.size());
	scene.move_to(index, origin);

	tracing::debug!(?viewport, ?origin, "positioned overlay");

	place_satellites(scene);
}

/// Place the satellites around wherever the overlay currently is.
pub fn place_satellites(scene: &mut Scene) {
	let viewport = scene.viewport();
	let overlay = scene.overlay().rect;

	let placed: Vec<(usize, Point)> = scene
		.satellite_indices()
		.map(|(index, config)| {
			let size = scene.element(index).rect.size();
			(index, satellite(viewport, overlay, config, size))
		})
		.collect();

	for (index, origin) in placed {
		scene.move_to(index, origin);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scene::tests::stock;
	use crate::ElementId;

	#[test]
	fn centered() {
		let mut scene = stock();
		apply(&mut scene);

		// Gap 200..500 centered at 350, overlay is 60x100 in a 1000x800 viewport.
		let overlay = scene.overlay().rect;
		assert_eq!(overlay, Rect::new(320.0, 350.0, 380.0, 450.0));
	}

	#[test]
	fn satellites() {
		let mut scene = stock();
		apply(&mut scene);

		// 1vw = 10px, satellites are 40x40.
		let rect = |id: &str| scene.rect(&ElementId::from(id)).unwrap();
		assert_eq!(rect("block3").origin(), Point::new(430.0, 400.0));
		assert_eq!(rect("block5").origin(), Point::new(430.0, 500.0));
		assert_eq!(rect("block4").origin(), Point::new(230.0, 160.0));
		assert_eq!(rect("block6").origin(), Point::new(230.0, 260.0));

		// Sizes are untouched.
		assert_eq!(rect("block4").size(), Size::new(40.0, 40.0));
	}

	#[test]
	fn resize_recomputes() {
		let mut scene = stock();
		apply(&mut scene);
		let before = scene.rect(&"block3".into()).unwrap();

		scene.set_viewport(Size::new(2000.0, 600.0));
		apply(&mut scene);

		let overlay = scene.overlay().rect;
		assert_eq!(overlay.origin(), Point::new(320.0, 250.0));

		let after = scene.rect(&"block3".into()).unwrap();
		assert_ne!(before, after);
		assert_eq!(after.origin(), Point::new(380.0 + 100.0, 250.0 + 100.0));
	}
}
