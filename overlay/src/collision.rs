use kurbo::Rect;

use crate::{Element, Scene};

/// Strict axis-aligned overlap: boxes that only share an edge do not collide.
pub fn collides(a: Rect, b: Rect) -> bool {
	a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

impl Scene {
	/// Returns the first element, other than `index` itself, that `candidate` would overlap.
	pub(crate) fn collision(&self, index: usize, candidate: Rect) -> Option<&Element> {
		self.elements()
			.iter()
			.enumerate()
			.filter(|&(i, _)| i != index)
			.map(|(_, element)| element)
			.find(|element| collides(candidate, element.rect))
	}
}
