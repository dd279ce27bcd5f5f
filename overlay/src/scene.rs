use std::fmt;

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The identifier of an element, matching the id it carries in the page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ElementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ElementId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ElementId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Whether an element follows the pointer or only acts as an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	Block,
	Draggable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
	pub id: ElementId,
	pub kind: Kind,
	pub rect: Rect,
}

impl Element {
	pub fn new(id: impl Into<ElementId>, kind: Kind, rect: Rect) -> Self {
		Self {
			id: id.into(),
			kind,
			rect,
		}
	}

	pub fn block(id: impl Into<ElementId>, rect: Rect) -> Self {
		Self::new(id, Kind::Block, rect)
	}

	pub fn draggable(id: impl Into<ElementId>, rect: Rect) -> Self {
		Self::new(id, Kind::Draggable, rect)
	}
}

/// Which side of the overlay a satellite block sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
	Left,
	Right,
}

/// A block positioned relative to the overlay.
///
/// Offsets are percentages of the viewport width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
	pub id: ElementId,
	pub side: Side,

	/// Horizontal gap between the overlay edge and the satellite.
	pub gap: f64,

	/// Vertical offset from the overlay's top edge.
	/// Right satellites hang below it, left satellites sit above it (and above their own width).
	pub drop: f64,
}

impl Satellite {
	pub fn new(id: impl Into<ElementId>, side: Side, gap: f64, drop: f64) -> Self {
		Self {
			id: id.into(),
			side,
			gap,
			drop,
		}
	}
}

/// Names the elements the engine depends on and the readout constants.
///
/// The defaults match the stock page: `overlay` between `block1` and `block2`,
/// distance measured against `block4`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
	/// The draggable whose position drives the readout.
	pub overlay: ElementId,

	/// The left and right lane boundaries.
	pub anchors: [ElementId; 2],

	/// The block the distance is measured against.
	pub reference: ElementId,

	/// Blocks placed around the overlay on load and resize.
	pub satellites: Vec<Satellite>,

	/// Pixels to meters.
	pub distance_scale: f64,

	/// Distances above this are far, anything else positive is near.
	pub far_threshold: f64,
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			overlay: "overlay".into(),
			anchors: ["block1".into(), "block2".into()],
			reference: "block4".into(),
			satellites: vec![
				Satellite::new("block3", Side::Right, 5.0, 5.0),
				Satellite::new("block4", Side::Left, 5.0, 15.0),
				Satellite::new("block5", Side::Right, 5.0, 15.0),
				Satellite::new("block6", Side::Left, 5.0, 5.0),
			],
			distance_scale: 0.5,
			far_threshold: 100.0,
		}
	}
}

// Indexes into Scene::elements, resolved once so role lookups can't fail later.
#[derive(Clone, Debug)]
struct Roles {
	overlay: usize,
	anchors: [usize; 2],
	reference: usize,
	satellites: Vec<usize>,
}

/// Every element the engine works with, plus the viewport they live in.
///
/// Elements are never removed, so a scene that was built successfully always
/// holds the overlay, both anchors, the reference block and the satellites.
#[derive(Clone, Debug)]
pub struct Scene {
	config: SceneConfig,
	viewport: Size,
	elements: Vec<Element>,
	roles: Roles,
}

impl Scene {
	pub fn new(config: SceneConfig, viewport: Size, elements: impl IntoIterator<Item = Element>) -> Result<Self> {
		let elements: Vec<Element> = elements.into_iter().collect();

		for (i, element) in elements.iter().enumerate() {
			if elements[..i].iter().any(|other| other.id == element.id) {
				return Err(Error::DuplicateElement(element.id.clone()));
			}
		}

		let find = |id: &ElementId| {
			elements
				.iter()
				.position(|element| &element.id == id)
				.ok_or_else(|| Error::MissingElement(id.clone()))
		};

		let overlay = find(&config.overlay)?;
		if elements[overlay].kind != Kind::Draggable {
			return Err(Error::NotDraggable(config.overlay.clone()));
		}

		let roles = Roles {
			overlay,
			anchors: [find(&config.anchors[0])?, find(&config.anchors[1])?],
			reference: find(&config.reference)?,
			satellites: config
				.satellites
				.iter()
				.map(|satellite| find(&satellite.id))
				.collect::<Result<_>>()?,
		};

		Ok(Self {
			config,
			viewport,
			elements,
			roles,
		})
	}

	pub fn config(&self) -> &SceneConfig {
		&self.config
	}

	pub fn viewport(&self) -> Size {
		self.viewport
	}

	pub fn set_viewport(&mut self, viewport: Size) {
		self.viewport = viewport;
	}

	pub fn elements(&self) -> &[Element] {
		&self.elements
	}

	pub fn get(&self, id: &ElementId) -> Option<&Element> {
		self.elements.iter().find(|element| &element.id == id)
	}

	pub fn rect(&self, id: &ElementId) -> Option<Rect> {
		self.get(id).map(|element| element.rect)
	}

	/// Replace an element's bounding box, e.g. after the page re-measured it.
	pub fn set_rect(&mut self, id: &ElementId, rect: Rect) -> Result<()> {
		let element = self
			.elements
			.iter_mut()
			.find(|element| &element.id == id)
			.ok_or_else(|| Error::MissingElement(id.clone()))?;
		element.rect = rect;
		Ok(())
	}

	pub fn overlay(&self) -> &Element {
		&self.elements[self.roles.overlay]
	}

	pub fn anchors(&self) -> (Rect, Rect) {
		let [left, right] = self.roles.anchors;
		(self.elements[left].rect, self.elements[right].rect)
	}

	pub fn reference(&self) -> Rect {
		self.elements[self.roles.reference].rect
	}

	/// The satellites with their current boxes, in configuration order.
	pub fn satellites(&self) -> impl Iterator<Item = (&Satellite, Rect)> + '_ {
		self.config
			.satellites
			.iter()
			.zip(self.roles.satellites.iter())
			.map(|(satellite, &index)| (satellite, self.elements[index].rect))
	}

	pub fn draggables(&self) -> impl Iterator<Item = &Element> + '_ {
		self.elements.iter().filter(|element| element.kind == Kind::Draggable)
	}

	pub(crate) fn roles_overlay(&self) -> usize {
		self.roles.overlay
	}

	pub(crate) fn satellite_indices(&self) -> impl Iterator<Item = (usize, &Satellite)> + '_ {
		self.roles.satellites.iter().copied().zip(self.config.satellites.iter())
	}

	pub(crate) fn element(&self, index: usize) -> &Element {
		&self.elements[index]
	}

	pub(crate) fn move_to(&mut self, index: usize, origin: Point) {
		let rect = &mut self.elements[index].rect;
		*rect = rect.with_origin(origin);
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// The stock page at 1000x800: two anchors 300px apart with the overlay between them.
	pub(crate) fn stock() -> Scene {
		let elements = vec![
			Element::block("block1", Rect::new(100.0, 0.0, 200.0, 800.0)),
			Element::block("block2", Rect::new(500.0, 0.0, 600.0, 800.0)),
			Element::block("block3", Rect::new(900.0, 0.0, 940.0, 40.0)),
			Element::block("block4", Rect::new(900.0, 100.0, 940.0, 140.0)),
			Element::block("block5", Rect::new(900.0, 200.0, 940.0, 240.0)),
			Element::block("block6", Rect::new(900.0, 300.0, 940.0, 340.0)),
			Element::draggable("overlay", Rect::new(0.0, 0.0, 60.0, 100.0)),
		];

		Scene::new(SceneConfig::default(), Size::new(1000.0, 800.0), elements).unwrap()
	}

	#[test]
	fn roles() {
		let scene = stock();
		assert_eq!(scene.overlay().id.as_str(), "overlay");
		assert_eq!(scene.anchors().0, Rect::new(100.0, 0.0, 200.0, 800.0));
		assert_eq!(scene.reference(), Rect::new(900.0, 100.0, 940.0, 140.0));
		assert_eq!(scene.satellites().count(), 4);
		assert_eq!(scene.draggables().count(), 1);
	}

	#[test]
	fn missing() {
		let elements = vec![
			Element::block("block1", Rect::ZERO),
			Element::draggable("overlay", Rect::ZERO),
		];

		let err = Scene::new(SceneConfig::default(), Size::ZERO, elements).unwrap_err();
		assert_eq!(err, Error::MissingElement("block2".into()));
	}

	#[test]
	fn duplicate() {
		let elements = vec![
			Element::block("block1", Rect::ZERO),
			Element::block("block1", Rect::ZERO),
		];

		let err = Scene::new(SceneConfig::default(), Size::ZERO, elements).unwrap_err();
		assert_eq!(err, Error::DuplicateElement("block1".into()));
	}

	#[test]
	fn overlay_must_drag() {
		let mut elements: Vec<Element> = stock().elements().to_vec();
		elements.last_mut().unwrap().kind = Kind::Block;

		let err = Scene::new(SceneConfig::default(), Size::ZERO, elements).unwrap_err();
		assert_eq!(err, Error::NotDraggable("overlay".into()));
	}

	#[test]
	fn set_rect() {
		let mut scene = stock();
		let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
		scene.set_rect(&"block3".into(), rect).unwrap();
		assert_eq!(scene.rect(&"block3".into()), Some(rect));

		let err = scene.set_rect(&"nope".into(), rect).unwrap_err();
		assert_eq!(err, Error::MissingElement("nope".into()));
	}

	#[test]
	fn config_toml_shape() {
		let config: SceneConfig = serde_json::from_str(r#"{ "reference": "block6", "far_threshold": 50.0 }"#).unwrap();
		assert_eq!(config.reference.as_str(), "block6");
		assert_eq!(config.far_threshold, 50.0);
		assert_eq!(config.overlay.as_str(), "overlay");
	}
}
