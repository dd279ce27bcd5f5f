use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use overlay::kurbo::{Point, Rect, Size};
use overlay::{Element, ElementId, Game, Kind, Move, Readout, Scene, SceneConfig, Update};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent, TouchEvent, Window};

use crate::error::lookup;
use crate::{Error, Result};

/// The game plus the DOM nodes it writes to.
struct Page {
	window: Window,
	game: Game,
	nodes: HashMap<ElementId, HtmlElement>,
	distance: HtmlElement,
	lane: HtmlElement,
	indicators: [HtmlElement; 3],
}

impl Page {
	fn new(window: &Window, document: &Document) -> Result<Self> {
		let found = document.query_selector_all(".block, .draggable")?;

		let measured = (0..found.length())
			.filter_map(|index| found.get(index)?.dyn_into::<HtmlElement>().ok())
			.map(|node| {
				let kind = match node.class_list().contains("draggable") {
					true => Kind::Draggable,
					false => Kind::Block,
				};
				(node.id(), kind, measure(&node), node)
			});

		let (elements, nodes) = register(measured);

		let scene = Scene::new(SceneConfig::default(), viewport(window)?, elements)?;

		Ok(Self {
			window: window.clone(),
			game: Game::new(scene),
			nodes,
			distance: lookup(document, "distance")?,
			lane: lookup(document, "lane")?,
			indicators: [lookup(document, "1")?, lookup(document, "2")?, lookup(document, "3")?],
		})
	}

	/// Write every element's position to the page.
	fn place_all(&self) {
		for element in self.game.scene().elements() {
			self.place(&element.id, element.rect);
		}
	}

	fn place(&self, id: &ElementId, rect: Rect) {
		let Some(node) = self.nodes.get(id) else {
			return;
		};

		let style = node.style();
		let left = style.set_property("left", &format!("{}px", rect.x0));
		let top = style.set_property("top", &format!("{}px", rect.y0));

		if let Err(err) = left.and(top) {
			tracing::warn!(%id, ?err, "failed to position element");
		}
	}

	fn show(&self, update: &Update) {
		for change in &update.moves {
			if let Move::Committed { id, rect } = change {
				self.place(id, *rect);
			}
		}

		if let Some(readout) = &update.readout {
			self.show_readout(readout);
		}
	}

	fn show_readout(&self, readout: &Readout) {
		self.distance.set_text_content(Some(&readout.label()));
		if let Err(err) = self.distance.style().set_property("color", readout.tier.color()) {
			tracing::warn!(?err, "failed to color distance");
		}

		self.lane.set_text_content(Some(&readout.lane.number().to_string()));

		for (node, lit) in self.indicators.iter().zip(readout.lane.indicators()) {
			let classes = node.class_list();
			let res = match lit {
				true => classes.add_1("active"),
				false => classes.remove_1("active"),
			};

			if let Err(err) = res {
				tracing::warn!(?err, "failed to update lane indicator");
			}
		}
	}

	fn on_press(&mut self, id: &ElementId, event: Event) {
		let Some(pointer) = pointer(&event) else {
			return;
		};

		if let Err(err) = self.game.press(id, pointer) {
			tracing::warn!(%err, "ignoring press");
		}
	}

	fn on_move(&mut self, event: Event) {
		if !self.game.dragger().is_dragging() {
			return;
		}

		// Keep touch drags from scrolling the page.
		event.prevent_default();

		let Some(pointer) = pointer(&event) else {
			return;
		};

		let update = self.game.drag(pointer);
		self.show(&update);
	}

	fn on_release(&mut self, _event: Event) {
		self.game.release();
	}

	fn on_resize(&mut self, _event: Event) {
		// Sizes are in viewport units, so re-measure before laying out again.
		for (id, node) in &self.nodes {
			let rect = measure(node);
			let current = self.game.scene().rect(id).unwrap_or(rect);

			if let Err(err) = self.game.measured(id, current.with_size(rect.size())) {
				tracing::warn!(%err, "failed to re-measure element");
			}
		}

		match viewport(&self.window) {
			Ok(size) => self.game.resize(size),
			Err(err) => tracing::warn!(%err, "failed to read viewport"),
		}

		self.place_all();
	}
}

/// Split measured nodes into scene elements and an id lookup, skipping nodes without an id.
fn register<T>(measured: impl IntoIterator<Item = (String, Kind, Rect, T)>) -> (Vec<Element>, HashMap<ElementId, T>) {
	let mut elements = Vec::new();
	let mut nodes = HashMap::new();

	for (id, kind, rect, node) in measured {
		if id.is_empty() {
			tracing::warn!(?kind, ?rect, "skipping element without an id");
			continue;
		}

		let id = ElementId::new(id);
		elements.push(Element::new(id.clone(), kind, rect));
		nodes.insert(id, node);
	}

	(elements, nodes)
}

fn measure(node: &HtmlElement) -> Rect {
	let bounds = node.get_bounding_client_rect();
	Rect::new(bounds.left(), bounds.top(), bounds.right(), bounds.bottom())
}

fn viewport(window: &Window) -> Result<Size> {
	let width = window.inner_width()?.as_f64().ok_or(Error::Js("innerWidth".to_string()))?;
	let height = window.inner_height()?.as_f64().ok_or(Error::Js("innerHeight".to_string()))?;
	Ok(Size::new(width, height))
}

/// Where the pointer is, for both mouse and touch events.
fn pointer(event: &Event) -> Option<Point> {
	if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
		return Some(Point::new(mouse.client_x() as f64, mouse.client_y() as f64));
	}

	let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
	Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

fn listen<F>(target: &web_sys::EventTarget, kinds: &[&str], page: &Rc<RefCell<Page>>, handler: F) -> Result<()>
where
	F: Fn(&mut Page, Event) + 'static,
{
	let page = page.clone();
	let callback = Closure::wrap(Box::new(move |event: Event| {
		// A handler re-entering through a nested event would find the page busy; drop that event.
		if let Ok(mut page) = page.try_borrow_mut() {
			handler(&mut page, event)
		}
	}) as Box<dyn FnMut(_)>);

	for kind in kinds {
		target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
	}

	callback.forget();
	Ok(())
}

pub fn init(window: &Window, document: &Document) -> Result<()> {
	let page = Page::new(window, document)?;
	page.place_all();

	let draggables: Vec<(ElementId, HtmlElement)> = page
		.game
		.scene()
		.draggables()
		.filter_map(|element| Some((element.id.clone(), page.nodes.get(&element.id)?.clone())))
		.collect();

	let page = Rc::new(RefCell::new(page));

	for (id, node) in draggables {
		listen(&node, &["mousedown", "touchstart"], &page, move |page, event| page.on_press(&id, event))?;
	}

	listen(document, &["mousemove", "touchmove"], &page, Page::on_move)?;
	listen(document, &["mouseup", "touchend"], &page, Page::on_release)?;
	listen(window, &["resize"], &page, Page::on_resize)?;

	tracing::info!("collision overlay ready");

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn register_skips_anonymous() {
		let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
		let measured = vec![
			(String::new(), Kind::Block, rect, 0),
			("block1".to_string(), Kind::Block, rect, 1),
			(String::new(), Kind::Draggable, rect, 2),
			("overlay".to_string(), Kind::Draggable, rect, 3),
		];

		let (elements, nodes) = register(measured);

		let ids: Vec<&str> = elements.iter().map(|element| element.id.as_str()).collect();
		assert_eq!(ids, vec!["block1", "overlay"]);
		assert_eq!(elements[1].kind, Kind::Draggable);
		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[&ElementId::from("overlay")], 3);
	}
}
