use std::cell::{Cell, RefCell};
use std::rc::Rc;

use inference::{url::Url, ClientConfig, Console, ConsoleConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
	Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSourceElement, HtmlVideoElement,
	Window,
};

use crate::error::lookup;
use crate::Result;

thread_local! {
	static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// The console's elements, looked up once.
struct View {
	player: HtmlVideoElement,
	source: HtmlSourceElement,
	list: HtmlElement,
	form: HtmlFormElement,
	file: HtmlInputElement,
	alerts: HtmlElement,

	// The player load count we last rendered, so we only reload on a new selection.
	loaded: Cell<u64>,
}

impl View {
	fn new(document: &Document) -> Result<Self> {
		Ok(Self {
			player: lookup(document, "videoPlayer")?,
			source: lookup(document, "videoSource")?,
			list: lookup(document, "videoList")?,
			form: lookup(document, "uploadForm")?,
			file: lookup(document, "formFile")?,
			alerts: lookup(document, "liveAlertPlaceholder")?,
			loaded: Cell::new(0),
		})
	}

	fn render(&self, console: &Console) {
		self.list.set_inner_html(&console.html());

		let alerts: String = console
			.alerts()
			.iter()
			.enumerate()
			.map(|(index, alert)| format!(r#"<div data-alert="{index}">{}</div>"#, alert.html()))
			.collect();
		self.alerts.set_inner_html(&alerts);

		let player = console.player();
		if player.loads != self.loaded.get() {
			self.loaded.set(player.loads);

			if let Some(source) = &player.source {
				self.source.set_src(source.as_str());
			}
			self.player.load();
		}
	}

	fn play(&self, console: &Console) {
		let player = console.player();
		self.player.set_current_time(player.position);

		if player.playing {
			if let Err(err) = self.player.play() {
				tracing::warn!(?err, "failed to resume playback");
			}
		}
	}
}

#[derive(Clone)]
struct Page {
	view: Rc<View>,
	console: Rc<RefCell<Console>>,
}

impl Page {
	fn render(&self) {
		self.view.render(&self.console.borrow());
	}

	// Fetch outside the borrow, then apply; the console is never held across an await.
	async fn refresh(&self) {
		let client = self.console.borrow().client().clone();
		let res = client.list().await;

		if self.console.borrow_mut().apply_list(res).is_ok() {
			self.render();
		}
	}

	fn select(&self, uuid: &str) {
		self.console.borrow_mut().select_job(uuid);
		self.render();
	}

	async fn delete(&self, uuid: String) {
		let client = self.console.borrow().client().clone();
		let res = client.delete(&uuid).await;

		if self.console.borrow_mut().apply_delete(&uuid, res).is_ok() {
			self.render();
		}
	}

	async fn upload(&self, file: web_sys::File) {
		let video = match JsFuture::from(file.array_buffer()).await {
			Ok(buffer) => js_sys::Uint8Array::new(&buffer).to_vec(),
			Err(err) => {
				tracing::error!(?err, "failed to read file");
				return;
			}
		};

		let client = self.console.borrow().client().clone();
		let res = client.upload(&file.name(), video).await;

		if self.console.borrow_mut().apply_upload(res).is_err() {
			return;
		}

		self.refresh().await;
		self.console.borrow_mut().uploaded();
		self.render();
	}

	fn on_list_click(&self, event: Event) {
		let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) else {
			return;
		};

		let Ok(Some(entry)) = target.closest("li[data-uuid]") else {
			return;
		};

		let Some(uuid) = entry.get_attribute("data-uuid") else {
			return;
		};

		match matches!(target.closest("[data-action=delete]"), Ok(Some(_))) {
			true => {
				let page = self.clone();
				spawn_local(async move { page.delete(uuid).await });
			}
			false => self.select(&uuid),
		}
	}

	fn on_alert_click(&self, event: Event) {
		let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) else {
			return;
		};

		if !matches!(target.closest(".btn-close"), Ok(Some(_))) {
			return;
		}

		let index = target
			.closest("[data-alert]")
			.ok()
			.flatten()
			.and_then(|wrapper| wrapper.get_attribute("data-alert"))
			.and_then(|index| index.parse::<usize>().ok());

		if let Some(index) = index {
			self.console.borrow_mut().dismiss(index);
			self.render();
		}
	}

	fn on_submit(&self, event: Event) {
		event.prevent_default();

		let Some(file) = self.view.file.files().and_then(|files| files.get(0)) else {
			tracing::warn!("no file selected");
			return;
		};

		let page = self.clone();
		spawn_local(async move { page.upload(file).await });
	}

	fn seek(&self, time: f64) {
		self.console.borrow_mut().seek(time);
		self.view.play(&self.console.borrow());
	}
}

fn listen(target: &web_sys::EventTarget, kind: &str, page: &Page, handler: fn(&Page, Event)) -> Result<()> {
	let page = page.clone();
	let callback = Closure::wrap(Box::new(move |event: Event| handler(&page, event)) as Box<dyn FnMut(_)>);
	target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
	callback.forget();
	Ok(())
}

pub fn init(window: &Window, document: &Document) -> Result<()> {
	let view = Rc::new(View::new(document)?);

	// The API is served from the same origin as the page.
	let origin = Url::parse(&window.location().origin()?).map_err(inference::Error::from)?;
	let client = ClientConfig {
		url: Some(origin),
		..Default::default()
	}
	.init()?;

	let page = Page {
		view,
		console: Rc::new(RefCell::new(Console::new(client, ConsoleConfig::default()))),
	};

	listen(&page.view.list, "click", &page, Page::on_list_click)?;
	listen(&page.view.alerts, "click", &page, Page::on_alert_click)?;
	listen(&page.view.form, "submit", &page, Page::on_submit)?;

	PAGE.with(|cell| *cell.borrow_mut() = Some(page.clone()));

	tracing::info!("inference console ready");
	spawn_local(async move { page.refresh().await });

	Ok(())
}

pub fn seek(time: f64) {
	let page = PAGE.with(|cell| cell.borrow().clone());
	match page {
		Some(page) => page.seek(time),
		None => tracing::warn!(time, "seek before the console was initialized"),
	}
}
