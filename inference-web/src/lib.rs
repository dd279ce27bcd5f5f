//! Browser bindings: wires the page's fixed element ids to [`inference::Console`] and [`overlay::Game`].
//!
//! Either page may be loaded on its own; each half only starts if its root element is present.
mod console;
mod error;
mod game;

pub use error::*;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
	console_error_panic_hook::set_once();
	if let Err(err) = wasm_tracing::set_as_global_default() {
		web_sys::console::warn_1(&format!("failed to install tracing: {err}").into());
	}

	let window = web_sys::window().ok_or(Error::NoWindow)?;
	let document = window.document().ok_or(Error::NoDocument)?;

	if document.get_element_by_id("videoList").is_some() {
		console::init(&window, &document)?;
	}

	if document.get_element_by_id("overlay").is_some() {
		game::init(&window, &document)?;
	}

	Ok(())
}

/// Jump the console's player to `time` seconds and resume playback.
#[wasm_bindgen(js_name = jumpTo)]
pub fn jump_to(time: f64) {
	console::seek(time);
}
