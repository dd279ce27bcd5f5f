use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no window")]
	NoWindow,

	#[error("no document")]
	NoDocument,

	/// A required element id is not in the page.
	#[error("missing element: {0}")]
	MissingElement(String),

	/// The element exists but isn't the kind we need (e.g. not a video).
	#[error("unexpected element: {0}")]
	WrongElement(String),

	#[error("overlay error: {0}")]
	Overlay(#[from] overlay::Error),

	#[error("inference error: {0}")]
	Inference(#[from] inference::Error),

	#[error("js error: {0}")]
	Js(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

impl From<Error> for JsValue {
	fn from(err: Error) -> Self {
		JsValue::from_str(&err.to_string())
	}
}

/// Look up a required element by id and cast it to the expected type.
pub(crate) fn lookup<T: JsCast>(document: &web_sys::Document, id: &str) -> Result<T> {
	document
		.get_element_by_id(id)
		.ok_or_else(|| Error::MissingElement(id.to_string()))?
		.dyn_into::<T>()
		.map_err(|_| Error::WrongElement(id.to_string()))
}
