use crate::ElementId;

/// Errors produced while building or driving a [`crate::Scene`].
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
	/// A configured element was not registered with the scene.
	#[error("missing element: {0}")]
	MissingElement(ElementId),

	/// The same id was registered twice.
	#[error("duplicate element: {0}")]
	DuplicateElement(ElementId),

	/// A drag was started on an element that is not draggable.
	#[error("not draggable: {0}")]
	NotDraggable(ElementId),
}

pub type Result<T> = std::result::Result<T, Error>;
