//! # overlay: pointer-driven collision overlay
//!
//! `overlay` keeps a set of rectangles on screen: fixed blocks and draggable elements.
//! Draggables follow the pointer while a drag gesture is active, but a move that would
//! overlap any other element is rejected outright.
//!
//! ## Overview
//!
//! - **Scene**: every element the engine needs, registered once and looked up by id.
//! - **Drag**: per-draggable press state and the offset captured at drag start.
//! - **Layout**: centers the overlay between the two lane anchors and places the satellites around it.
//! - **Readout**: which of the three lanes the overlay is in and how far it is from the reference block.
//!
//! [`Game`] ties these together and consumes [`Event`]s.
mod collision;
mod drag;
mod error;
mod game;
mod readout;
mod scene;

pub mod layout;

pub use collision::*;
pub use drag::*;
pub use error::*;
pub use game::*;
pub use readout::*;
pub use scene::*;

// export the geometry types in use
pub use kurbo;
