//! # inference: video inference console
//!
//! `inference` talks to the inference API and keeps the state a console needs:
//! the list of jobs, which one is selected, what the player is showing and any
//! pending notifications.
//!
//! ## Overview
//!
//! - **Client**: typed wrappers around the REST endpoints (`/v1/api/inference`, `/v1/api/video`, `/v1/api/erp`).
//! - **Console**: the job list and player state, updated from client results.
//! - **Markup**: the list entry markup, a pure function of a record.
//!
//! Every operation either applies fully or leaves the console untouched; failures are
//! logged and returned, never retried.
mod client;
mod console;
mod error;
mod record;

pub mod markup;

pub use client::*;
pub use console::*;
pub use error::*;
pub use record::*;

// export the url version in use
pub use url;

#[cfg(test)]
mod mock;
