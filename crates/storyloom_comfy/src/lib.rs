//! Image-render service client.
//!
//! The render server speaks a stateful protocol: a job is submitted over
//! HTTP keyed by a client session id, completion is signaled on a companion
//! WebSocket event stream, and the rendered bytes are fetched back over
//! HTTP. This crate wraps that exchange behind [`ImageRenderer`], bounds the
//! completion wait with a timeout, and writes artifacts into a
//! date-partitioned directory under a sanitized file name.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod filename;
mod renderer;
mod workflow;

pub use client::ImageClient;
pub use filename::sanitize_filename;
pub use renderer::{ImageRenderer, RenderedImage};
