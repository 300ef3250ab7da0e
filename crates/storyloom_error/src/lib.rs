//! Error types for the storyloom pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! storyloom workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{StoryloomResult, ConfigError};
//!
//! fn load_setting() -> StoryloomResult<String> {
//!     Err(ConfigError::new("missing field: geo"))?
//! }
//!
//! match load_setting() {
//!     Ok(v) => println!("Got: {}", v),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod gateway;
mod image;
mod lock;
mod pipeline;
mod provider;
mod sitemap;
mod sync;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use image::{ImageError, ImageErrorKind};
pub use lock::{LockError, LockErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
pub use sitemap::{SitemapError, SitemapErrorKind};
pub use sync::{SyncError, SyncErrorKind};
