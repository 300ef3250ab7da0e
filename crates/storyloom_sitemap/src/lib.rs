//! Incremental sitemap maintenance.
//!
//! The published sitemap is the union of every date the store has ever
//! narrated and every entry any previous publication recorded. Merging never
//! discards an entry that only the existing document knows about, so history
//! survives even a store that lost data. A malformed existing document is a
//! fresh start, not an error.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod merge;
mod publisher;

pub use document::{parse_document, render_document};
pub use merge::{SitemapEntry, merge_entries};
pub use publisher::SitemapPublisher;
