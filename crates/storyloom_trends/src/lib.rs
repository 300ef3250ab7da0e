//! Trend provider client.
//!
//! Fetches the current batch of trending-search records over HTTP and maps
//! them into domain [`TrendingTopic`](storyloom_core::TrendingTopic) values.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod wire;

pub use client::TrendClient;
