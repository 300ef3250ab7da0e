//! Core data types for the storyloom pipeline.
//!
//! This crate provides the domain records, generation request types,
//! run configuration, and clock helpers shared across the workspace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod request;
mod topic;

pub use clock::Clock;
pub use config::{
    GenerationConfig, ImageConfig, ImageFailurePolicy, PipelineConfig, ProviderConfig, RetryConfig,
    RunConfig, RunnerConfig, SitemapConfig, StoreConfig, SyncConfig,
};
pub use request::{StoryRequest, StoryResponse};
pub use topic::{Topic, TrendCategory, TrendingTopic};
