//! Run configuration.
//!
//! One `RunConfig` value is loaded from a TOML file at startup and threaded
//! explicitly into every component constructor. Nothing in the workspace
//! reads credentials or paths from ambient state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyloom_error::{ConfigError, StoryloomResult};

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Trend provider settings
    pub provider: ProviderConfig,
    /// Record store settings
    pub store: StoreConfig,
    /// Generation service settings
    pub generation: GenerationConfig,
    /// Retry policy for generation calls
    #[serde(default)]
    pub retry: RetryConfig,
    /// Per-topic pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Image render service settings
    pub image: ImageConfig,
    /// Sitemap settings
    pub sitemap: SitemapConfig,
    /// Git publish settings
    pub sync: SyncConfig,
    /// Supervisor settings
    pub runner: RunnerConfig,
}

impl RunConfig {
    /// Load run configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)).into())
    }
}

/// Trend provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider engine identifier
    pub engine: String,
    /// Geography parameter (e.g. "US")
    pub geo: String,
    /// File holding the provider API key
    pub api_key_file: PathBuf,
    /// Provider endpoint
    #[serde(default = "default_provider_endpoint")]
    pub endpoint: String,
}

fn default_provider_endpoint() -> String {
    "https://serpapi.com/search".to_string()
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Category name that alone disqualifies a topic
    pub excluded_category: String,
    /// Per-run candidate quota
    #[serde(default = "default_batch_limit")]
    pub batch_limit: i64,
}

fn default_batch_limit() -> i64 {
    10
}

/// Generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// WebSocket endpoint of the generation service
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Whether story requests are search-grounded
    #[serde(default = "default_true")]
    pub search: bool,
    /// System instruction for story requests
    pub story_system_prompt: String,
    /// System instruction for image-prompt derivation requests
    pub image_prompt_system_prompt: String,
}

fn default_true() -> bool {
    true
}

/// Retry policy for generation calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Wait between early attempts, in seconds
    #[serde(default = "default_short_wait")]
    pub short_wait_secs: u64,
    /// Cool-down before the final attempt, in seconds
    #[serde(default = "default_long_wait")]
    pub long_wait_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            short_wait_secs: default_short_wait(),
            long_wait_secs: default_long_wait(),
        }
    }
}

fn default_attempts() -> u32 {
    4
}

fn default_short_wait() -> u64 {
    5
}

fn default_long_wait() -> u64 {
    300
}

/// What to do with a topic whose narrative succeeded but whose image did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFailurePolicy {
    /// Persist the narrative with a null image reference
    #[default]
    Degrade,
    /// Fail the whole run
    Abort,
}

/// Per-topic pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pause between the story call and the image-prompt call, in seconds
    #[serde(default = "default_pacing")]
    pub pacing_secs: u64,
    /// Image failure policy
    #[serde(default)]
    pub image_failure: ImageFailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pacing_secs: default_pacing(),
            image_failure: ImageFailurePolicy::default(),
        }
    }
}

fn default_pacing() -> u64 {
    5
}

/// Image render service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Host:port of the render server
    pub server_address: String,
    /// Path to the render workflow template JSON
    pub workflow_path: PathBuf,
    /// Directory that receives date-partitioned image files
    pub output_dir: PathBuf,
    /// Upper bound on the completion wait, in seconds
    #[serde(default = "default_render_timeout")]
    pub render_timeout_secs: u64,
    /// Workflow node receiving the positive prompt text
    #[serde(default = "default_prompt_node")]
    pub prompt_node: String,
    /// Workflow node receiving the sampler seed
    #[serde(default = "default_seed_node")]
    pub seed_node: String,
    /// Workflow node receiving the output file-name prefix
    #[serde(default = "default_filename_node")]
    pub filename_node: String,
}

fn default_render_timeout() -> u64 {
    600
}

fn default_prompt_node() -> String {
    "6".to_string()
}

fn default_seed_node() -> String {
    "31".to_string()
}

fn default_filename_node() -> String {
    "9".to_string()
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Path of the published sitemap document
    pub path: PathBuf,
    /// Site base URL (no trailing slash)
    pub base_url: String,
}

/// Git publish settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote repository without scheme or credential
    /// (e.g. "github.com/sudoghut/storyloom-site.git")
    pub remote: String,
    /// Branch to fetch, rebase onto, and push
    #[serde(default = "default_branch")]
    pub branch: String,
    /// File holding the push token
    pub token_file: PathBuf,
    /// Committer name
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// Committer email
    #[serde(default = "default_user_email")]
    pub user_email: String,
    /// Paths that must never be committed (lock marker, logs, run stamp)
    #[serde(default)]
    pub runtime_paths: Vec<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_user_name() -> String {
    "Storyloom Bot".to_string()
}

fn default_user_email() -> String {
    "bot@storyloom.local".to_string()
}

/// Supervisor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Working directory of the published repository
    pub base_dir: PathBuf,
    /// Lock marker path
    pub lock_path: PathBuf,
    /// Minutes after which an existing lock marker is presumed abandoned
    #[serde(default = "default_stale_minutes")]
    pub stale_minutes: u64,
    /// File stamped with the completion time of the last full success
    pub last_run_path: PathBuf,
    /// Fixed UTC offset, in hours, defining the pipeline's calendar day
    #[serde(default)]
    pub utc_offset_hours: i32,
}

fn default_stale_minutes() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [provider]
        engine = "google_trends_trending_now"
        geo = "US"
        api_key_file = "serp_token.txt"

        [store]
        database_path = "trends_data.db"
        excluded_category = "Sports"

        [generation]
        endpoint = "ws://127.0.0.1:9001/generate"
        model = "gemini-2.5-flash"
        story_system_prompt = "You write short news stories."
        image_prompt_system_prompt = "You write image prompts."

        [image]
        server_address = "127.0.0.1:8188"
        workflow_path = "workflow.json"
        output_dir = "images"

        [sitemap]
        path = "sitemap.xml"
        base_url = "https://example.com"

        [sync]
        remote = "github.com/example/site.git"
        token_file = "git_token.txt"

        [runner]
        base_dir = "/app/storyloom"
        lock_path = "/app/storyloom/.run.lock"
        last_run_path = "/app/storyloom/.last_run"
    "#;

    #[test]
    fn test_minimal_config_defaults() {
        let config: RunConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.retry.attempts, 4);
        assert_eq!(config.retry.short_wait_secs, 5);
        assert_eq!(config.retry.long_wait_secs, 300);
        assert_eq!(config.pipeline.pacing_secs, 5);
        assert_eq!(config.pipeline.image_failure, ImageFailurePolicy::Degrade);
        assert_eq!(config.image.render_timeout_secs, 600);
        assert_eq!(config.store.batch_limit, 10);
        assert_eq!(config.sync.branch, "main");
        assert_eq!(config.runner.stale_minutes, 30);
        assert_eq!(config.runner.utc_offset_hours, 0);
    }

    #[test]
    fn test_image_failure_policy_parse() {
        let toml_abort = MINIMAL.to_string() + "\n[pipeline]\nimage_failure = \"abort\"\n";
        let config: RunConfig = toml::from_str(&toml_abort).unwrap();
        assert_eq!(config.pipeline.image_failure, ImageFailurePolicy::Abort);
    }
}
