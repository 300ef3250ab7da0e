//! Request and response types for story generation.

use serde::{Deserialize, Serialize};

/// A single generation request sent through the gateway.
///
/// # Examples
///
/// ```
/// use storyloom_core::StoryRequest;
///
/// let request = StoryRequest {
///     prompt: "Trending topic: solar eclipse".to_string(),
///     system_prompt: "You write short news stories.".to_string(),
///     model: "gemini-2.5-flash".to_string(),
///     search: true,
/// };
///
/// assert!(request.search);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StoryRequest {
    /// The user prompt
    pub prompt: String,
    /// System instruction for the model
    pub system_prompt: String,
    /// Model identifier to use
    pub model: String,
    /// Whether the service should ground the response with web search
    pub search: bool,
}

/// The generated content returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryResponse {
    /// The generated text
    pub content: String,
}
