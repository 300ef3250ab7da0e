//! Generation seam for the pipeline.

use crate::GatewayClient;
use async_trait::async_trait;
use storyloom_core::{StoryRequest, StoryResponse};
use storyloom_error::StoryloomResult;

/// Anything that can turn a [`StoryRequest`] into generated text.
///
/// The pipeline depends on this trait rather than on the WebSocket client so
/// tests can substitute a scripted generator.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generate content for one request, including whatever retrying the
    /// implementation deems appropriate.
    async fn generate(&self, request: &StoryRequest) -> StoryloomResult<StoryResponse>;
}

#[async_trait]
impl StoryGenerator for GatewayClient {
    async fn generate(&self, request: &StoryRequest) -> StoryloomResult<StoryResponse> {
        self.call_with_retry(request).await
    }
}
