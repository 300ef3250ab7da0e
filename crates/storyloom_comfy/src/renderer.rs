//! Render seam for the pipeline.

use async_trait::async_trait;
use storyloom_error::StoryloomResult;

/// A rendered artifact, saved to disk and ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Path relative to the image output directory, e.g.
    /// `20260807/solar-eclipse_20260807_120301_00001_.png`
    pub file_name: String,
}

/// Anything that can turn an image prompt into a saved artifact.
///
/// The pipeline depends on this trait rather than on the render-server
/// client so tests can substitute a scripted renderer.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Render one image for `prompt`, deriving the artifact name from
    /// `query`, and save it under the output directory.
    async fn render(&self, prompt: &str, query: &str) -> StoryloomResult<RenderedImage>;
}
