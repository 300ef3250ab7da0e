//! Pipeline error types.

/// Specific error conditions for the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Image generation failed while the abort policy is active
    #[display("Image generation failed for '{}' under abort policy", _0)]
    ImageAborted(String),
}

/// Error type for pipeline orchestration.
///
/// Most per-topic failures are isolated and logged rather than raised; this
/// type covers the cases that abort the whole run.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
