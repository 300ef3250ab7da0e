//! Image-render service error types.

/// Specific error conditions for image rendering.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ImageErrorKind {
    /// Workflow template missing or unreadable
    #[display("Workflow template unavailable: {}", _0)]
    Template(String),
    /// Job submission failed
    #[display("Failed to submit render job: {}", _0)]
    Submit(String),
    /// Event stream connection or read failure
    #[display("Render event stream failed: {}", _0)]
    EventStream(String),
    /// Completion event did not arrive in time
    #[display("Render did not complete within {} seconds", _0)]
    Timeout(u64),
    /// Rendered artifact could not be fetched
    #[display("Failed to fetch rendered image: {}", _0)]
    Fetch(String),
    /// Artifact could not be written to disk
    #[display("Failed to save image: {}", _0)]
    Save(String),
    /// Render finished without producing an output image
    #[display("Render produced no output image")]
    NoOutput,
}

/// Error type for image-render operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Image Error: {} at line {} in {}", kind, line, file)]
pub struct ImageError {
    /// The specific error condition
    pub kind: ImageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ImageError {
    /// Create a new ImageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ImageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
