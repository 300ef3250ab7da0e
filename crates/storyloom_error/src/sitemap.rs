//! Sitemap error types.

/// Specific error conditions for sitemap operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SitemapErrorKind {
    /// Output document could not be written
    #[display("Failed to write sitemap: {}", _0)]
    Write(String),
    /// XML serialization failed
    #[display("Failed to render sitemap XML: {}", _0)]
    Xml(String),
}

/// Error type for sitemap operations.
///
/// Note that a malformed *existing* sitemap is not an error anywhere in the
/// merge path; it degrades to an empty prior map. Only output failures
/// surface here.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sitemap Error: {} at line {} in {}", kind, line, file)]
pub struct SitemapError {
    /// The specific error condition
    pub kind: SitemapErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SitemapError {
    /// Create a new SitemapError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SitemapErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
