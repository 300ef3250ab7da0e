//! Trend provider error types.

/// Specific error conditions for trend-provider calls.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Request construction or transport failure
    #[display("Provider request failed: {}", _0)]
    Request(String),
    /// Non-success HTTP status from the provider
    #[display("Provider returned status {}", _0)]
    Status(u16),
    /// Response body could not be decoded
    #[display("Failed to decode provider response: {}", _0)]
    Decode(String),
    /// Credential file missing or unreadable
    #[display("Failed to read provider credential: {}", _0)]
    Credential(String),
}

/// Error type for trend-provider operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
