//! Run-lock error types.

/// Specific error conditions for run-lock acquisition.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum LockErrorKind {
    /// A recent lock marker exists; another run is in progress
    #[display("Another run holds the lock ({:.1} minutes old)", age_minutes)]
    AlreadyRunning {
        /// Age of the existing marker in minutes
        age_minutes: f64,
    },
    /// Marker file could not be created, inspected, or removed
    #[display("Lock file operation failed: {}", _0)]
    Io(String),
}

/// Error type for run-lock operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Lock Error: {} at line {} in {}", kind, line, file)]
pub struct LockError {
    /// The specific error condition
    pub kind: LockErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl LockError {
    /// Create a new LockError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LockErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
