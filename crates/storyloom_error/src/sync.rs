//! Git sync error types.

/// Specific error conditions for the publish/sync phase.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SyncErrorKind {
    /// Git subprocess could not be spawned
    #[display("Failed to run git: {}", _0)]
    Spawn(String),
    /// Git command exited nonzero
    #[display("git {} failed: {}", step, stderr)]
    Command {
        /// The sync step that failed (e.g. "fetch", "push")
        step: String,
        /// Captured stderr from the git process
        stderr: String,
    },
    /// Rebase hit conflicts and was aborted
    #[display("Rebase conflict; aborted without resolving")]
    RebaseConflict,
    /// Sync credential file missing or unreadable
    #[display("Failed to read sync credential: {}", _0)]
    Credential(String),
}

/// Error type for git sync operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sync Error: {} at line {} in {}", kind, line, file)]
pub struct SyncError {
    /// The specific error condition
    pub kind: SyncErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SyncError {
    /// Create a new SyncError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SyncErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
