//! Database error types.

/// Specific error conditions for record-store operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Connection establishment failed
    #[display("Database connection failed: {}", _0)]
    Connection(String),
    /// Migration application failed
    #[display("Database migration failed: {}", _0)]
    Migration(String),
    /// Query execution failed
    #[display("Database query failed: {}", _0)]
    Query(String),
    /// Column content could not be converted to or from its stored form
    #[display("Failed to convert stored value: {}", _0)]
    Decode(String),
}

/// Error type for record-store operations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::Query("no such table".into()));
/// assert!(format!("{}", err).contains("no such table"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The specific error condition
    pub kind: DatabaseErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
