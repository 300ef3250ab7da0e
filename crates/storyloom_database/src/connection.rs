//! Database connection utilities.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::path::Path;
use storyloom_error::{DatabaseError, DatabaseErrorKind, StoryloomResult};

pub(crate) const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Establish a connection to the SQLite database at `path`.
///
/// Foreign-key enforcement is off by default in SQLite and every cascade in
/// the schema depends on it, so the pragma is applied to each fresh
/// connection.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the pragma fails.
pub fn establish_connection(path: &Path) -> StoryloomResult<SqliteConnection> {
    let url = path.to_string_lossy();
    let mut conn = SqliteConnection::establish(&url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

    Ok(conn)
}

/// Apply any pending migrations.
pub(crate) fn run_migrations(conn: &mut SqliteConnection) -> StoryloomResult<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    Ok(())
}
