//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error when creating directories or files.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// A uniqueness constraint was violated (duplicate student code).
    #[error("Uniqueness conflict on {field}")]
    Conflict { field: &'static str },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Maps a rusqlite error from a student write into `Conflict` when the
    /// unique `student_code` constraint fired, passing everything else
    /// through unchanged.
    pub(crate) fn from_student_write(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref err, ref msg) = e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation
                && msg
                    .as_deref()
                    .map_or(false, |m| m.contains("students.student_code"))
            {
                return DatabaseError::Conflict {
                    field: "student_code",
                };
            }
        }
        DatabaseError::Sqlite(e)
    }

    /// True when this error is the duplicate-student-code conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DatabaseError::Conflict { .. })
    }
}
