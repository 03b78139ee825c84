//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use wisdom_core::error::DomainError;

/// Convert SQLx error to DomainError
///
/// Connectivity problems surface as `NetworkFailure` so callers can offer a
/// retry; everything else is a server-side database error.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::Io(_) | SqlxError::PoolTimedOut | SqlxError::PoolClosed => {
            DomainError::NetworkFailure(e.to_string())
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}
