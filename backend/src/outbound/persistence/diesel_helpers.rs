//! Shared classification of Diesel failures.
//!
//! Every repository maps store failures into its own port error enum; the
//! classification of the underlying Diesel error is identical across them
//! and lives here.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Store failure categories the repositories care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    /// Connectivity-level failure; retryable.
    Connection(String),
    /// A uniqueness constraint rejected the write.
    UniqueViolation,
    /// Any other query failure.
    Query(String),
}

/// Classify a Diesel error, logging the raw detail at debug level so the
/// mapped message can stay terse.
pub fn classify(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        _ => StoreFailure::Query("database error".to_owned()),
    }
}
