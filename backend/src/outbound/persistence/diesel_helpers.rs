//! Shared helpers for Diesel repository implementations.
//!
//! - Error message extraction from pool and Diesel errors
//! - Unique-constraint detection for duplicate mapping
//! - Pagination and search conversions

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pagination::PageRequest;
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Extract a readable message from a Diesel error and emit debug context.
pub fn map_diesel_error_message(error: DieselError, operation: &str) -> String {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(%error, %operation, "diesel operation failed"),
    }
    error.to_string()
}

/// Whether `error` reports a lost connection rather than a failed query.
pub fn is_connection_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
    )
}

/// Name of the unique constraint `error` violated, if it is a unique violation.
///
/// Postgres names single-column unique constraints `<table>_<column>_key`.
pub fn unique_violation(error: &DieselError) -> Option<String> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Some(
            info.constraint_name()
                .map_or_else(|| info.message().to_owned(), str::to_owned),
        ),
        _ => None,
    }
}

/// Whether `error` is a foreign key violation.
pub fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// `LIMIT` and `OFFSET` values for a page request.
pub fn limit_offset(page: PageRequest) -> (i64, i64) {
    (
        i64::from(page.limit()),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

/// Convert a `COUNT(*)` result to a page total.
pub fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// `LIKE`/`ILIKE` pattern matching `term` anywhere, with wildcards escaped.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Normalise an optional search term; blank terms disable filtering.
pub fn search_term(search: Option<String>) -> Option<String> {
    search
        .map(|term| term.trim().to_owned())
        .filter(|term| !term.is_empty())
}
