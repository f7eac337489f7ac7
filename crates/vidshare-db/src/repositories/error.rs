//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use vidshare_core::error::DomainError;
use vidshare_core::value_objects::Snowflake;

/// Convert SQLx error to DomainError.
///
/// Connection-level failures become `StoreUnavailable` so callers can offer a retry.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
            DomainError::StoreUnavailable(e.to_string())
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// A foreign key a row write depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignRef {
    /// Entity name reported in the error
    pub object: &'static str,
    /// Referencing column on the written table
    pub column: &'static str,
    pub id: Snowflake,
}

impl ForeignRef {
    pub const fn new(object: &'static str, column: &'static str, id: Snowflake) -> Self {
        Self { object, column, id }
    }
}

/// Pick the reference a foreign-key constraint guards.
///
/// Postgres names FK constraints `<table>_<column>_fkey`; an unknown name
/// falls back to the first reference.
fn violated_ref<'a>(constraint: Option<&str>, refs: &'a [ForeignRef]) -> Option<&'a ForeignRef> {
    constraint
        .and_then(|name| {
            refs.iter()
                .find(|r| name.ends_with(&format!("_{}_fkey", r.column)))
        })
        .or_else(|| refs.first())
}

/// Classify a failed row write against a disposition or entity table.
///
/// Unique violation -> `ConstraintViolation`, foreign-key violation ->
/// `ReferenceError` naming the side whose row is missing.
pub fn map_write_error(e: SqlxError, refs: &[ForeignRef]) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::ConstraintViolation(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            if let Some(r) = violated_ref(db_err.constraint(), refs) {
                return DomainError::reference(r.object, r.id);
            }
        }
    }
    map_db_error(e)
}

/// Create a "video not found" error
pub fn video_not_found(id: Snowflake) -> DomainError {
    DomainError::VideoNotFound(id)
}

/// Create a "comment not found" error
pub fn comment_not_found(id: Snowflake) -> DomainError {
    DomainError::CommentNotFound(id)
}
