use sea_orm::{DbErr, SqlErr};

pub(crate) use gateway_admin_domain::storage::StorageError;

/// Maps an insert error onto the domain taxonomy: unique-constraint
/// violations become `Conflict`, everything else stays an opaque database
/// failure.
pub(crate) fn map_insert_err(err: DbErr) -> StorageError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StorageError::Conflict(detail),
        _ => StorageError::from_source(err),
    }
}
