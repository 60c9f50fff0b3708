//! Diesel and r2d2 failures, and how they surface as `retailpos_core::Error`.

use diesel::result::Error as DieselError;
use thiserror::Error;
use retailpos_core::errors::{DatabaseError, Error};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Domain error raised inside a write job; rolls the transaction back and
    /// is handed to the caller unchanged.
    #[error("{0}")]
    Core(Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::CheckViolation,
                info,
            )) => Error::ConstraintViolation(info.message().to_string()),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::Core(e) => e,
        }
    }
}

pub trait IntoCore<T> {
    fn into_core(self) -> retailpos_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> retailpos_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> retailpos_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

/// Maps a missing row to the domain `NotFound` error for `entity`.
pub trait OrNotFound<T> {
    fn or_not_found(self, entity: &'static str, id: &str) -> retailpos_core::Result<T>;
}

impl<T> OrNotFound<T> for std::result::Result<T, DieselError> {
    fn or_not_found(self, entity: &'static str, id: &str) -> retailpos_core::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(DieselError::NotFound) => Err(Error::not_found(entity, id)),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_pass_through_unchanged() {
        let storage: StorageError = Error::AlreadyCancelled("INV-1".to_string()).into();
        let core: Error = storage.into();
        assert!(matches!(core, Error::AlreadyCancelled(ref inv) if inv == "INV-1"));
    }

    #[test]
    fn test_not_found_mapping() {
        let result: std::result::Result<(), DieselError> = Err(DieselError::NotFound);
        let err = result.or_not_found("Product", "p-9").unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Product", .. }));
    }
}
