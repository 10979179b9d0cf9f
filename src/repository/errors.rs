use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The referenced row does not exist.
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// A referential constraint rejected the write.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    /// Stored data could not be converted into domain types.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// No connection could be obtained from the pool.
    #[error("connection error: {0}")]
    ConnectionError(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    DatabaseError(DieselError),
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::UniqueViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                RepositoryError::ForeignKeyViolation(info.message().to_string())
            }
            other => RepositoryError::DatabaseError(other),
        }
    }
}

impl From<PoolError> for RepositoryError {
    fn from(value: PoolError) -> Self {
        RepositoryError::ConnectionError(value.to_string())
    }
}
