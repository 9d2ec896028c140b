//! Repository error and result types

use lb_core::LbError;
use lb_queries::CriteriaError;

/// SQLSTATE raised by PostgreSQL for a unique constraint violation
const UNIQUE_VIOLATION: &str = "23505";

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(#[from] CriteriaError),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Map a unique-constraint violation to `Conflict`, leaving every other
    /// store error as `Database`.
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .and_then(|db| db.code())
            .map_or(false, |code| code == UNIQUE_VIOLATION);

        if is_unique {
            RepositoryError::Conflict(format!("{} already exists", what))
        } else {
            RepositoryError::Database(err)
        }
    }
}

impl From<validator::ValidationErrors> for RepositoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RepositoryError::Validation(errors.to_string())
    }
}

impl From<RepositoryError> for LbError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => LbError::NotFound {
                entity: "record",
                field: "key",
                value: what,
            },
            RepositoryError::Database(e) => LbError::Database(e.to_string()),
            RepositoryError::Validation(msg) => LbError::Validation(msg),
            RepositoryError::InvalidCriteria(e) => LbError::InvalidCriteria(e.to_string()),
            RepositoryError::Conflict(message) => LbError::Conflict { message },
        }
    }
}
