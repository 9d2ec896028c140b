//! Core error types for LightBnB RS

use thiserror::Error;

/// Core error type for all LightBnB operations
#[derive(Error, Debug)]
pub enum LbError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LbError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        LbError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LbError::NotFound { .. } => "not_found",
            LbError::InvalidCriteria(_) => "invalid_criteria",
            LbError::Validation(_) => "validation_failed",
            LbError::Conflict { .. } => "conflict",
            LbError::Database(_) => "database_error",
            LbError::Config(_) => "configuration_error",
            LbError::Internal(_) => "internal_error",
        }
    }

    /// Process exit status used by the command line front end
    pub fn exit_code(&self) -> i32 {
        match self {
            LbError::NotFound { .. } => 2,
            LbError::InvalidCriteria(_) | LbError::Validation(_) => 3,
            LbError::Conflict { .. } => 4,
            LbError::Database(_) => 5,
            LbError::Config(_) => 6,
            LbError::Internal(_) => 1,
        }
    }
}

impl From<crate::config::ConfigError> for LbError {
    fn from(err: crate::config::ConfigError) -> Self {
        LbError::Config(err.to_string())
    }
}

/// Standard Result type for LightBnB operations
pub type LbResult<T> = Result<T, LbError>;
