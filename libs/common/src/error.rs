//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key constraint rejected the write
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Name of the violated constraint, if the error is a constraint violation
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DatabaseError::UniqueViolation { constraint }
            | DatabaseError::ForeignKeyViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return DatabaseError::ForeignKeyViolation { constraint };
            }
        }

        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                DatabaseError::Connection(err)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_query_error() {
        let err = DatabaseError::from(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(_)));
        assert_eq!(err.constraint(), None);
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = DatabaseError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, DatabaseError::Connection(_)));
    }

    #[test]
    fn test_constraint_name_is_exposed() {
        let err = DatabaseError::UniqueViolation {
            constraint: "likes_user_recipe_key".to_string(),
        };
        assert_eq!(err.constraint(), Some("likes_user_recipe_key"));
        assert_eq!(
            err.to_string(),
            "Unique constraint violated: likes_user_recipe_key"
        );
    }
}
