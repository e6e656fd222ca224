//! Unified service-level error handling.
//!
//! Service functions return `Result<T, AppError>`. Validation failures carry
//! the full field-scoped message collection; persistence failures keep their
//! repository taxonomy so callers can distinguish an exhausted identifier
//! allocation (alert-worthy) from an ordinary conflict or missing row.

use thiserror::Error;

use bazaar_core::ValidationErrors;

use crate::db::RepositoryError;

/// Application-level error type for the backend services.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed boundary validation; field-scoped messages attached.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Identifier allocation gave up after repeated collisions. Fatal to the
    /// triggering write; surfaced distinctly so operators can alert on it.
    #[error("identifier allocation exhausted after {attempts} attempts")]
    IdSpaceExhausted {
        /// Number of insert attempts made.
        attempts: u32,
    },

    /// A uniqueness constraint other than the primary key was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller lacks permission for the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(RepositoryError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_owned()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::IdSpaceExhausted { attempts } => Self::IdSpaceExhausted { attempts },
            other => Self::Database(other),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            AppError::from(RepositoryError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::Conflict("email already exists".to_owned())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::IdSpaceExhausted { attempts: 5 }),
            AppError::IdSpaceExhausted { attempts: 5 }
        ));
        assert!(matches!(
            AppError::from(RepositoryError::IdCollision),
            AppError::Database(RepositoryError::IdCollision)
        ));
    }

    #[test]
    fn test_validation_error_carries_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("prices", "Units must be a valid integer");
        let err = AppError::from(errors);
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.field("prices").len(), 1);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
