//! Repository error type.
//!
//! Database failures that carry domain meaning (duplicate values, missing
//! parents, check violations) are lifted into [`CoreError`] so callers can
//! match on them without inspecting SQLSTATE codes.

use eventshare_core::error::CoreError;
use validator::ValidationErrors;

/// PostgreSQL SQLSTATE for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign-key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for check-constraint violations.
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error: not found, conflict, validation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database error.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Returns `true` for uniqueness-scope violations.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Core(CoreError::Conflict(_)))
    }

    /// Returns `true` when the referenced row does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::Core(CoreError::NotFound { .. }))
    }
}

/// Classify a sqlx error.
///
/// - `RowNotFound` becomes [`CoreError::NotFound`].
/// - Unique violations on constraints named `uq_*` become [`CoreError::Conflict`].
/// - Foreign-key and check violations become [`CoreError::Validation`].
/// - Everything else is kept as [`DbError::Database`].
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                return DbError::Core(CoreError::NotFound {
                    entity: "Row",
                    key: "unknown".to_string(),
                })
            }
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                match db_err.code().as_deref() {
                    Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                        return DbError::Core(CoreError::Conflict(format!(
                            "Duplicate value violates unique constraint: {constraint}"
                        )));
                    }
                    Some(FOREIGN_KEY_VIOLATION) => {
                        return DbError::Core(CoreError::Validation(format!(
                            "Referenced row does not exist: {constraint}"
                        )));
                    }
                    Some(CHECK_VIOLATION) => {
                        return DbError::Core(CoreError::Validation(format!(
                            "Value violates check constraint: {constraint}"
                        )));
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        tracing::error!(error = %err, "Database error");
        DbError::Database(err)
    }
}

impl From<ValidationErrors> for DbError {
    fn from(errors: ValidationErrors) -> Self {
        DbError::Core(CoreError::Validation(errors.to_string()))
    }
}
