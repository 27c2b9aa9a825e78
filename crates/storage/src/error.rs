use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Turn a unique violation into a readable conflict, other errors pass through.
    pub fn on_unique_violation(self, message: impl Into<String>) -> Self {
        if self.is_unique_violation() {
            StorageError::ConstraintViolation(message.into())
        } else {
            self
        }
    }

    /// A dangling foreign key on insert means the referenced parent does not exist.
    pub fn on_foreign_key_violation(self) -> Self {
        if self.is_foreign_key_violation() {
            StorageError::NotFound
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert!(!StorageError::NotFound.is_unique_violation());
        assert!(!StorageError::InvalidInput("x".into()).is_foreign_key_violation());
    }

    #[test]
    fn test_remapping_leaves_unrelated_errors_untouched() {
        let err = StorageError::NotFound.on_unique_violation("email taken");
        assert!(matches!(err, StorageError::NotFound));

        let err = StorageError::Database(sqlx::Error::RowNotFound).on_foreign_key_violation();
        assert!(matches!(err, StorageError::Database(sqlx::Error::RowNotFound)));
    }
}
