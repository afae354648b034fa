//! Storage error handling
//!
//! Typed errors for store operations. Domain rules (default-category
//! protection, per-user uniqueness, offset validation) surface here so
//! callers can distinguish them from plain database failures.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user with this name is already registered
    #[error("User '{0}' already exists")]
    UserExists(String),

    /// No user with this name
    #[error("Unknown user: '{0}'")]
    UnknownUser(String),

    /// The user already has a category with this name
    #[error("Category '{0}' already exists for this user")]
    DuplicateCategory(String),

    /// No category with this name for the user
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    /// The default category cannot be renamed or deleted
    #[error("The default category cannot be renamed or deleted")]
    DefaultCategoryProtected,

    /// No item with this ID for the user
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    /// Review offsets must be positive day counts
    #[error("Invalid review offsets: {0}")]
    InvalidOffsets(String),

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::DuplicateCategory("phrases".to_string());
        assert!(err.to_string().contains("phrases"));

        let err = StoreError::DefaultCategoryProtected;
        assert!(err.to_string().contains("default category"));
    }

    #[test]
    fn test_database_error_conversion() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
