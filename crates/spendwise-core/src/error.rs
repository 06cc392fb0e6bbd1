//! Error types for SpendWise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Build a validation error naming the offending field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True when the backing store could not be reached or failed mid-query.
    /// Callers report these as transient failures.
    pub fn is_data_source(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Pool(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = Error::validation("amount", "must be greater than zero");
        assert_eq!(err.to_string(), "Invalid amount: must be greater than zero");
        assert!(!err.is_data_source());
    }

    #[test]
    fn test_database_errors_are_data_source() {
        let err = Error::from(rusqlite::Error::InvalidQuery);
        assert!(err.is_data_source());
        assert!(!Error::NotFound("Expense 3".into()).is_data_source());
    }
}
