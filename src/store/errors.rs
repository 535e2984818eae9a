//! Document store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store not configured or could not be opened
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Backend query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::unavailable("DATABASE_URL not set").to_string(),
            "Storage unavailable: DATABASE_URL not set"
        );
        assert_eq!(StoreError::LockPoisoned.to_string(), "Storage lock poisoned");
    }

    #[test]
    fn test_from_serde_error() {
        let err: StoreError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
