//! Error handling and result types for the index structures.
//!
//! Not-found is a normal outcome for the core verbs and is reported through
//! `Option`/`bool`. The error type covers configuration failures, the hash
//! directory's depth limit, and integrity violations found by validation.

use thiserror::Error;

/// Error type for index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A structure was constructed with an unusable bound.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Key not found in the index.
    #[error("Key not found in index")]
    KeyNotFound,
    /// A bucket split would grow the directory past its configured limit.
    #[error("Directory limit reached: global depth {depth} would exceed maximum {max}")]
    DirectoryLimit { depth: u32, max: u32 },
    /// Internal data structure integrity violation.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),
    /// Structural corruption detected.
    #[error("Corrupted index: {0}")]
    CorruptedIndex(String),
}

impl IndexError {
    /// Create an InvalidConfiguration error for a tree order below the minimum.
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidConfiguration(format!(
            "Order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Create an InvalidConfiguration error for a bucket capacity.
    pub fn invalid_capacity(capacity: usize) -> Self {
        Self::InvalidConfiguration(format!(
            "Bucket capacity {} is invalid (must be at least 1)",
            capacity
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedIndex error with context
    pub fn corrupted(component: &str, details: &str) -> Self {
        Self::CorruptedIndex(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

/// Internal result type for index operations
pub(crate) type TreeResult<T> = Result<T, IndexError>;

/// Public result type for index operations that may fail
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, IndexError>;

/// Result type for modification operations
pub type ModifyResult<T> = Result<T, IndexError>;

/// Result type for construction and validation
pub type InitResult<T> = Result<T, IndexError>;

/// Result extension trait for attaching operation context to errors.
pub trait IndexResultExt<T> {
    /// Prefix the error message with `context`.
    fn with_context(self, context: &str) -> IndexResult<T>;
}

impl<T> IndexResultExt<T> for Result<T, IndexError> {
    fn with_context(self, context: &str) -> IndexResult<T> {
        self.map_err(|e| match e {
            IndexError::InvalidConfiguration(msg) => {
                IndexError::InvalidConfiguration(format!("{}: {}", context, msg))
            }
            IndexError::DataIntegrityError(msg) => IndexError::data_integrity(context, &msg),
            IndexError::CorruptedIndex(msg) => IndexError::corrupted(context, &msg),
            other => other,
        })
    }
}

impl<T> IndexResultExt<T> for Result<T, String> {
    fn with_context(self, context: &str) -> IndexResult<T> {
        self.map_err(|msg| IndexError::data_integrity(context, &msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IndexError::invalid_order(2, 3);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Order 2 is invalid (minimum required: 3)"
        );
        assert!(err.is_configuration_error());

        let err = IndexError::DirectoryLimit { depth: 25, max: 24 };
        assert!(err.to_string().contains("25"));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_with_context() {
        let result: IndexResult<()> = Err(IndexError::data_integrity("leaf", "unsorted"));
        let err = result.with_context("insert").unwrap_err();
        assert_eq!(
            err,
            IndexError::DataIntegrityError("insert: leaf: unsorted".to_string())
        );

        let missing: IndexResult<()> = Err(IndexError::KeyNotFound);
        assert_eq!(missing.with_context("remove"), Err(IndexError::KeyNotFound));

        let raw: Result<(), String> = Err("bad parent".to_string());
        assert_eq!(
            raw.with_context("validate"),
            Err(IndexError::DataIntegrityError("validate: bad parent".to_string()))
        );
    }
}
