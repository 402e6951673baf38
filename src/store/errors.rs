//! Record store error types

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by an `EmployeeStore`
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this employee id is already stored
    #[error("Employee with id {0} already exists")]
    DuplicateId(i64),

    /// A log entry failed to parse or its checksum did not match
    #[error("Corrupted collection log at line {line}: {reason}")]
    Corruption { line: usize, reason: String },

    /// Disk I/O failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else (lock poisoning and the like)
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn corruption(line: usize, reason: impl Into<String>) -> Self {
        Self::Corruption {
            line,
            reason: reason.into(),
        }
    }

    pub fn lock_poisoned() -> Self {
        Self::Internal("Lock poisoned".to_string())
    }
}
