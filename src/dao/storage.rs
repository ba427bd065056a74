use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not complete the request (unreachable, query failure, bad payload).
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable description of the failed operation.
        message: String,
        /// Backend-specific failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Transactional scope a storage read executes in.
///
/// Passed explicitly to every read so backends pick their isolation: a shared lock for the
/// in-memory store, a `majority` read concern for MongoDB, `stable=true` for CouchDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxScope {
    /// Consistent snapshot read; no write locks are held.
    ReadOnly,
}
