use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB game list store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection string could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Offending URI.
        uri: String,
        #[source]
        source: MongoError,
    },
    /// The driver refused the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    /// The server never answered during connection setup.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of pings sent before giving up.
        attempts: u32,
        #[source]
        source: MongoError,
    },
    /// Periodic ping failed on an established connection.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    /// Query or cursor iteration over the game lists failed.
    #[error("failed to list game lists")]
    ListGameLists {
        #[source]
        source: MongoError,
    },
}
