#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::GameListEntity;
use crate::dao::storage::{StorageResult, TxScope};
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for game lists.
///
/// Implementations return records in ascending identifier order so that repeated reads of
/// unchanged storage yield identical sequences.
pub trait GameListStore: Send + Sync {
    /// Load every stored game list within the given transactional scope.
    fn fetch_all(&self, scope: TxScope) -> BoxFuture<'static, StorageResult<Vec<GameListEntity>>>;
    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
