//! Process-local game list store, seeded once at construction.

use std::{collections::BTreeMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    game_list_store::GameListStore,
    models::GameListEntity,
    storage::{StorageResult, TxScope},
};

/// In-memory store keyed by list identifier.
#[derive(Clone, Default)]
pub struct InMemoryGameListStore {
    records: Arc<RwLock<BTreeMap<i64, GameListEntity>>>,
}

impl InMemoryGameListStore {
    /// Create a store holding the given records. Later entries replace earlier ones sharing an id.
    pub fn with_records(records: impl IntoIterator<Item = GameListEntity>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect::<BTreeMap<_, _>>();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    async fn fetch_all(&self, scope: TxScope) -> Vec<GameListEntity> {
        match scope {
            TxScope::ReadOnly => {
                let guard = self.records.read().await;
                guard.values().cloned().collect()
            }
        }
    }
}

impl GameListStore for InMemoryGameListStore {
    fn fetch_all(&self, scope: TxScope) -> BoxFuture<'static, StorageResult<Vec<GameListEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.fetch_all(scope).await) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
